// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four value/param shims.
//!
//! Each command validates the inherited session context, performs exactly
//! one coordinator operation, prints the result (get-commands) or nothing
//! (set-commands), and returns. Invoked outside a session they fail as a
//! usage error without touching the coordinator.

use crate::client::CoordinatorClient;
use crate::exit::{ExitError, EXIT_NOT_FOUND};
use stint_core::SessionContext;

/// Read a value from the session's shared store
pub async fn getvalue(key: &str) -> Result<(), ExitError> {
    let ctx = SessionContext::from_env()?;
    let client = CoordinatorClient::new(&ctx.endpoint);

    match client.get_value(key).await? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Err(ExitError::silent(EXIT_NOT_FOUND)),
    }
}

/// Write a value into the session's shared store
pub async fn setvalue(key: &str, value: &str) -> Result<(), ExitError> {
    let ctx = SessionContext::from_env()?;
    let client = CoordinatorClient::new(&ctx.endpoint);

    client.set_value(key, value).await?;
    Ok(())
}

/// Read a parameter of the current build
pub async fn getparam(name: &str) -> Result<(), ExitError> {
    let ctx = SessionContext::from_env()?;
    let client = CoordinatorClient::new(&ctx.endpoint);

    match client.get_param(&ctx.build, name).await? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Err(ExitError::silent(EXIT_NOT_FOUND)),
    }
}

/// Stage a parameter for the next job this build launches
pub async fn setparam(name: &str, value: &str) -> Result<(), ExitError> {
    let ctx = SessionContext::from_env()?;
    let client = CoordinatorClient::new(&ctx.endpoint);

    client.set_param(&ctx.build, name, value).await?;
    Ok(())
}
