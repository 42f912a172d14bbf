// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! setvalue - write a session value

use clap::Parser;
use stint_cli::{commands, exit, logging};

/// Write a value into the session's shared store.
///
/// The value is visible to every job in the session, including the
/// parent after this job exits. Arbitrary bytes round-trip unchanged.
#[derive(Parser)]
#[command(name = "setvalue", version)]
struct Args {
    /// Key to write
    key: String,

    /// Value to store
    value: String,
}

#[tokio::main]
async fn main() {
    logging::init_stderr();
    let cli = Args::parse();

    if let Err(e) = commands::setvalue(&cli.key, &cli.value).await {
        exit::fail(e);
    }
}
