// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! getvalue - read a session value

use clap::Parser;
use stint_cli::{commands, exit, logging};

/// Read a value from the session's shared store and print it.
///
/// Exits 5 without output when the key does not exist.
#[derive(Parser)]
#[command(name = "getvalue", version)]
struct Args {
    /// Key to read
    key: String,
}

#[tokio::main]
async fn main() {
    logging::init_stderr();
    let cli = Args::parse();

    if let Err(e) = commands::getvalue(&cli.key).await {
        exit::fail(e);
    }
}
