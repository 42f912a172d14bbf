// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! setparam - stage a parameter for the next launched job

use clap::Parser;
use stint_cli::{commands, exit, logging};

/// Stage a parameter for the next job this build launches.
///
/// The parameter is visible to that one child only; it does not leak
/// further down the tree unless the child stages it again.
#[derive(Parser)]
#[command(name = "setparam", version)]
struct Args {
    /// Parameter name
    name: String,

    /// Value to hand to the next child
    value: String,
}

#[tokio::main]
async fn main() {
    logging::init_stderr();
    let cli = Args::parse();

    if let Err(e) = commands::setparam(&cli.name, &cli.value).await {
        exit::fail(e);
    }
}
