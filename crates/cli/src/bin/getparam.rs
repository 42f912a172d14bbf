// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! getparam - read a parameter of the current build

use clap::Parser;
use stint_cli::{commands, exit, logging};

/// Read a parameter of the current build and print it.
///
/// The value is whatever the parent staged before launching this job,
/// or the default configured in job.toml. Exits 5 without output when
/// the parameter does not exist.
#[derive(Parser)]
#[command(name = "getparam", version)]
struct Args {
    /// Parameter name
    name: String,
}

#[tokio::main]
async fn main() {
    logging::init_stderr();
    let cli = Args::parse();

    if let Err(e) = commands::getparam(&cli.name).await {
        exit::fail(e);
    }
}
