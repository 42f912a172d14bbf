// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! startjob - launch a job, creating or joining a session

use clap::Parser;
use stint_cli::exit;
use stint_cli::Launcher;
use stint_core::{ProcessRunner, UuidIdGen};

/// Launch a job as a new build.
///
/// The first invocation in a tree creates the session and hosts its
/// coordinator until the job exits; nested invocations join the
/// inherited session. The job's exit code becomes this command's own.
#[derive(Parser)]
#[command(name = "startjob", version)]
struct Args {
    /// Job to launch, e.g. `project/job`
    job: String,

    /// Extra arguments passed to the job script
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Args::parse();

    let launcher = Launcher::new(ProcessRunner, UuidIdGen);
    match launcher.run(&cli.job, &cli.args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => exit::fail(e),
    }
}
