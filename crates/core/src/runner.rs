// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process execution seam.
//!
//! The launcher drives job scripts through this trait so tests can
//! substitute a fake. The production implementation spawns a real child
//! process and forwards its stdout line-by-line as it is produced, never
//! buffered until exit.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// What to run: a program inside a working directory with a prepared
/// environment on top of the inherited one.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(&'static str, OsString)>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    /// The OS refused to start the process (missing, not executable, ...)
    #[error("failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read job output: {0}")]
    Output(#[source] std::io::Error),

    #[error("failed to await job completion: {0}")]
    Wait(#[source] std::io::Error),
}

#[async_trait]
pub trait Runner: Send + Sync {
    /// Run the program to completion, sending each stdout line as it is
    /// produced. Returns the exit code.
    async fn run(&self, spec: RunSpec, output: mpsc::Sender<String>) -> Result<i32, RunnerError>;
}

/// Runs jobs as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(&self, spec: RunSpec, output: mpsc::Sender<String>) -> Result<i32, RunnerError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped());
        for (var, value) in &spec.env {
            cmd.env(var, value);
        }

        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            RunnerError::Output(std::io::Error::other("child stdout not captured"))
        })?;

        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    // Receiver gone means the caller stopped listening;
                    // keep draining so the child never blocks on a full pipe.
                    let _ = output.send(line).await;
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = child.wait().await;
                    return Err(RunnerError::Output(e));
                }
            }
        }

        let status = child.wait().await.map_err(RunnerError::Wait)?;
        Ok(exit_code_of(status))
    }
}

/// Exit code of a finished process; signal deaths map to 128+signal, the
/// shell convention.
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
