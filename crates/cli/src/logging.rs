// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the tools.
//!
//! Shims log to stderr, filtered by `STINT_LOG` (default `warn`). The
//! session-owning `startjob` writes to the per-session log file instead,
//! so coordinator activity survives the process; the returned guard must
//! be held for the life of the process to flush the non-blocking writer.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env("STINT_LOG").unwrap_or_else(|_| EnvFilter::new(default))
}

/// Stderr logging for the short-lived shims
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Session-file logging for the owning launcher
pub fn init_session_log(log_path: &Path) -> std::io::Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .ok_or_else(|| std::io::Error::other("session log path has no parent"))?;
    let file_name = log_path
        .file_name()
        .ok_or_else(|| std::io::Error::other("session log path has no file name"))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init();

    Ok(guard)
}
