// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit codes and the error type commands return instead of exiting.
//!
//! The taxonomy keeps failure classes distinguishable from each other and
//! from a child job's own exit code, which `startjob` passes through
//! verbatim. 126/127 follow the shell convention for "not runnable" and
//! "not found".

use std::fmt;

/// Bad arguments or a missing/malformed environment; matches clap's code
pub const EXIT_USAGE: i32 = 2;
/// The coordinator could not be reached in time
pub const EXIT_CONNECT: i32 = 3;
/// The coordinator reported a failure, or the protocol was violated
pub const EXIT_COORDINATOR: i32 = 4;
/// The key or parameter does not exist; a status, not an exception
pub const EXIT_NOT_FOUND: i32 = 5;
/// The build-number ledger failed; no build can proceed without a number
pub const EXIT_LEDGER: i32 = 6;
/// The OS refused to start the job's script
pub const EXIT_SPAWN: i32 = 126;
/// The job identifier did not resolve to a runnable job
pub const EXIT_NO_SUCH_JOB: i32 = 127;

/// Error carrying a process exit code.
///
/// Commands return `ExitError` instead of calling `std::process::exit()`
/// directly, allowing `main()` to handle process termination.
#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// An exit code with nothing to print; used for not-found statuses.
    pub fn silent(code: i32) -> Self {
        Self {
            code,
            message: String::new(),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<stint_core::ContextError> for ExitError {
    fn from(e: stint_core::ContextError) -> Self {
        ExitError::new(EXIT_USAGE, e.to_string())
    }
}

impl From<crate::client::ClientError> for ExitError {
    fn from(e: crate::client::ClientError) -> Self {
        use crate::client::ClientError;
        let code = match &e {
            ClientError::Connect(_) => EXIT_CONNECT,
            ClientError::Protocol(_) | ClientError::Rejected(_) | ClientError::Unexpected => {
                EXIT_COORDINATOR
            }
        };
        ExitError::new(code, e.to_string())
    }
}

/// Report the error (if it has anything to say) and exit the process.
pub fn fail(e: ExitError) -> ! {
    if !e.message.is_empty() {
        eprintln!("error: {e}");
    }
    std::process::exit(e.code)
}
