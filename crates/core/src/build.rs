// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build identity.
//!
//! A build is one execution of a named job. Build numbers are rendered as
//! exactly six zero-padded decimal digits everywhere they appear (build
//! directories, environment variables, the wire protocol) and increase
//! strictly per job name, across sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest allocatable build number: six decimal digits.
pub const MAX_BUILD_NUMBER: u32 = 999_999;

/// A six-digit build number
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BuildNumber(u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildNumberError {
    #[error("build number {0} exceeds the six-digit range")]
    OutOfRange(u32),

    #[error("build number must be exactly six decimal digits, got {0:?}")]
    Malformed(String),
}

impl BuildNumber {
    pub fn new(n: u32) -> Result<Self, BuildNumberError> {
        if n > MAX_BUILD_NUMBER {
            return Err(BuildNumberError::OutOfRange(n));
        }
        Ok(Self(n))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl FromStr for BuildNumber {
    type Err = BuildNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BuildNumberError::Malformed(s.to_string()));
        }
        let n: u32 = s
            .parse()
            .map_err(|_| BuildNumberError::Malformed(s.to_string()))?;
        BuildNumber::new(n)
    }
}

/// One execution of a named job within a session
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildId {
    pub job_name: String,
    pub number: BuildNumber,
}

impl BuildId {
    pub fn new(job_name: impl Into<String>, number: BuildNumber) -> Self {
        Self {
            job_name: job_name.into(),
            number,
        }
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.job_name, self.number)
    }
}

/// Run state of a build; immutable once completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildState {
    Running,
    Completed { exit_code: i32 },
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
