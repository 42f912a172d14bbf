// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout of a stint base directory.
//!
//! ```text
//! <base>/
//!   jobs/<name>/job.toml         job definition
//!   jobs/<name>/.next_build      build-number ledger
//!   jobs/<name>/<NNNNNN>/        one directory per build
//!   sessions/<id>.json           final value dump, written on close
//!   sessions/<id>.log            session log
//! ```
//!
//! All path computation lives here so the rest of the workspace never
//! assembles these paths by hand.

use crate::build::BuildId;
use crate::session::SessionId;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Layout {
    base: PathBuf,
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.base.join("jobs")
    }

    pub fn job_dir(&self, name: &str) -> PathBuf {
        self.jobs_dir().join(name)
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.job_dir(name).join(".next_build")
    }

    pub fn build_dir(&self, build: &BuildId) -> PathBuf {
        self.job_dir(&build.job_name).join(build.number.to_string())
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.base.join("sessions")
    }

    pub fn session_values_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir().join(format!("{id}.json"))
    }

    pub fn session_log_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir().join(format!("{id}.log"))
    }
}
