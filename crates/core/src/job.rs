// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definitions.
//!
//! A job lives at `<base>/jobs/<name>/` and is described by a `job.toml`:
//!
//! ```toml
//! script = "script.sh"
//!
//! [params]
//! prm1 = "\"why?\""
//! ```
//!
//! `script` names an executable inside the job directory. The optional
//! `[params]` table holds default values for parameters the job reads via
//! `getparam`; a parent's `setparam` overrides them for one launch.

use crate::layout::Layout;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parsed contents of a `job.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobSpec {
    /// Executable inside the job directory
    pub script: String,

    /// Default parameter values
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// A job resolved on disk
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub dir: PathBuf,
    pub spec: JobSpec,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("no such job: {0}")]
    NotFound(String),

    #[error("invalid job name: {0:?}")]
    InvalidName(String),

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid job.toml for {name}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("script {script:?} does not exist for job {name}")]
    ScriptMissing { name: String, script: String },
}

impl Job {
    /// Resolve a job identifier against the base directory. Fails before
    /// any session or coordinator machinery is touched.
    pub fn resolve(layout: &Layout, name: &str) -> Result<Job, JobError> {
        if name.is_empty()
            || Path::new(name).is_absolute()
            || name.split('/').any(|part| part.is_empty() || part == "." || part == "..")
        {
            return Err(JobError::InvalidName(name.to_string()));
        }

        let dir = layout.job_dir(name);
        if !dir.is_dir() {
            return Err(JobError::NotFound(name.to_string()));
        }

        let spec_path = dir.join("job.toml");
        let raw = std::fs::read_to_string(&spec_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                JobError::NotFound(name.to_string())
            } else {
                JobError::Unreadable {
                    path: spec_path.clone(),
                    source,
                }
            }
        })?;

        let spec: JobSpec = toml::from_str(&raw).map_err(|source| JobError::Invalid {
            name: name.to_string(),
            source,
        })?;

        if !dir.join(&spec.script).is_file() {
            return Err(JobError::ScriptMissing {
                name: name.to_string(),
                script: spec.script,
            });
        }

        Ok(Job {
            name: name.to_string(),
            dir,
            spec,
        })
    }

    /// Absolute path of the job's script inside the job directory
    pub fn script_path(&self) -> PathBuf {
        self.dir.join(&self.spec.script)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
