// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable, cross-process build numbering.
//!
//! Each job keeps its last allocated number in `<job dir>/.next_build`.
//! Allocation takes an exclusive advisory lock on the file, so two
//! sessions building the same job can never receive the same number.
//! Numbers are never reused; past 999999 allocation fails instead of
//! wrapping.

use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use stint_core::{BuildNumber, Layout, MAX_BUILD_NUMBER};
use thiserror::Error;

pub struct Ledger {
    layout: Layout,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot open build ledger at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot lock build ledger for {job}: {source}")]
    Lock {
        job: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build ledger for {job} is corrupt: {content:?}")]
    Corrupt { job: String, content: String },

    #[error("job {job} exhausted the six-digit build range")]
    Overflow { job: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Ledger {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Allocate the next build number for a job. Atomic across processes:
    /// read, increment, and persist happen under an exclusive file lock,
    /// released when the file handle drops.
    pub fn next(&self, job_name: &str) -> Result<BuildNumber, LedgerError> {
        let path = self.layout.ledger_path(job_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LedgerError::Open {
                path: path.clone(),
                source,
            })?;

        file.lock_exclusive().map_err(|source| LedgerError::Lock {
            job: job_name.to_string(),
            source,
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        let trimmed = content.trim();

        let last: u32 = if trimmed.is_empty() {
            0
        } else {
            trimmed.parse().map_err(|_| LedgerError::Corrupt {
                job: job_name.to_string(),
                content: trimmed.to_string(),
            })?
        };

        if last >= MAX_BUILD_NUMBER {
            return Err(LedgerError::Overflow {
                job: job_name.to_string(),
            });
        }
        let next = last + 1;

        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(next.to_string().as_bytes())?;
        file.sync_all()?;

        BuildNumber::new(next).map_err(|_| LedgerError::Overflow {
            job: job_name.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
