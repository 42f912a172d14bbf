// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory session state: values, staged parameters, build records.
//!
//! The store is the single authority for a session's shared state; every
//! access from a job goes through the coordinator socket, never through
//! process memory. Mutations happen under one mutex held by the server,
//! so "last writer wins" is defined by completion order and readers
//! always observe a fully applied write.

use std::collections::{BTreeMap, HashSet};
use stint_core::{BuildId, BuildState};
use thiserror::Error;

/// Per-build record: the parameter table fixed at launch plus run state.
#[derive(Debug, Clone)]
pub struct BuildRecord {
    params: BTreeMap<String, String>,
    consumed: HashSet<String>,
    state: BuildState,
}

impl BuildRecord {
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Whether `getparam` has been answered for this name
    pub fn is_consumed(&self, name: &str) -> bool {
        self.consumed.contains(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown build: {0}")]
    UnknownBuild(BuildId),

    #[error("build already registered: {0}")]
    DuplicateBuild(BuildId),

    #[error("build already completed: {0}")]
    BuildCompleted(BuildId),
}

#[derive(Debug, Default)]
pub struct SessionStore {
    values: BTreeMap<String, String>,
    staged: BTreeMap<BuildId, BTreeMap<String, String>>,
    builds: BTreeMap<BuildId, BuildRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Stage a parameter for the next build `build` launches. Overwrites
    /// an earlier unconsumed staging of the same name by the same parent.
    pub fn stage_param(
        &mut self,
        build: &BuildId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        if !self.builds.contains_key(build) {
            return Err(StoreError::UnknownBuild(build.clone()));
        }
        self.staged
            .entry(build.clone())
            .or_default()
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Collect and clear everything staged by `parent`. Clearing here is
    /// what limits a parameter's scope to exactly one launch.
    pub fn take_staged(&mut self, parent: &BuildId) -> BTreeMap<String, String> {
        self.staged.remove(parent).unwrap_or_default()
    }

    /// Register a build with the parameter table fixed at its launch.
    pub fn open_build(
        &mut self,
        build: BuildId,
        params: BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        if self.builds.contains_key(&build) {
            return Err(StoreError::DuplicateBuild(build));
        }
        self.builds.insert(
            build,
            BuildRecord {
                params,
                consumed: HashSet::new(),
                state: BuildState::Running,
            },
        );
        Ok(())
    }

    /// Read a parameter of `build`, marking it consumed on a hit. Reads
    /// stay idempotent; consumption is recorded, not enforced.
    pub fn get_param(&mut self, build: &BuildId, name: &str) -> Result<Option<&str>, StoreError> {
        let record = self
            .builds
            .get_mut(build)
            .ok_or_else(|| StoreError::UnknownBuild(build.clone()))?;

        if record.params.contains_key(name) {
            record.consumed.insert(name.to_string());
        }
        Ok(record.params.get(name).map(String::as_str))
    }

    /// Finalize a build. Completed builds are immutable.
    pub fn close_build(&mut self, build: &BuildId, exit_code: i32) -> Result<(), StoreError> {
        let record = self
            .builds
            .get_mut(build)
            .ok_or_else(|| StoreError::UnknownBuild(build.clone()))?;

        if matches!(record.state, BuildState::Completed { .. }) {
            return Err(StoreError::BuildCompleted(build.clone()));
        }
        record.state = BuildState::Completed { exit_code };
        Ok(())
    }

    pub fn build(&self, build: &BuildId) -> Option<&BuildRecord> {
        self.builds.get(build)
    }

    /// Snapshot of the value table, for the final dump on session close.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
