// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The typed session context and its environment-variable encoding.
//!
//! Session state crosses process boundaries only through environment
//! variables. Inside a process it is this typed value; serialization
//! happens exactly once, at the spawn boundary ([`SessionContext::env_vars`]),
//! and parsing exactly once, at startup ([`SessionContext::from_env`]).
//! Every variable is validated strictly: a client tool invoked with a
//! missing or malformed context is a configuration error, reported before
//! any coordinator contact.

use crate::build::BuildId;
use crate::session::{Role, SessionId};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_ENDPOINT: &str = "STINT_ENDPOINT";
pub const ENV_SESSION: &str = "STINT_SESSION";
pub const ENV_OWNER: &str = "STINT_OWNER";
pub const ENV_BASE_DIR: &str = "STINT_BASE_DIR";
pub const ENV_JOB: &str = "STINT_JOB";
pub const ENV_BUILD: &str = "STINT_BUILD";

/// The five client tools, with the environment variable each is
/// published under.
const TOOL_VARS: [&str; 5] = [
    "STINT_STARTJOB",
    "STINT_GETVALUE",
    "STINT_SETVALUE",
    "STINT_GETPARAM",
    "STINT_SETPARAM",
];

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("{0} is not set; this command only runs inside a stint session")]
    Missing(&'static str),

    #[error("{var} is malformed: expected {expected}, got {got:?}")]
    Malformed {
        var: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("cannot locate the current executable: {0}")]
    CurrentExe(std::io::Error),
}

/// Resolved paths to the five client tool executables.
///
/// Constructed once by the process launcher and handed down so a job can
/// invoke the tools without locating them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub startjob: PathBuf,
    pub getvalue: PathBuf,
    pub setvalue: PathBuf,
    pub getparam: PathBuf,
    pub setparam: PathBuf,
}

impl ToolPaths {
    /// Resolve the tools as siblings of the current executable, falling
    /// back to bare names (PATH lookup) for any that are not present.
    pub fn resolve() -> Result<Self, ContextError> {
        let exe = std::env::current_exe().map_err(ContextError::CurrentExe)?;
        let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self {
            startjob: locate(&dir, "startjob"),
            getvalue: locate(&dir, "getvalue"),
            setvalue: locate(&dir, "setvalue"),
            getparam: locate(&dir, "getparam"),
            setparam: locate(&dir, "setparam"),
        })
    }

    /// Read the record back from an inherited environment. `None` when
    /// any of the five variables is absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let [startjob, getvalue, setvalue, getparam, setparam] =
            TOOL_VARS.map(|var| lookup(var).map(PathBuf::from));
        Some(Self {
            startjob: startjob?,
            getvalue: getvalue?,
            setvalue: setvalue?,
            getparam: getparam?,
            setparam: setparam?,
        })
    }

    fn vars(&self) -> Vec<(&'static str, OsString)> {
        let paths = [
            &self.startjob,
            &self.getvalue,
            &self.setvalue,
            &self.getparam,
            &self.setparam,
        ];
        TOOL_VARS
            .iter()
            .zip(paths)
            .map(|(var, path)| (*var, path.clone().into_os_string()))
            .collect()
    }
}

fn locate(dir: &Path, name: &str) -> PathBuf {
    let sibling = dir.join(name);
    if sibling.exists() {
        sibling
    } else {
        PathBuf::from(name)
    }
}

/// Everything a job process inherits about the session it runs in.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Transport address of the session coordinator
    pub endpoint: PathBuf,
    pub session_id: SessionId,
    /// Role of the invocation that launched this job
    pub role: Role,
    pub base_dir: PathBuf,
    /// The build this process belongs to
    pub build: BuildId,
    pub tools: ToolPaths,
}

impl SessionContext {
    /// Parse and validate the context from the process environment.
    pub fn from_env() -> Result<Self, ContextError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// [`SessionContext::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ContextError> {
        let endpoint = require(&lookup, ENV_ENDPOINT)?;
        let session = require(&lookup, ENV_SESSION)?;
        let owner = require(&lookup, ENV_OWNER)?;
        let base_dir = require(&lookup, ENV_BASE_DIR)?;
        let job_name = require(&lookup, ENV_JOB)?;
        let number = require(&lookup, ENV_BUILD)?;

        let role = Role::from_env_str(&owner).ok_or(ContextError::Malformed {
            var: ENV_OWNER,
            expected: "exactly `true` or `false`",
            got: owner,
        })?;

        let number = number.parse().map_err(|_| ContextError::Malformed {
            var: ENV_BUILD,
            expected: "exactly six decimal digits",
            got: number,
        })?;

        let tools = ToolPaths::from_lookup(&lookup).ok_or_else(|| {
            let missing = TOOL_VARS
                .iter()
                .copied()
                .find(|&var| lookup(var).is_none())
                .unwrap_or(TOOL_VARS[0]);
            ContextError::Missing(missing)
        })?;

        Ok(Self {
            endpoint: PathBuf::from(endpoint),
            session_id: SessionId(session),
            role,
            base_dir: PathBuf::from(base_dir),
            build: BuildId::new(job_name, number),
            tools,
        })
    }

    /// Serialize the context for a child process environment. This is the
    /// only place session state becomes environment variables.
    pub fn env_vars(&self) -> Vec<(&'static str, OsString)> {
        let mut vars = vec![
            (ENV_ENDPOINT, self.endpoint.clone().into_os_string()),
            (ENV_SESSION, OsString::from(self.session_id.0.clone())),
            (ENV_OWNER, OsString::from(self.role.as_env_str())),
            (ENV_BASE_DIR, self.base_dir.clone().into_os_string()),
            (ENV_JOB, OsString::from(self.build.job_name.clone())),
            (ENV_BUILD, OsString::from(self.build.number.to_string())),
        ];
        vars.extend(self.tools.vars());
        vars
    }
}

/// A session found in the launcher's own environment. Absent for the
/// root invocation, which creates the session instead.
#[derive(Debug, Clone)]
pub struct InheritedSession {
    pub endpoint: PathBuf,
    pub session_id: SessionId,
    pub base_dir: PathBuf,
    /// The build whose script invoked this launcher; its staged
    /// parameters go to the child about to be launched.
    pub parent_build: BuildId,
    pub tools: ToolPaths,
}

impl InheritedSession {
    /// Look for an inherited session. `Ok(None)` means no endpoint is
    /// set and the caller is the root invocation; a present but
    /// incomplete context is an error, not a fresh start.
    pub fn from_env() -> Result<Option<Self>, ContextError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// [`InheritedSession::from_env`] with an explicit variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ContextError> {
        if lookup(ENV_ENDPOINT).is_none() {
            return Ok(None);
        }
        let ctx = SessionContext::from_lookup(lookup)?;
        Ok(Some(Self {
            endpoint: ctx.endpoint,
            session_id: ctx.session_id,
            base_dir: ctx.base_dir,
            parent_build: ctx.build,
            tools: ctx.tools,
        }))
    }
}

/// The base directory a root invocation starts from.
pub fn base_dir_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, ContextError> {
    require(&lookup, ENV_BASE_DIR).map(PathBuf::from)
}

fn require(
    lookup: impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ContextError> {
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ContextError::Missing(var)),
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
