// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identity and roles.
//!
//! A session is one root-job execution tree. Exactly one process creates
//! it (the root `startjob` invocation); every nested invocation joins it
//! through the inherited endpoint and never owns it.

use serde::{Deserialize, Serialize};

/// Unique identifier for a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a process relates to the session it takes part in.
///
/// Fixed when the session context is created and immutable for the life
/// of that process: the invocation that found no inherited endpoint is
/// the owner, everything below it is a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Created the session; responsible for tearing it down
    Owner,
    /// Joined an existing session via the inherited endpoint
    Participant,
}

impl Role {
    pub fn is_owner(self) -> bool {
        matches!(self, Role::Owner)
    }

    /// Environment encoding: exactly `true` or `false`
    pub fn as_env_str(self) -> &'static str {
        match self {
            Role::Owner => "true",
            Role::Participant => "false",
        }
    }

    /// Strict inverse of [`Role::as_env_str`]; anything else is malformed
    pub fn from_env_str(s: &str) -> Option<Role> {
        match s {
            "true" => Some(Role::Owner),
            "false" => Some(Role::Participant),
            _ => None,
        }
    }
}
