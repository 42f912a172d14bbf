// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stint_core::BuildId;

/// Request from a client tool to the session coordinator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Read a session value
    GetValue { key: String },

    /// Write a session value (last writer wins)
    SetValue { key: String, value: String },

    /// Read a parameter of the calling build; `build` is the caller's
    /// own identity, inherited from its environment
    GetParam { build: BuildId, name: String },

    /// Stage a parameter for the next build the calling build launches
    SetParam {
        build: BuildId,
        name: String,
        value: String,
    },

    /// Collect and clear the parameters staged by `parent`; issued by
    /// the launcher immediately before spawning the child
    TakeParams { parent: BuildId },

    /// Register a build and the parameter table fixed at its launch
    OpenBuild {
        build: BuildId,
        params: BTreeMap<String, String>,
    },

    /// Record a build's completion
    CloseBuild { build: BuildId, exit_code: i32 },
}
