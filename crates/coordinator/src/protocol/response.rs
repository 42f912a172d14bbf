// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response from the coordinator to a client tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Pong,

    Hello { version: String },

    /// Request applied
    Ok,

    /// The requested value or parameter
    Value { value: String },

    /// The key or parameter does not exist; a normal status, not a failure
    NotFound,

    /// Parameters staged for a launch
    Params { params: BTreeMap<String, String> },

    /// The coordinator rejected the request
    Error { message: String },
}
