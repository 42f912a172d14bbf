// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-id generation

use crate::session::SessionId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates session identifiers
pub trait IdGen: Send + Sync {
    fn session_id(&self) -> SessionId;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn session_id(&self) -> SessionId {
        SessionId(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for deterministic tests
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("session")
    }
}

impl IdGen for SequentialIdGen {
    fn session_id(&self) -> SessionId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        SessionId(format!("{}-{}", self.prefix, n))
    }
}
