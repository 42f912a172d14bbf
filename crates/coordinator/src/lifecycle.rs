// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator lifetime: bind, serve, drain, close.
//!
//! The owning `startjob` process starts the coordinator before spawning
//! the root job and closes it after that job exits. Close is ordered:
//! stop accepting, drain in-flight connections with a bounded wait,
//! persist the final value table, remove the socket. A session lingering
//! past its root is a defect, so nothing is served after close.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stint_core::{Layout, SessionId};
use thiserror::Error;
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::server;
use crate::store::SessionStore;

/// Bounded wait for in-flight connections after the accept loop stops
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Overall bound on close, drain included
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Closing,
    Closed,
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, #[source] std::io::Error),

    #[error("failed to persist session values to {0}: {1}")]
    DumpFailed(PathBuf, #[source] std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub session_id: SessionId,
    /// Path of the Unix socket clients connect to
    pub socket_path: PathBuf,
    /// Where the final value table is written on close
    pub values_path: PathBuf,
}

impl Config {
    /// Config for a session under the given base-dir layout
    pub fn for_session(session_id: SessionId, layout: &Layout) -> Self {
        let socket_path = socket_dir().join(format!("{session_id}.sock"));
        let values_path = layout.session_values_path(&session_id);
        Self {
            session_id,
            socket_path,
            values_path,
        }
    }
}

/// Socket directory for stint sessions.
///
/// Uses /tmp/stint by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with STINT_SOCKET_DIR for testing.
pub fn socket_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STINT_SOCKET_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from("/tmp/stint")
}

/// The per-session coordinator service
pub struct Coordinator;

impl Coordinator {
    /// Bind the session socket and start serving. Returns once the
    /// endpoint accepts connections, so the caller may spawn clients
    /// immediately after.
    pub async fn start(config: Config) -> Result<CoordinatorHandle, CoordinatorError> {
        if let Some(parent) = config.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Some(parent) = config.values_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Remove a stale socket from a crashed former life of this path
        if config.socket_path.exists() {
            std::fs::remove_file(&config.socket_path)?;
        }

        let listener = UnixListener::bind(&config.socket_path)
            .map_err(|e| CoordinatorError::BindFailed(config.socket_path.clone(), e))?;

        let store = Arc::new(Mutex::new(SessionStore::new()));
        let shutdown = Arc::new(Notify::new());

        let accept_task = tokio::spawn(accept_loop(
            listener,
            Arc::clone(&store),
            Arc::clone(&shutdown),
        ));

        info!(
            session = %config.session_id,
            socket = %config.socket_path.display(),
            "coordinator listening"
        );

        Ok(CoordinatorHandle {
            config,
            store,
            shutdown,
            accept_task,
            state: SessionState::Active,
        })
    }
}

/// Accept connections until shutdown, then drain with a bounded wait.
async fn accept_loop(listener: UnixListener, store: Arc<Mutex<SessionStore>>, shutdown: Arc<Notify>) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, _)) => {
                    let store = Arc::clone(&store);
                    connections.spawn(async move {
                        if let Err(e) = server::handle_connection(&store, stream).await {
                            warn!("connection error: {e}");
                        }
                    });
                }
                Err(e) => error!("accept error: {e}"),
            },
            _ = shutdown.notified() => break,
        }

        // Reap connections that already finished
        while connections.try_join_next().is_some() {}
    }

    debug!("accept loop stopped, draining in-flight requests");

    let drain = async {
        while connections.join_next().await.is_some() {}
    };
    if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
        warn!("drain timeout, aborting remaining connections");
        connections.abort_all();
    }
}

/// Handle held by the owning process; closing it ends the session.
pub struct CoordinatorHandle {
    config: Config,
    store: Arc<Mutex<SessionStore>>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
    state: SessionState,
}

impl CoordinatorHandle {
    pub fn endpoint(&self) -> &Path {
        &self.config.socket_path
    }

    pub fn session_id(&self) -> &SessionId {
        &self.config.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Tear the session down: Active -> Closing -> Closed.
    pub async fn close(mut self) -> Result<(), CoordinatorError> {
        self.state = SessionState::Closing;
        info!(session = %self.config.session_id, "closing session");

        self.shutdown.notify_one();
        if tokio::time::timeout(CLOSE_TIMEOUT, &mut self.accept_task)
            .await
            .is_err()
        {
            warn!("coordinator did not stop in time, aborting");
            self.accept_task.abort();
        }

        // Persist the final value table for post-mortems
        let dump = {
            let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
            serde_json::to_string_pretty(store.values())
                .map_err(|e| CoordinatorError::DumpFailed(self.config.values_path.clone(), e.into()))?
        };
        std::fs::write(&self.config.values_path, dump)
            .map_err(|e| CoordinatorError::DumpFailed(self.config.values_path.clone(), e))?;

        if self.config.socket_path.exists() {
            std::fs::remove_file(&self.config.socket_path)?;
        }

        self.state = SessionState::Closed;
        info!(session = %self.config.session_id, "session closed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
