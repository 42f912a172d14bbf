// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator client for the five tools.
//!
//! One connection per request: connect, send, read the response, hang up.
//! Connection establishment retries inside a bounded window so a tool
//! fails fast with a connectivity error instead of hanging.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use stint_core::BuildId;
use stint_coordinator::protocol::{self, ProtocolError};
use stint_coordinator::{Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for one request/response round trip
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("STINT_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for establishing a connection to the coordinator
pub fn timeout_connect() -> Duration {
    parse_duration_ms("STINT_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for connect retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("STINT_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot reach the session coordinator at {}", .0.display())]
    Connect(PathBuf),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("coordinator rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected response from coordinator")]
    Unexpected,
}

/// Client for one session's coordinator
pub struct CoordinatorClient {
    endpoint: PathBuf,
}

impl CoordinatorClient {
    pub fn new(endpoint: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    /// Send a request and receive the response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let stream = self.connect().await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol::encode(&request)?;
        tokio::time::timeout(timeout_ipc(), protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let frame = tokio::time::timeout(timeout_ipc(), protocol::read_message(&mut reader))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol::decode(&frame)?)
    }

    /// Connect with retries inside the bounded connect window
    async fn connect(&self) -> Result<UnixStream, ClientError> {
        let deadline = Instant::now() + timeout_connect();
        loop {
            match UnixStream::connect(&self.endpoint).await {
                Ok(stream) => return Ok(stream),
                Err(_) if Instant::now() < deadline => {
                    tokio::time::sleep(poll_interval()).await;
                }
                Err(_) => return Err(ClientError::Connect(self.endpoint.clone())),
            }
        }
    }

    /// Version handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello {
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        match self.send(request).await? {
            Response::Hello { version } => Ok(version),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Read a session value; `None` when the key does not exist
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, ClientError> {
        let request = Request::GetValue {
            key: key.to_string(),
        };
        match self.send(request).await? {
            Response::Value { value } => Ok(Some(value)),
            Response::NotFound => Ok(None),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Write a session value
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let request = Request::SetValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match self.send(request).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Read a parameter of the calling build
    pub async fn get_param(
        &self,
        build: &BuildId,
        name: &str,
    ) -> Result<Option<String>, ClientError> {
        let request = Request::GetParam {
            build: build.clone(),
            name: name.to_string(),
        };
        match self.send(request).await? {
            Response::Value { value } => Ok(Some(value)),
            Response::NotFound => Ok(None),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Stage a parameter for the next child the calling build launches
    pub async fn set_param(
        &self,
        build: &BuildId,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError> {
        let request = Request::SetParam {
            build: build.clone(),
            name: name.to_string(),
            value: value.to_string(),
        };
        match self.send(request).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Collect and clear the parameters staged by `parent`
    pub async fn take_params(
        &self,
        parent: &BuildId,
    ) -> Result<std::collections::BTreeMap<String, String>, ClientError> {
        let request = Request::TakeParams {
            parent: parent.clone(),
        };
        match self.send(request).await? {
            Response::Params { params } => Ok(params),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Register a build and the parameter table fixed at its launch
    pub async fn open_build(
        &self,
        build: &BuildId,
        params: std::collections::BTreeMap<String, String>,
    ) -> Result<(), ClientError> {
        let request = Request::OpenBuild {
            build: build.clone(),
            params,
        };
        match self.send(request).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }

    /// Record a build's completion
    pub async fn close_build(&self, build: &BuildId, exit_code: i32) -> Result<(), ClientError> {
        let request = Request::CloseBuild {
            build: build.clone(),
            exit_code,
        };
        match self.send(request).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Unexpected),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
