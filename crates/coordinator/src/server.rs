// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.
//!
//! Each connection carries exactly one request. A malformed request gets
//! an error response and costs only that connection; the coordinator
//! keeps serving everyone else.

use std::sync::{Arc, Mutex};

use tokio::net::UnixStream;
use tracing::debug;

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};
use crate::store::SessionStore;

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

/// Handle a single client connection
pub(crate) async fn handle_connection(
    store: &Arc<Mutex<SessionStore>>,
    stream: UnixStream,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    // Read the frame first, decode second: a frame that arrives but does
    // not parse still deserves an error response before we hang up.
    let read = tokio::time::timeout(DEFAULT_TIMEOUT, protocol::read_message(&mut reader)).await;
    let frame = match read {
        Err(_) => return Err(protocol::ProtocolError::Timeout.into()),
        Ok(Err(protocol::ProtocolError::ConnectionClosed)) => {
            debug!("client disconnected before sending a request");
            return Ok(());
        }
        Ok(Err(e)) => return Err(e.into()),
        Ok(Ok(frame)) => frame,
    };

    let request: Request = match protocol::decode(&frame) {
        Ok(request) => request,
        Err(e) => {
            let response = Response::Error {
                message: format!("malformed request: {e}"),
            };
            protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
            return Ok(());
        }
    };

    debug!(request = ?request, "received request");

    let response = handle_request(store, request);

    debug!(response = ?response, "sending response");

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

/// Handle a single request and return a response
fn handle_request(store: &Arc<Mutex<SessionStore>>, request: Request) -> Response {
    let mut store = store.lock().unwrap_or_else(|e| e.into_inner());

    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::GetValue { key } => match store.get_value(&key) {
            Some(value) => Response::Value {
                value: value.to_string(),
            },
            None => Response::NotFound,
        },

        Request::SetValue { key, value } => {
            store.set_value(key, value);
            Response::Ok
        }

        Request::GetParam { build, name } => match store.get_param(&build, &name) {
            Ok(Some(value)) => Response::Value {
                value: value.to_string(),
            },
            Ok(None) => Response::NotFound,
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::SetParam { build, name, value } => {
            match store.stage_param(&build, name, value) {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error {
                    message: e.to_string(),
                },
            }
        }

        Request::TakeParams { parent } => Response::Params {
            params: store.take_staged(&parent),
        },

        Request::OpenBuild { build, params } => match store.open_build(build, params) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::CloseBuild { build, exit_code } => match store.close_build(&build, exit_code) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
