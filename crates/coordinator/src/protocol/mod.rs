// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol between the client tools and the coordinator.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.
//! One request per connection: connect, send, read the response, hang up.

mod request;
mod response;
mod wire;

pub use request::Request;
pub use response::Response;
pub use wire::{
    decode, encode, read_message, write_message, write_response, ProtocolError, DEFAULT_TIMEOUT,
    PROTOCOL_VERSION,
};
