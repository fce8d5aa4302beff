//! Serialization layer - Convert wire messages to/from JSON text frames
//!
//! Decoding is the validation step: a frame that does not match one of the
//! tagged shapes exactly is rejected here, before any state sees it.

use super::messages::{ClientMessage, ServerMessage};
use crate::error::{Result, SyncError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a client message to a text frame
pub fn encode_client_message(msg: &ClientMessage) -> Result<String> {
    encode_message(msg)
}

/// Deserialize and validate a server frame
pub fn decode_server_message(text: &str) -> Result<ServerMessage> {
    decode_message(text)
}

/// Serialize a server message (used by in-process room peers)
pub fn encode_server_message(msg: &ServerMessage) -> Result<String> {
    encode_message(msg)
}

/// Deserialize and validate a client frame
pub fn decode_client_message(text: &str) -> Result<ClientMessage> {
    decode_message(text)
}

fn encode_message<M: Serialize>(msg: &M) -> Result<String> {
    serde_json::to_string(msg)
        .map_err(|e| SyncError::Protocol(format!("Failed to encode message: {}", e)))
}

fn decode_message<M: DeserializeOwned>(text: &str) -> Result<M> {
    serde_json::from_str(text)
        .map_err(|e| SyncError::Protocol(format!("Failed to decode message: {}", e)))
}
