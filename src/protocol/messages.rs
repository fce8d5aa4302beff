//! Wire messages exchanged over a room connection
//!
//! Every frame is a JSON object discriminated by its `type` field. The
//! client sends a single shape (`update`); the server answers with one of
//! four full-snapshot shapes.

use crate::{PlayerID, RoomCode};
use serde::{Deserialize, Serialize};

/// One participant as seen by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerID,
    pub name: String,
    pub count: u32,
}

/// Client → server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Latest local rep count
    Update { count: u32 },
}

/// Server → client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// A participant connected
    Join { room: RoomCode, players: Vec<Player> },

    /// A participant disconnected
    Leave { room: RoomCode, players: Vec<Player> },

    /// Counts changed
    Leaderboard { room: RoomCode, players: Vec<Player> },

    /// The room is finished and `winner` is fixed
    Stop {
        room: RoomCode,
        winner: Player,
        players: Vec<Player>,
    },
}

impl ServerMessage {
    pub fn room(&self) -> &str {
        match self {
            ServerMessage::Join { room, .. }
            | ServerMessage::Leave { room, .. }
            | ServerMessage::Leaderboard { room, .. }
            | ServerMessage::Stop { room, .. } => room,
        }
    }

    pub fn players(&self) -> &[Player] {
        match self {
            ServerMessage::Join { players, .. }
            | ServerMessage::Leave { players, .. }
            | ServerMessage::Leaderboard { players, .. }
            | ServerMessage::Stop { players, .. } => players,
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        match self {
            ServerMessage::Stop { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// Wire tag, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Join { .. } => "join",
            ServerMessage::Leave { .. } => "leave",
            ServerMessage::Leaderboard { .. } => "leaderboard",
            ServerMessage::Stop { .. } => "stop",
        }
    }
}
