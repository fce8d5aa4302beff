/// Client-side Room State
///
/// Locally cached copy of the server's leaderboard. Every snapshot replaces
/// the previous one completely; the client never merges or diffs, so
/// repeated or reordered snapshots cannot corrupt it. The latest snapshot
/// received always wins.
use crate::protocol::{Player, ServerMessage};
use crate::RoomCode;

/// Room lifecycle as seen by this client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Accepting joins and counting
    #[default]
    Open,
    /// Winner fixed, counting disabled
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomState {
    room: Option<RoomCode>,
    players: Vec<Player>,
    winner: Option<Player>,
    phase: SessionPhase,
}

impl RoomState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce one inbound message into the next state.
    ///
    /// `join`, `leave` and `leaderboard` are handled identically: replace
    /// the players, clear the winner, reopen counting. `stop` replaces the
    /// players and fixes the winner.
    pub fn apply(&self, message: ServerMessage) -> RoomState {
        match message {
            ServerMessage::Join { room, players }
            | ServerMessage::Leave { room, players }
            | ServerMessage::Leaderboard { room, players } => RoomState {
                room: Some(room),
                players,
                winner: None,
                phase: SessionPhase::Open,
            },
            ServerMessage::Stop {
                room,
                winner,
                players,
            } => RoomState {
                room: Some(room),
                players,
                winner: Some(winner),
                phase: SessionPhase::Stopped,
            },
        }
    }

    /// Room code of the last snapshot
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Players in the order the server sent them
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.as_ref()
    }

    pub fn is_winner(&self, id: &str) -> bool {
        self.winner.as_ref().is_some_and(|w| w.id == id)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn counting_enabled(&self) -> bool {
        self.phase == SessionPhase::Open
    }

    /// Players by descending count, ties broken by case-insensitive name
    pub fn ranked(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        ranked
    }
}
