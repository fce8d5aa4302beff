//! RepSync Core - rep counting and room leaderboard sync
//!
//! Each participant's device turns pose landmarks into rep counts, and a
//! small real-time protocol keeps every participant's view of the room's
//! leaderboard consistent. It implements:
//! - Elbow angle estimation from shoulder/elbow/wrist landmarks
//! - A hysteresis state machine that counts full UP→DOWN→UP cycles
//! - Change-or-heartbeat throttling of outbound count updates
//! - The room wire protocol and a full-snapshot leaderboard reducer
//! - A WebSocket room client and session loop (`client` feature)
//!
//! # Examples
//!
//! ```rust
//! use repsync::reps::{RepDetector, RepEvent};
//!
//! let mut detector = RepDetector::default();
//! detector.observe(175.0);
//! detector.observe(55.0);
//! assert_eq!(detector.observe(168.0), Some(RepEvent::CountChanged(1)));
//! ```

pub mod config;
pub mod error;
pub mod pose;
pub mod protocol;
pub mod reps;
pub mod room;
pub mod sync;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "client")]
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::SessionConfig;
pub use error::{Result, SyncError};
pub use protocol::{ClientMessage, Player, ServerMessage};
pub use reps::{RepDetector, RepEvent, RepStage};
pub use room::{RoomState, SessionPhase};
pub use sync::UpdateThrottler;

#[cfg(feature = "client")]
pub use client::{SyncClient, WsConnector};

#[cfg(feature = "client")]
pub use session::{FrameSource, RoomSession};

/// Player identifier assigned by the server, stable for one connection
pub type PlayerID = String;

/// Room code, the path segment of a room endpoint
pub type RoomCode = String;
