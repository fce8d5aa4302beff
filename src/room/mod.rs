/// Room leaderboard - client-side snapshot reducer
///
/// The server owns the canonical leaderboard and decides when a room stops.
/// Clients keep a cached, possibly stale copy and only ever replace it with
/// the latest full snapshot:
/// - join / leave / leaderboard: new players, no winner, counting open
/// - stop: new players, winner fixed, counting closed
mod state;

pub use state::{RoomState, SessionPhase};
