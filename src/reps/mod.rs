mod detector;
/// Rep counting - per-session state machine over elbow angles
///
/// A rep is one full UP→DOWN→UP cycle, counted once on the return to UP.
/// The detector is owned by exactly one (client, room) session and is
/// disabled while the room is stopped, so the frozen count always matches
/// what was last broadcast.
mod smoothing;

pub use detector::{RepDetector, RepEvent, RepStage, Thresholds, DOWN_THRESHOLD, UP_THRESHOLD};
pub use smoothing::AngleSmoother;
