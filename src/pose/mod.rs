//! Pose input - the per-frame landmark set produced by an external estimator
//!
//! Landmark extraction itself happens outside this crate. Here a frame is
//! reduced to one elbow angle:
//! - normalized landmarks are scaled to pixel space (keeps the aspect ratio)
//! - shoulder/elbow/wrist are picked by index
//! - a frame without a usable arm yields no sample (the tick is skipped)

mod angle;
mod landmarks;

pub use angle::joint_angle;
pub use landmarks::{AngleSample, JointIndices, LandmarkTriple, Point2, PoseFrame};
