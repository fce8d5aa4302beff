//! Landmark types consumed from the external pose estimator

use super::angle::joint_angle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 2D point, either normalized image coordinates or pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Scale a normalized [0,1] point to pixel space
    pub fn to_pixels(self, width: u32, height: u32) -> Self {
        Self {
            x: self.x * f64::from(width),
            y: self.y * f64::from(height),
        }
    }
}

/// Landmark indices read from each pose.
///
/// Defaults follow the 33-point BlazePose layout (right shoulder, elbow, wrist).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointIndices {
    pub shoulder: usize,
    pub elbow: usize,
    pub wrist: usize,
}

impl Default for JointIndices {
    fn default() -> Self {
        Self {
            shoulder: 12,
            elbow: 14,
            wrist: 16,
        }
    }
}

/// Shoulder, elbow and wrist of one arm in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkTriple {
    pub shoulder: Point2,
    pub elbow: Point2,
    pub wrist: Point2,
}

impl LandmarkTriple {
    /// Elbow angle in degrees
    pub fn angle(&self) -> f64 {
        joint_angle(self.shoulder, self.elbow, self.wrist)
    }
}

/// One elbow-angle measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    pub degrees: f64,
    pub timestamp: Duration,
}

/// Landmarks detected for a single video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Offset from the start of the capture
    #[serde(with = "millis")]
    pub timestamp: Duration,

    /// Video frame size, used to undo the aspect ratio of normalized points
    pub width: u32,
    pub height: u32,

    /// Normalized landmarks of the first detected person
    pub landmarks: Vec<Point2>,
}

impl PoseFrame {
    /// The tracked arm in pixel space.
    ///
    /// None when the frame has no area, or when any required landmark is
    /// missing or not finite.
    pub fn arm(&self, joints: &JointIndices) -> Option<LandmarkTriple> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let point = |index: usize| {
            self.landmarks
                .get(index)
                .filter(|p| p.is_finite())
                .map(|p| p.to_pixels(self.width, self.height))
        };

        Some(LandmarkTriple {
            shoulder: point(joints.shoulder)?,
            elbow: point(joints.elbow)?,
            wrist: point(joints.wrist)?,
        })
    }

    pub fn angle_sample(&self, joints: &JointIndices) -> Option<AngleSample> {
        self.arm(joints).map(|arm| AngleSample {
            degrees: arm.angle(),
            timestamp: self.timestamp,
        })
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
