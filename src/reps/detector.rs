//! Rep detection state machine
//!
//! Turns a noisy stream of elbow angles into discrete rep counts. Two
//! thresholds form a hysteresis band: the arm has to bend below `down` and
//! then straighten above `up` before a rep is recorded, so jitter around a
//! single boundary cannot produce extra counts.

use super::smoothing::AngleSmoother;
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

/// Default bend threshold in degrees
pub const DOWN_THRESHOLD: f64 = 70.0;

/// Default extension threshold in degrees
pub const UP_THRESHOLD: f64 = 160.0;

/// Position of the tracked arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepStage {
    Up,
    Down,
}

/// Hysteresis thresholds in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    down: f64,
    up: f64,
}

impl Thresholds {
    /// Requires `0 <= down < up <= 180`
    pub fn new(down: f64, up: f64) -> Result<Self> {
        if !(0.0..=180.0).contains(&down) || !(0.0..=180.0).contains(&up) || down >= up {
            return Err(SyncError::Config(format!(
                "thresholds must satisfy 0 <= down < up <= 180 (down={}, up={})",
                down, up
            )));
        }
        Ok(Self { down, up })
    }

    pub fn down(&self) -> f64 {
        self.down
    }

    pub fn up(&self) -> f64 {
        self.up
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            down: DOWN_THRESHOLD,
            up: UP_THRESHOLD,
        }
    }
}

/// Emitted by the detector for the caller to forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepEvent {
    CountChanged(u32),
}

/// Per-session rep counter
#[derive(Debug, Clone)]
pub struct RepDetector {
    thresholds: Thresholds,
    stage: RepStage,
    count: u32,
    enabled: bool,
    smoother: Option<AngleSmoother>,
}

impl RepDetector {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            stage: RepStage::Up,
            count: 0,
            enabled: true,
            smoother: None,
        }
    }

    /// Pass every sample through an exponential moving average first
    pub fn with_smoothing(mut self, smoother: AngleSmoother) -> Self {
        self.smoother = Some(smoother);
        self
    }

    pub fn stage(&self) -> RepStage {
        self.stage
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Feed one angle sample.
    ///
    /// Only the DOWN→UP transition records a rep. Angles inside the
    /// hysteresis band never change state. Non-finite samples are ignored.
    pub fn observe(&mut self, angle_deg: f64) -> Option<RepEvent> {
        if !self.enabled || !angle_deg.is_finite() {
            return None;
        }

        let angle = match self.smoother.as_mut() {
            Some(smoother) => smoother.update(angle_deg),
            None => angle_deg,
        };

        match self.stage {
            RepStage::Up if angle < self.thresholds.down => {
                self.stage = RepStage::Down;
                None
            }
            RepStage::Down if angle > self.thresholds.up => {
                self.stage = RepStage::Up;
                self.count = self.count.saturating_add(1);
                log::debug!("rep recorded, count={}", self.count);
                Some(RepEvent::CountChanged(self.count))
            }
            _ => None,
        }
    }

    /// Start a fresh session: stage UP, count 0, counting enabled
    pub fn reset(&mut self) {
        self.stage = RepStage::Up;
        self.count = 0;
        self.enabled = true;
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.reset();
        }
    }

    /// Freeze the count once the room has stopped
    pub fn disable(&mut self) {
        self.enabled = false;
        self.stage = RepStage::Up;
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.reset();
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }
}

impl Default for RepDetector {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}
