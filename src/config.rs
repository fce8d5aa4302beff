//! Session configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::error::{Result, SyncError};
use crate::pose::JointIndices;
use crate::reps::{AngleSmoother, RepDetector, Thresholds, DOWN_THRESHOLD, UP_THRESHOLD};
use crate::sync::{UpdateThrottler, HEARTBEAT_INTERVAL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the room server (`ws://` or `wss://`)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Elbow angle that enters the bottom position
    #[serde(default = "default_down_threshold")]
    pub down_threshold: f64,

    /// Elbow angle that completes a rep
    #[serde(default = "default_up_threshold")]
    pub up_threshold: f64,

    /// Maximum age of the last update before an unchanged count is re-sent
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u64,

    /// Detection tick period
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// EMA weight for angle smoothing; off when absent
    #[serde(default)]
    pub smoothing_alpha: Option<f64>,

    #[serde(default)]
    pub joints: JointIndices,
}

fn default_server_url() -> String {
    "ws://localhost:8000".to_string()
}

fn default_down_threshold() -> f64 {
    DOWN_THRESHOLD
}

fn default_up_threshold() -> f64 {
    UP_THRESHOLD
}

fn default_heartbeat_ms() -> u64 {
    HEARTBEAT_INTERVAL.as_millis() as u64
}

fn default_tick_interval_ms() -> u64 {
    33
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            down_threshold: default_down_threshold(),
            up_threshold: default_up_threshold(),
            heartbeat_ms: default_heartbeat_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            smoothing_alpha: None,
            joints: JointIndices::default(),
        }
    }
}

impl SessionConfig {
    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds()?;
        if let Some(alpha) = self.smoothing_alpha {
            AngleSmoother::new(alpha)?;
        }
        if self.heartbeat_ms == 0 {
            return Err(SyncError::Config("heartbeat_ms must be positive".to_string()));
        }
        if self.tick_interval_ms == 0 {
            return Err(SyncError::Config("tick_interval_ms must be positive".to_string()));
        }
        if !(self.server_url.starts_with("ws://") || self.server_url.starts_with("wss://")) {
            return Err(SyncError::Config(format!(
                "server_url must use ws:// or wss://, got {}",
                self.server_url
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.down_threshold, self.up_threshold)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Detector configured with these thresholds and smoothing
    pub fn detector(&self) -> Result<RepDetector> {
        let detector = RepDetector::new(self.thresholds()?);
        Ok(match self.smoothing_alpha {
            Some(alpha) => detector.with_smoothing(AngleSmoother::new(alpha)?),
            None => detector,
        })
    }

    pub fn throttler(&self) -> UpdateThrottler {
        UpdateThrottler::new(self.heartbeat())
    }
}
