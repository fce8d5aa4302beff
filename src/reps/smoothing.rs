//! Exponential moving average over angle samples

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, PartialEq)]
pub struct AngleSmoother {
    alpha: f64,
    value: Option<f64>,
}

impl AngleSmoother {
    /// `alpha` is the weight of the newest sample, in (0, 1]
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(SyncError::Config(format!(
                "smoothing alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        Ok(Self { alpha, value: None })
    }

    /// Blend in a sample and return the smoothed angle.
    /// The first sample after a reset is taken as is.
    pub fn update(&mut self, sample: f64) -> f64 {
        let next = match self.value {
            Some(previous) => self.alpha * sample + (1.0 - self.alpha) * previous,
            None => sample,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
