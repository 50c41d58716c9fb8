// Step detection on force curves via isotonic regression
//
// The isotonic fit turns a noisy rising curve into flat plateaus joined by
// sharp rises; the rises show up as peaks in the fit's first difference.

use crate::core::error::Result;
use crate::models::config_model::AnalysisConfig;
use crate::processing::curve_features::{check_shape, global_minimum};
use crate::processing::isotonic::isotonic_fit;
use crate::processing::peaks::local_maxima;
use tracing::debug;

pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MIN_DISTANCE: usize = 50;

/// Monotonically non-decreasing fit of `y` over `x`, same length as input.
pub fn step_curve(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    isotonic_fit(x, y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDetector {
    /// Peak threshold relative to the largest rise.
    pub threshold: f64,
    pub min_distance: usize,
}

impl Default for StepDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

impl StepDetector {
    pub fn new(threshold: f64, min_distance: usize) -> Self {
        Self {
            threshold,
            min_distance,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.step_threshold, config.step_min_distance)
    }

    /// Indices into the first difference of the step curve, i.e. index `i`
    /// marks the rise between samples `i` and `i + 1`.
    pub fn step_positions(&self, x: &[f64], y: &[f64]) -> Result<Vec<usize>> {
        let fitted = step_curve(x, y)?;
        let gradient: Vec<f64> = fitted.windows(2).map(|w| w[1] - w[0]).collect();

        let max = gradient.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= 0.0 {
            debug!("step curve is flat, no steps");
            return Ok(Vec::new());
        }

        let normalized: Vec<f64> = gradient.iter().map(|g| g / max).collect();
        let steps = local_maxima(&normalized, self.threshold, self.min_distance);
        debug!("{} steps found in {} samples", steps.len(), y.len());
        Ok(steps)
    }

    /// Steps after the global minimum of a retract curve.
    ///
    /// The returned indices are relative to the sub-curve starting at the
    /// minimum, not to the full curve; add the minimum's index to map them
    /// back.
    pub fn retract_steps(&self, x: &[f64], y: &[f64]) -> Result<Vec<usize>> {
        check_shape(x, y)?;
        let min = global_minimum(x, y)?;
        self.step_positions(&x[min.index..], &y[min.index..])
    }
}

pub fn step_positions(x: &[f64], y: &[f64], threshold: f64, min_distance: usize) -> Result<Vec<usize>> {
    StepDetector::new(threshold, min_distance).step_positions(x, y)
}

pub fn retract_steps(x: &[f64], y: &[f64], threshold: f64, min_distance: usize) -> Result<Vec<usize>> {
    StepDetector::new(threshold, min_distance).retract_steps(x, y)
}
