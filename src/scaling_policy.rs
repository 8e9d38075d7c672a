//! Threshold-based scaling policy.

use std::fmt;
use serde::Serialize;
use crate::error::{ConfigError, ConfigResult};

/// Outcome of a single policy evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Decision {
    ScaledUp,
    ScaledDown,
    NoAction,
    /// Metric was above the high threshold but the policy is at `max_instances`.
    AtCapacity,
    /// Metric was below the low threshold but the policy is at `min_instances`.
    AtFloor,
}

impl Decision {
    /// Returns true if the evaluation changed the instance count.
    pub fn changed_capacity(&self) -> bool {
        matches!(self, Decision::ScaledUp | Decision::ScaledDown)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Decision::ScaledUp => "SCALE UP: added instance",
            Decision::ScaledDown => "SCALE DOWN: removed instance",
            Decision::NoAction => "within acceptable range, no scaling needed",
            Decision::AtCapacity => "max instances reached, cannot scale up",
            Decision::AtFloor => "min instances reached, cannot scale down",
        };
        f.write_str(text)
    }
}

/// Holds instance bounds, CPU thresholds and the current instance count.
///
/// `min_instances <= current_instances <= max_instances` holds for the whole
/// lifetime of the policy; only [`scale_up`](Self::scale_up) and
/// [`scale_down`](Self::scale_down) change the count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalingPolicy {
    min_instances: u32,
    max_instances: u32,
    cpu_high: f64,
    cpu_low: f64,
    current_instances: u32,
}

impl ScalingPolicy {
    /// Creates a policy starting at `min_instances`.
    pub fn new(min_instances: u32, max_instances: u32, cpu_high: f64, cpu_low: f64) -> ConfigResult<Self> {
        if max_instances < min_instances {
            return Err(ConfigError::InvalidBounds { min: min_instances, max: max_instances });
        }
        check_threshold("cpu_high", cpu_high)?;
        check_threshold("cpu_low", cpu_low)?;
        if cpu_low >= cpu_high {
            return Err(ConfigError::InvalidThresholds { low: cpu_low, high: cpu_high });
        }
        Ok(Self {
            min_instances,
            max_instances,
            cpu_high,
            cpu_low,
            current_instances: min_instances,
        })
    }

    pub fn min_instances(&self) -> u32 {
        self.min_instances
    }

    pub fn max_instances(&self) -> u32 {
        self.max_instances
    }

    pub fn cpu_high(&self) -> f64 {
        self.cpu_high
    }

    pub fn cpu_low(&self) -> f64 {
        self.cpu_low
    }

    pub fn current_instances(&self) -> u32 {
        self.current_instances
    }

    /// Adds one instance unless already at `max_instances`.
    pub fn scale_up(&mut self) -> bool {
        if self.current_instances < self.max_instances {
            self.current_instances += 1;
            true
        } else {
            false
        }
    }

    /// Removes one instance unless already at `min_instances`.
    pub fn scale_down(&mut self) -> bool {
        if self.current_instances > self.min_instances {
            self.current_instances -= 1;
            true
        } else {
            false
        }
    }

    /// Compares `metric` against the thresholds and moves the instance count by
    /// at most one unit. The high threshold is checked first; both comparisons
    /// are strict.
    pub fn evaluate(&mut self, metric: f64) -> Decision {
        if metric > self.cpu_high {
            if self.scale_up() { Decision::ScaledUp } else { Decision::AtCapacity }
        } else if metric < self.cpu_low {
            if self.scale_down() { Decision::ScaledDown } else { Decision::AtFloor }
        } else {
            Decision::NoAction
        }
    }
}

fn check_threshold(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}
