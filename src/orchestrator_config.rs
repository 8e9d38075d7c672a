//! Orchestrator configuration.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{ConfigError, ConfigResult};
use crate::metric_source::{check_metric_range, ConstantMetricSource, MetricSource, SequenceMetricSource,
                           TraceMetricSource, UniformMetricSource};
use crate::scaling_policy::ScalingPolicy;

pub const DEFAULT_MIN_INSTANCES: u32 = 2;
pub const DEFAULT_MAX_INSTANCES: u32 = 8;
pub const DEFAULT_CPU_HIGH: f64 = 70.0;
pub const DEFAULT_CPU_LOW: f64 = 35.0;
pub const DEFAULT_ITERATIONS: u64 = 15;
pub const DEFAULT_DELAY: f64 = 1.0;
pub const DEFAULT_METRIC_LOW: f64 = 20.0;
pub const DEFAULT_METRIC_HIGH: f64 = 95.0;

/// Where CPU samples come from.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetricConfig {
    /// Uniform random samples, `[20, 95]` unless overridden.
    Uniform {
        low: Option<f64>,
        high: Option<f64>,
        seed: Option<u64>,
    },
    Constant { value: f64 },
    Sequence { values: Vec<f64> },
    /// CSV trace file, see [`TraceMetricSource`].
    Trace { path: String },
}

impl Default for MetricConfig {
    fn default() -> Self {
        MetricConfig::Uniform { low: None, high: None, seed: None }
    }
}

/// Holds raw orchestrator config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
struct RawOrchestratorConfig {
    pub min_instances: Option<u32>,
    pub max_instances: Option<u32>,
    pub cpu_high: Option<f64>,
    pub cpu_low: Option<f64>,
    pub iterations: Option<u64>,
    pub delay: Option<f64>,
    pub metric: Option<MetricConfig>,
}

/// Represents orchestrator configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Lower bound of the instance count, also the starting count.
    pub min_instances: u32,
    /// Upper bound of the instance count.
    pub max_instances: u32,
    /// CPU percentage above which an instance is added.
    pub cpu_high: f64,
    /// CPU percentage below which an instance is removed.
    pub cpu_low: f64,
    /// Number of orchestration cycles in a run.
    pub iterations: u64,
    /// Pause between cycles in seconds.
    pub delay: f64,
    pub metric: MetricConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_instances: DEFAULT_MIN_INSTANCES,
            max_instances: DEFAULT_MAX_INSTANCES,
            cpu_high: DEFAULT_CPU_HIGH,
            cpu_low: DEFAULT_CPU_LOW,
            iterations: DEFAULT_ITERATIONS,
            delay: DEFAULT_DELAY,
            metric: MetricConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn from_file(file_name: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(file_name)
            .map_err(|source| ConfigError::Read { path: file_name.to_string(), source })?;
        let raw: RawOrchestratorConfig = serde_yaml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: file_name.to_string(), source })?;
        Self::from_raw(raw)
    }

    /// Parses a YAML document; missing keys take default values.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let raw: RawOrchestratorConfig = serde_yaml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: "<inline>".to_string(), source })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawOrchestratorConfig) -> ConfigResult<Self> {
        let config = Self {
            min_instances: raw.min_instances.unwrap_or(DEFAULT_MIN_INSTANCES),
            max_instances: raw.max_instances.unwrap_or(DEFAULT_MAX_INSTANCES),
            cpu_high: raw.cpu_high.unwrap_or(DEFAULT_CPU_HIGH),
            cpu_low: raw.cpu_low.unwrap_or(DEFAULT_CPU_LOW),
            iterations: raw.iterations.unwrap_or(DEFAULT_ITERATIONS),
            delay: raw.delay.unwrap_or(DEFAULT_DELAY),
            metric: raw.metric.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> ConfigResult<()> {
        self.build_policy()?;
        self.delay_duration()?;
        match &self.metric {
            MetricConfig::Uniform { low, high, .. } => {
                check_metric_range(low.unwrap_or(DEFAULT_METRIC_LOW), high.unwrap_or(DEFAULT_METRIC_HIGH))?;
            }
            MetricConfig::Sequence { values } if values.is_empty() => return Err(ConfigError::EmptySequence),
            _ => {}
        }
        Ok(())
    }

    pub fn build_policy(&self) -> ConfigResult<ScalingPolicy> {
        ScalingPolicy::new(self.min_instances, self.max_instances, self.cpu_high, self.cpu_low)
    }

    pub fn build_metric_source(&self) -> ConfigResult<Box<dyn MetricSource>> {
        let source: Box<dyn MetricSource> = match &self.metric {
            MetricConfig::Uniform { low, high, seed } => Box::new(UniformMetricSource::new(
                low.unwrap_or(DEFAULT_METRIC_LOW),
                high.unwrap_or(DEFAULT_METRIC_HIGH),
                *seed,
            )?),
            MetricConfig::Constant { value } => Box::new(ConstantMetricSource::new(*value)),
            MetricConfig::Sequence { values } => Box::new(SequenceMetricSource::new(values.clone())?),
            MetricConfig::Trace { path } => Box::new(TraceMetricSource::from_file(path)?),
        };
        Ok(source)
    }

    /// Overrides the seed of a uniform metric source; other sources are deterministic already.
    pub fn set_seed(&mut self, new_seed: u64) {
        if let MetricConfig::Uniform { seed, .. } = &mut self.metric {
            *seed = Some(new_seed);
        }
    }

    /// Applies command-line values on top of the file (or default) configuration
    /// and validates the result.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> ConfigResult<()> {
        if let Some(iterations) = overrides.iterations {
            self.iterations = iterations;
        }
        if let Some(delay) = overrides.delay {
            self.delay = delay;
        }
        if let Some(seed) = overrides.seed {
            self.set_seed(seed);
        }
        self.validate()
    }

    /// Fails with `InvalidDelay` for negative, non-finite or unrepresentable delays.
    pub fn delay_duration(&self) -> ConfigResult<Duration> {
        Duration::try_from_secs_f64(self.delay).map_err(|_| ConfigError::InvalidDelay(self.delay))
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ConfigOverrides {
    pub iterations: Option<u64>,
    pub delay: Option<f64>,
    pub seed: Option<u64>,
}
