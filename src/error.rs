//! Configuration errors.

use thiserror::Error;

/// Errors raised while building an orchestrator from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_instances ({max}) must not be less than min_instances ({min})")]
    InvalidBounds { min: u32, max: u32 },

    #[error("cpu_low ({low}) must be strictly less than cpu_high ({high})")]
    InvalidThresholds { low: f64, high: f64 },

    #[error("{name} ({value}) must be within [0, 100]")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("metric range [{low}, {high}] is empty or not finite")]
    InvalidMetricRange { low: f64, high: f64 },

    #[error("metric sequence must contain at least one value")]
    EmptySequence,

    #[error("delay ({0}) must be a finite, non-negative number of seconds")]
    InvalidDelay(f64),

    #[error("can't read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse YAML from file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("can't read metric trace {path}: {source}")]
    Trace {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("metric trace {path}, record {record}: '{value}' is not a number")]
    TraceValue { path: String, record: u64, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
