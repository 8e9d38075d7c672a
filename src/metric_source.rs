//! Metric sources.

use std::path::Path;
use erased_serde::serialize_trait_object;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use crate::error::{ConfigError, ConfigResult};

/// A metric source supplies the CPU utilization (in percent) observed at the
/// start of each orchestration cycle.
pub trait MetricSource: erased_serde::Serialize {
    fn next_metric(&mut self) -> f64;
}

serialize_trait_object!(MetricSource);

/// Checks that `[low, high]` is a non-empty range of CPU percentages.
pub fn check_metric_range(low: f64, high: f64) -> ConfigResult<()> {
    let within_percent = |value: f64| value.is_finite() && (0.0..=100.0).contains(&value);
    if within_percent(low) && within_percent(high) && low <= high {
        Ok(())
    } else {
        Err(ConfigError::InvalidMetricRange { low, high })
    }
}

/// Samples uniformly from `[low, high]`, a sub-range of `[0, 100]`.
#[derive(Clone, Serialize)]
pub struct UniformMetricSource {
    low: f64,
    high: f64,
    seed: Option<u64>,
    #[serde(skip)]
    distribution: Uniform<f64>,
    #[serde(skip)]
    rng: StdRng,
}

impl UniformMetricSource {
    /// Without a seed the generator is initialized from OS entropy.
    pub fn new(low: f64, high: f64, seed: Option<u64>) -> ConfigResult<Self> {
        check_metric_range(low, high)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { low, high, seed, distribution: Uniform::new_inclusive(low, high), rng })
    }
}

impl MetricSource for UniformMetricSource {
    fn next_metric(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

#[derive(Clone, Serialize)]
pub struct ConstantMetricSource {
    value: f64,
}

impl ConstantMetricSource {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl MetricSource for ConstantMetricSource {
    fn next_metric(&mut self) -> f64 {
        self.value
    }
}

/// Replays a fixed list of values, starting over after the last one.
#[derive(Clone, Serialize)]
pub struct SequenceMetricSource {
    values: Vec<f64>,
    #[serde(skip)]
    now_ptr: usize,
}

impl SequenceMetricSource {
    pub fn new(values: Vec<f64>) -> ConfigResult<Self> {
        if values.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        Ok(Self { values, now_ptr: 0 })
    }

    /// Number of values replayed before the sequence starts over.
    pub fn period(&self) -> usize {
        self.values.len()
    }
}

impl MetricSource for SequenceMetricSource {
    fn next_metric(&mut self) -> f64 {
        let value = self.values[self.now_ptr];
        self.now_ptr = (self.now_ptr + 1) % self.values.len();
        value
    }
}

/// Replays CPU samples recorded in a CSV file.
///
/// The file must have a header row. Values are taken from the `cpu` column if
/// there is one, otherwise from the first column.
#[derive(Clone, Serialize)]
pub struct TraceMetricSource {
    path: String,
    samples: SequenceMetricSource,
}

impl TraceMetricSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_str = path.as_ref().display().to_string();
        let trace_error = |source| ConfigError::Trace { path: path_str.clone(), source };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())
            .map_err(trace_error)?;
        let column = reader.headers()
            .map_err(trace_error)?
            .iter()
            .position(|name| name.eq_ignore_ascii_case("cpu"))
            .unwrap_or(0);

        let mut values = Vec::default();
        for (record_idx, record) in reader.records().enumerate() {
            let record = record.map_err(trace_error)?;
            let raw = record.get(column).unwrap_or_default();
            let value = raw.parse::<f64>().map_err(|_| ConfigError::TraceValue {
                path: path_str.clone(),
                record: record_idx as u64 + 1,
                value: raw.to_string(),
            })?;
            values.push(value);
        }

        Ok(Self { samples: SequenceMetricSource::new(values)?, path: path_str })
    }

    pub fn period(&self) -> usize {
        self.samples.period()
    }
}

impl MetricSource for TraceMetricSource {
    fn next_metric(&mut self) -> f64 {
        self.samples.next_metric()
    }
}
