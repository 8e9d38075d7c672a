use std::fs::File;
use std::io::{BufWriter, Error, Write};
use log::{log, Level};
use serde::Serialize;
use crate::scaling_policy::{Decision, ScalingPolicy};

/// Result of one orchestration cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationRecord {
    /// 1-based cycle number.
    pub iteration: u64,
    /// Local wall-clock time of the evaluation, RFC 3339.
    pub timestamp: String,
    pub metric: f64,
    pub decision: Decision,
    pub instances_before: u32,
    pub instances: u32,
    pub cpu_high: f64,
    pub cpu_low: f64,
}

impl EvaluationRecord {
    /// Builds the record of an evaluation that has just been applied to `policy`.
    pub fn new(iteration: u64, metric: f64, decision: Decision, instances_before: u32,
               policy: &ScalingPolicy) -> Self {
        Self {
            iteration,
            timestamp: chrono::Local::now().to_rfc3339(),
            metric,
            decision,
            instances_before,
            instances: policy.current_instances(),
            cpu_high: policy.cpu_high(),
            cpu_low: policy.cpu_low(),
        }
    }
}

pub trait DecisionLogger {
    fn log_decision(&mut self, record: &EvaluationRecord);
    fn save_log(&mut self, path: &str) -> Result<(), Error>;
}

pub struct EmptyDecisionLogger {}

impl DecisionLogger for EmptyDecisionLogger {
    fn log_decision(&mut self, _record: &EvaluationRecord) {}

    fn save_log(&mut self, _path: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// Renders every decision through the `log` facade.
#[derive(Default)]
pub struct StdoutDecisionLogger {}

impl StdoutDecisionLogger {
    pub fn new() -> Self {
        Default::default()
    }

    /// Console lines for one record: the sample, the threshold crossed (if any)
    /// and the outcome.
    pub fn render(record: &EvaluationRecord) -> Vec<(Level, String)> {
        let mut lines = vec![
            (Level::Info, format!("Current CPU: {:.2}% | Instances: {}", record.metric, record.instances_before)),
        ];
        match record.decision {
            Decision::ScaledUp | Decision::AtCapacity => lines.push((Level::Info, format!(
                "CPU usage ({:.2}%) exceeds high threshold ({}%)", record.metric, record.cpu_high))),
            Decision::ScaledDown | Decision::AtFloor => lines.push((Level::Info, format!(
                "CPU usage ({:.2}%) below low threshold ({}%)", record.metric, record.cpu_low))),
            Decision::NoAction => {}
        }
        lines.push(match record.decision {
            Decision::ScaledUp | Decision::ScaledDown => {
                (Level::Info, format!("{}. Total instances: {}", record.decision, record.instances))
            }
            Decision::AtCapacity | Decision::AtFloor => (Level::Warn, record.decision.to_string()),
            Decision::NoAction => (Level::Info, format!("CPU usage {}", record.decision)),
        });
        lines
    }
}

impl DecisionLogger for StdoutDecisionLogger {
    fn log_decision(&mut self, record: &EvaluationRecord) {
        for (level, line) in Self::render(record) {
            log!(level, "{}", line);
        }
    }

    fn save_log(&mut self, _path: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// Keeps the decision history of a run and writes it out as JSON.
#[derive(Default)]
pub struct FileDecisionLogger {
    history: Vec<EvaluationRecord>,
}

impl FileDecisionLogger {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn history(&self) -> &[EvaluationRecord] {
        &self.history
    }
}

impl DecisionLogger for FileDecisionLogger {
    fn log_decision(&mut self, record: &EvaluationRecord) {
        self.history.push(record.clone());
    }

    fn save_log(&mut self, path: &str) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.history)?;
        writer.flush()
    }
}

/// Forwards each record to several loggers, e.g. console output plus a report file.
///
/// `save_log` hands the same path to every child, so at most one child may be a
/// file-writing logger.
#[derive(Default)]
pub struct CompositeDecisionLogger {
    loggers: Vec<Box<dyn DecisionLogger>>,
}

impl CompositeDecisionLogger {
    pub fn new(loggers: Vec<Box<dyn DecisionLogger>>) -> Self {
        Self { loggers }
    }
}

impl DecisionLogger for CompositeDecisionLogger {
    fn log_decision(&mut self, record: &EvaluationRecord) {
        for logger in self.loggers.iter_mut() {
            logger.log_decision(record);
        }
    }

    fn save_log(&mut self, path: &str) -> Result<(), Error> {
        for logger in self.loggers.iter_mut() {
            logger.save_log(path)?;
        }
        Ok(())
    }
}
