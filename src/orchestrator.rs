use std::time::Duration;
use log::info;
use serde::Serialize;
use crate::decision_logger::{DecisionLogger, EvaluationRecord};
use crate::error::ConfigResult;
use crate::metric_source::MetricSource;
use crate::orchestrator_config::OrchestratorConfig;
use crate::scaling_policy::{Decision, ScalingPolicy};

const BANNER_WIDTH: usize = 70;

/// Per-run decision counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub iterations: u64,
    pub final_instances: u32,
    pub scaled_up: u64,
    pub scaled_down: u64,
    pub at_capacity: u64,
    pub at_floor: u64,
    pub no_action: u64,
}

impl RunSummary {
    fn count(&mut self, decision: Decision) {
        match decision {
            Decision::ScaledUp => self.scaled_up += 1,
            Decision::ScaledDown => self.scaled_down += 1,
            Decision::AtCapacity => self.at_capacity += 1,
            Decision::AtFloor => self.at_floor += 1,
            Decision::NoAction => self.no_action += 1,
        }
    }
}

/// Drives a scaling policy with samples from a metric source.
pub struct Orchestrator {
    policy: ScalingPolicy,
    metric_source: Box<dyn MetricSource>,
    decision_logger: Box<dyn DecisionLogger>,

    last_iteration: u64,
}

impl Orchestrator {
    pub fn new(policy: ScalingPolicy, metric_source: Box<dyn MetricSource>,
               decision_logger: Box<dyn DecisionLogger>) -> Self {
        Self {
            policy,
            metric_source,
            decision_logger,
            last_iteration: 0,
        }
    }

    /// Builds the policy and metric source described by `config`.
    pub fn from_config(config: &OrchestratorConfig, decision_logger: Box<dyn DecisionLogger>) -> ConfigResult<Self> {
        Ok(Self::new(config.build_policy()?, config.build_metric_source()?, decision_logger))
    }

    pub fn current_instances(&self) -> u32 {
        self.policy.current_instances()
    }

    /// Runs one cycle: samples the metric, evaluates the policy and logs the decision.
    pub fn step(&mut self) -> EvaluationRecord {
        self.last_iteration += 1;
        let metric = self.metric_source.next_metric();
        let instances_before = self.policy.current_instances();
        let decision = self.policy.evaluate(metric);
        let record = EvaluationRecord::new(self.last_iteration, metric, decision, instances_before, &self.policy);
        self.decision_logger.log_decision(&record);
        record
    }

    /// Performs `iterations` cycles, sleeping `delay` between consecutive ones.
    pub fn run(&mut self, iterations: u64, delay: Duration) -> RunSummary {
        self.log_banner();

        let mut summary = RunSummary::default();
        for i in 0..iterations {
            info!("--- Iteration {}/{} ---", i + 1, iterations);
            let record = self.step();
            summary.count(record.decision);
            summary.iterations += 1;
            if i + 1 < iterations && !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
        summary.final_instances = self.policy.current_instances();

        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Orchestration cycle completed. Final instances: {}", summary.final_instances);
        info!("{}", "=".repeat(BANNER_WIDTH));
        summary
    }

    /// Saves the decision log of the run to `path`.
    pub fn finish(&mut self, path: &str) -> Result<(), std::io::Error> {
        self.decision_logger.save_log(path)
    }

    fn log_banner(&self) {
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Cloud Resource Orchestration System - Auto Scaling");
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Configuration:");
        info!("  Min Instances: {}", self.policy.min_instances());
        info!("  Max Instances: {}", self.policy.max_instances());
        info!("  CPU High Threshold: {}%", self.policy.cpu_high());
        info!("  CPU Low Threshold: {}%", self.policy.cpu_low());
        info!("{}", "=".repeat(BANNER_WIDTH));
    }
}
