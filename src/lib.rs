pub mod cli;
pub mod decision_logger;
pub mod error;
pub mod logger;
pub mod metric_source;
pub mod orchestrator;
pub mod orchestrator_config;
pub mod scaling_policy;
pub mod shared_policy;
