use std::time::Duration;
use cloud_orchestrator::error::ConfigError;
use cloud_orchestrator::metric_source::{MetricSource, SequenceMetricSource, TraceMetricSource};
use cloud_orchestrator::metric_source::UniformMetricSource;
use cloud_orchestrator::orchestrator_config::{ConfigOverrides, MetricConfig, OrchestratorConfig};

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

#[test]
fn test_default_config() {
    let config = OrchestratorConfig::default();
    assert_eq!(config.min_instances, 2);
    assert_eq!(config.max_instances, 8);
    assert_eq!(config.cpu_high, 70.0);
    assert_eq!(config.cpu_low, 35.0);
    assert_eq!(config.iterations, 15);
    assert_eq!(config.delay_duration().unwrap(), Duration::from_secs(1));
    assert_eq!(config.metric, MetricConfig::Uniform { low: None, high: None, seed: None });
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_from_file() {
    let config = OrchestratorConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    assert_eq!(config.iterations, 6);
    assert_eq!(config.delay_duration().unwrap(), Duration::ZERO);
    assert_eq!(config.metric, MetricConfig::Trace { path: name_wrapper("cpu_trace.csv") });
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = OrchestratorConfig::from_yaml_str("max_instances: 12\nmetric:\n  type: uniform\n  seed: 7\n")
        .unwrap();
    assert_eq!(config.min_instances, 2);
    assert_eq!(config.max_instances, 12);
    assert_eq!(config.metric, MetricConfig::Uniform { low: None, high: None, seed: Some(7) });
}

#[test]
fn test_invalid_thresholds_file_rejected() {
    let err = OrchestratorConfig::from_file(&name_wrapper("invalid_thresholds.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
}

#[test]
fn test_invalid_config_values_rejected() {
    assert!(matches!(OrchestratorConfig::from_yaml_str("min_instances: 9\n"),
                     Err(ConfigError::InvalidBounds { min: 9, max: 8 })));
    assert!(matches!(OrchestratorConfig::from_yaml_str("delay: -1.0\n"),
                     Err(ConfigError::InvalidDelay(_))));
    assert!(matches!(OrchestratorConfig::from_yaml_str("metric:\n  type: sequence\n  values: []\n"),
                     Err(ConfigError::EmptySequence)));
    assert!(matches!(OrchestratorConfig::from_yaml_str("metric:\n  type: uniform\n  low: 90\n  high: 10\n"),
                     Err(ConfigError::InvalidMetricRange { .. })));
    assert!(matches!(OrchestratorConfig::from_yaml_str("cpu_hgh: 80\n"),
                     Err(ConfigError::Parse { .. })));
}

#[test]
fn test_missing_file() {
    let err = OrchestratorConfig::from_file(&name_wrapper("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_set_seed_only_affects_uniform_source() {
    let mut config = OrchestratorConfig::default();
    config.set_seed(5);
    assert_eq!(config.metric, MetricConfig::Uniform { low: None, high: None, seed: Some(5) });

    let mut config = OrchestratorConfig::default();
    config.metric = MetricConfig::Constant { value: 50.0 };
    config.set_seed(5);
    assert_eq!(config.metric, MetricConfig::Constant { value: 50.0 });
}

#[test]
fn test_trace_metric_source() {
    let mut source = TraceMetricSource::from_file(name_wrapper("cpu_trace.csv")).unwrap();
    assert_eq!(source.period(), 6);
    let values = (0..7).map(|_| source.next_metric()).collect::<Vec<f64>>();
    assert_eq!(values, vec![80.5, 91.0, 50.0, 22.4, 70.0, 35.0, 80.5]);
}

#[test]
fn test_trace_with_bad_value() {
    let path = std::env::temp_dir()
        .join(format!("cloud-orchestrator-{}-bad_trace.csv", std::process::id()));
    std::fs::write(&path, "cpu\n40\nbusy\n").unwrap();
    let err = TraceMetricSource::from_file(&path).err().unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, ConfigError::TraceValue { record: 2, .. }));
}

#[test]
fn test_sequence_metric_source_cycles() {
    assert!(matches!(SequenceMetricSource::new(Vec::default()), Err(ConfigError::EmptySequence)));
    let mut source = SequenceMetricSource::new(vec![10.0, 20.0]).unwrap();
    assert_eq!(source.next_metric(), 10.0);
    assert_eq!(source.next_metric(), 20.0);
    assert_eq!(source.next_metric(), 10.0);
}

#[test]
fn test_metric_source_serializes_description() {
    let config = OrchestratorConfig::from_yaml_str("metric:\n  type: constant\n  value: 42.5\n").unwrap();
    let source = config.build_metric_source().unwrap();
    let json = serde_json::to_value(&source).unwrap();
    assert_eq!(json["value"], 42.5);
}

#[test]
fn test_uniform_range_must_be_cpu_percentages() {
    let err = OrchestratorConfig::from_yaml_str("metric:\n  type: uniform\n  low: -1.0e308\n  high: 1.0e308\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidMetricRange { .. }));
    assert!(matches!(OrchestratorConfig::from_yaml_str("metric:\n  type: uniform\n  high: 120\n"),
                     Err(ConfigError::InvalidMetricRange { .. })));
    assert!(matches!(UniformMetricSource::new(-1.0e308, 1.0e308, Some(1)),
                     Err(ConfigError::InvalidMetricRange { .. })));
    assert!(matches!(UniformMetricSource::new(f64::NAN, 50.0, None),
                     Err(ConfigError::InvalidMetricRange { .. })));
}

#[test]
fn test_uniform_source_covers_full_percent_range() {
    let mut source = UniformMetricSource::new(0.0, 100.0, Some(3)).unwrap();
    for _ in 0..1000 {
        assert!((0.0..=100.0).contains(&source.next_metric()));
    }
    let mut point = UniformMetricSource::new(42.0, 42.0, Some(3)).unwrap();
    assert_eq!(point.next_metric(), 42.0);
}

#[test]
fn test_unrepresentable_delay_rejected() {
    assert!(matches!(OrchestratorConfig::from_yaml_str("delay: 1.0e20\n"),
                     Err(ConfigError::InvalidDelay(_))));

    let mut config = OrchestratorConfig::default();
    config.delay = f64::INFINITY;
    assert!(matches!(config.delay_duration(), Err(ConfigError::InvalidDelay(_))));
    config.delay = 0.25;
    assert_eq!(config.delay_duration().unwrap(), Duration::from_millis(250));
}

#[test]
fn test_overrides_replace_file_values() {
    let mut config = OrchestratorConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    config.apply_overrides(&ConfigOverrides { iterations: Some(2), delay: Some(0.5), seed: Some(9) }).unwrap();
    assert_eq!(config.iterations, 2);
    assert_eq!(config.delay, 0.5);
    assert_eq!(config.min_instances, 2);
    assert_eq!(config.metric, MetricConfig::Trace { path: name_wrapper("cpu_trace.csv") });
}

#[test]
fn test_empty_overrides_keep_config() {
    let mut config = OrchestratorConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    let before = config.clone();
    config.apply_overrides(&ConfigOverrides::default()).unwrap();
    assert_eq!(config, before);
}

#[test]
fn test_seed_override_makes_uniform_runs_reproducible() {
    let sample = || {
        let mut config = OrchestratorConfig::default();
        config.apply_overrides(&ConfigOverrides { seed: Some(11), ..Default::default() }).unwrap();
        let mut source = config.build_metric_source().unwrap();
        (0..20).map(|_| source.next_metric()).collect::<Vec<f64>>()
    };
    assert_eq!(sample(), sample());
}

#[test]
fn test_invalid_override_rejected() {
    let mut config = OrchestratorConfig::default();
    let err = config.apply_overrides(&ConfigOverrides { delay: Some(-2.0), ..Default::default() }).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDelay(_)));
}
