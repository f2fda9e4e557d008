use seine_infer::{InferConfig, SearchOrder};

#[test]
fn an_empty_document_yields_the_defaults() {
    let config: InferConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.enumerate.max_executions, 1000);
    assert_eq!(config.enumerate.order, SearchOrder::LikelyFirst);
    assert_eq!(config.smc.particles, 100);
    assert!(config.seed_policy.label.is_none());
}

#[test]
fn fields_override_independently() {
    let doc = r#"
seed_policy:
  master_seed: 99
  label: regression
enumerate:
  order: depth-first
smc:
  particles: 2000
"#;
    let config: InferConfig = serde_yaml::from_str(doc).unwrap();
    assert_eq!(config.seed_policy.master_seed, 99);
    assert_eq!(config.seed_policy.label.as_deref(), Some("regression"));
    assert_eq!(config.enumerate.order, SearchOrder::DepthFirst);
    assert_eq!(config.enumerate.max_executions, 1000);
    assert_eq!(config.smc.particles, 2000);
}

#[test]
fn configs_roundtrip_through_yaml() {
    let config = InferConfig::default();
    let doc = serde_yaml::to_string(&config).unwrap();
    let back: InferConfig = serde_yaml::from_str(&doc).unwrap();
    assert_eq!(back.enumerate.max_executions, config.enumerate.max_executions);
    assert_eq!(back.enumerate.order, config.enumerate.order);
    assert_eq!(back.smc.particles, config.smc.particles);
    assert_eq!(back.seed_policy.master_seed, config.seed_policy.master_seed);
}
