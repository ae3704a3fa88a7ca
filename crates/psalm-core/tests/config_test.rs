use std::collections::HashMap;

use psalm_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = PsalmConfig::from_toml("").unwrap();

    assert_eq!(config.embedding.provider, "ollama");
    assert_eq!(config.embedding.model, "nomic-embed-text");
    assert_eq!(config.embedding.base_url, "http://localhost:11434");
    assert_eq!(config.embedding.timeout_secs, 120);
    assert_eq!(config.embedding.dimensions, None);

    assert_eq!(config.generation.model, "llama3:8b");
    assert!(config.generation.system_prompt.contains("journaling questions"));

    assert_eq!(config.index.path, "storage/psalms_index.json");
    assert_eq!(config.index.staleness_policy, StalenessPolicy::Warn);

    assert_eq!(config.chunking.block_verses, 8);
    assert_eq!(config.chunking.whole_if_at_most, 10);
    assert!(config.chunking.include_verse_numbers);

    assert_eq!(config.retrieval.default_k, 5);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[embedding]
provider = "hashing"
dimensions = 64

[index]
staleness_policy = "refuse"
"#;
    let config = PsalmConfig::from_toml(toml).unwrap();
    assert_eq!(config.embedding.provider, "hashing");
    assert_eq!(config.embedding.dimensions, Some(64));
    // Non-overridden fields keep defaults
    assert_eq!(config.embedding.model, "nomic-embed-text");
    assert_eq!(config.index.staleness_policy, StalenessPolicy::Refuse);
    assert_eq!(config.index.path, "storage/psalms_index.json");
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = PsalmConfig::from_toml("[embedding\nprovider=").unwrap_err();
    assert!(matches!(err, psalm_core::PsalmError::ConfigError { .. }));
}

#[test]
fn env_overrides_apply_to_both_capabilities() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("OLLAMA_HOST", "http://gpu-box:11434/"),
        ("OLLAMA_EMBED_MODEL", "mxbai-embed-large"),
        ("OLLAMA_LLM_MODEL", "mistral"),
        ("INDEX_PATH", "/var/lib/psalms.json"),
        ("PSALM_TIMEOUT_SECS", "15"),
    ]);
    let config = PsalmConfig::default()
        .apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.embedding.base_url, "http://gpu-box:11434");
    assert_eq!(config.generation.base_url, "http://gpu-box:11434");
    assert_eq!(config.embedding.model, "mxbai-embed-large");
    assert_eq!(config.generation.model, "mistral");
    assert_eq!(config.index.path, "/var/lib/psalms.json");
    assert_eq!(config.embedding.timeout_secs, 15);
    assert_eq!(config.generation.timeout_secs, 15);
}

#[test]
fn non_numeric_timeout_override_is_rejected() {
    let result = PsalmConfig::default().apply_env_overrides(|k| {
        (k == "PSALM_TIMEOUT_SECS").then(|| "soon".to_string())
    });
    assert!(result.is_err());
}

#[test]
fn config_serde_roundtrip() {
    let config = PsalmConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = PsalmConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.index.path, config.index.path);
    assert_eq!(roundtripped.generation.model, config.generation.model);
}
