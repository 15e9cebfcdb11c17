//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use crate::config::{AlphabetConfig, AppConfig, ConfigLoader, LogConfig, Validate};
use crate::data_structures::double_array_trie::{ArcDomain, DatrieConfig};
use crate::error::config::ConfigError;
use crate::tests::test_utils::TestFixture;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.trie, DatrieConfig::default());
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = AppConfig::default();

    config.trie.initial_states = 1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));

    config.trie.initial_states = 64;
    config.log.level = "loud".to_string();
    assert!(config.validate().is_err());

    config.log = LogConfig::default();
    config.alphabet.stop = "##".to_string();
    assert!(config.validate().is_err());

    config.alphabet = AlphabetConfig {
        stop: "#".to_string(),
        symbols: "abca".to_string(),
    };
    assert!(config.validate().is_err());
}

/// Test that the configured alphabet becomes a usable domain.
#[test]
fn test_alphabet_config_builds_domain() {
    let alphabet = AlphabetConfig {
        stop: "$".to_string(),
        symbols: "xyz".to_string(),
    }
    .build()
    .unwrap();
    assert_eq!(alphabet.stop_symbol(), '$');
    assert_eq!(alphabet.code('z').unwrap(), 3);
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write(
            "dactrie.toml",
            r#"
    [trie]
    initial_states = 512
    reclaim_empty_branches = false

    [alphabet]
    symbols = "acgt"

    [log]
    level = "debug"
    "#,
        )
        .unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_FILE").load().unwrap();

    assert_eq!(config.trie.initial_states, 512);
    assert!(!config.trie.reclaim_empty_branches);
    assert_eq!(config.alphabet.symbols, "acgt");
    assert_eq!(config.log.level, "debug");

    // Other values should be defaults
    assert_eq!(config.trie.initial_tail, 256);
    assert_eq!(config.alphabet.stop, "#");
    assert!(!config.log.json);
}

/// Test loading a JSON configuration file.
#[test]
fn test_load_config_from_json() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write("dactrie.json", r#"{ "log": { "json": true } }"#)
        .unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_JSON").load().unwrap();
    assert!(config.log.json);
    assert_eq!(config.trie, DatrieConfig::default());
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write("env.toml", "[trie]\ninitial_states = 128\n")
        .unwrap();

    std::env::set_var("TEST_ENV__TRIE__INITIAL_STATES", "1024");
    let config = ConfigLoader::new(Some(&config_path), "TEST_ENV").load();
    std::env::remove_var("TEST_ENV__TRIE__INITIAL_STATES");

    assert_eq!(config.unwrap().trie.initial_states, 1024);
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write("invalid.toml", "[trie\ninitial_states = ")
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INVALID");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that values failing validation are rejected at load time.
#[test]
fn test_load_rejects_invalid_values() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write("zero.toml", "[trie]\ninitial_tail = 0\n")
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_ZERO");
    assert!(matches!(
        loader.load(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));
}

/// Test missing and unsupported files.
#[test]
fn test_missing_and_unsupported_files() {
    let fixture = TestFixture::new().unwrap();

    let missing = fixture.temp_dir.path().join("absent.toml");
    let loader = ConfigLoader::new(Some(&missing), "TEST_MISSING");
    assert!(matches!(loader.load(), Err(ConfigError::FileNotFound(_))));

    let ini = fixture.write("dactrie.ini", "[trie]\n").unwrap();
    let loader = ConfigLoader::new(Some(&ini), "TEST_INI");
    assert!(matches!(loader.load(), Err(ConfigError::UnsupportedFormat(_))));
}

/// Test that the default configuration survives a TOML round trip.
#[test]
fn test_generated_config_loads_back() {
    let fixture = TestFixture::new().unwrap();
    let toml = toml::to_string_pretty(&AppConfig::default()).unwrap();
    let config_path = fixture.write("generated.toml", &toml).unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_GENERATED").load().unwrap();
    assert_eq!(config, AppConfig::default());
}
