// redactum-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use redactum_core::config::{self, RegexRule, ScrubberConfig};
use redactum_core::{Catalog, CleanOptions, Scrubber, ScrubError};

#[test]
fn test_load_default_rules() {
    let config = ScrubberConfig::load_default_rules().unwrap();
    assert!(!config.rules.is_empty());
    assert!(config.rules.iter().any(|r| r.name == "email"));
    let email_rule = config.rules.iter().find(|r| r.name == "email").unwrap();
    assert!(!email_rule.programmatic_validation);
    let nino = config.rules.iter().find(|r| r.name == "uk_nino").unwrap();
    assert!(nino.opt_in);
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
rules:
  - name: test_rule
    kind: secret
    pattern: "test"
    description: "A test rule"
    programmatic_validation: true # Explicitly set
detectors: ["test_rule"]
transforms: ["kind_replacer", "prefix_suffix"]
options:
  placeholder_prefix: "<"
  placeholder_suffix: ">"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = ScrubberConfig::load_from_file(file.path())?;
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.rules[0].name, "test_rule");
    assert_eq!(config.rules[0].kind(), "secret");
    assert!(config.rules[0].programmatic_validation);
    assert_eq!(config.detectors, Some(vec!["test_rule".to_string()]));
    assert_eq!(config.options.placeholder_prefix, "<");
    assert!(config.options.uppercase);
    Ok(())
}

#[test]
fn test_load_from_file_rejects_invalid_regex() -> Result<()> {
    let yaml_content = r#"
rules:
  - name: broken
    pattern: "(unclosed"
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = ScrubberConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ScrubError::Config(_)));
    assert!(err.to_string().contains("Rule 'broken' has an invalid regex pattern"));
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ScrubberConfig::load_from_file("/definitely/not/here/redactum.yaml").unwrap_err();
    assert!(matches!(err, ScrubError::Io(_)));
}

#[test]
fn test_merge_rules_no_user_config() {
    let default_config = ScrubberConfig {
        rules: vec![RegexRule::new("email", "old@example.com")],
        ..Default::default()
    };
    let merged = config::merge_rules(default_config.clone(), None);
    assert_eq!(merged, default_config);
}

#[test]
fn test_merge_rules_override_and_append() {
    let default_config = ScrubberConfig {
        rules: vec![
            RegexRule::new("email", "default@example.com"),
            RegexRule::new("ipv4", r"\d+\.\d+\.\d+\.\d+"),
        ],
        ..Default::default()
    };
    let user_config = ScrubberConfig {
        rules: vec![
            RegexRule::new("custom", "custom"),
            RegexRule::new("email", "user@example.com"),
        ],
        detectors: Some(vec!["email".to_string()]),
        ..Default::default()
    };
    let merged = config::merge_rules(default_config, Some(user_config));
    let names: Vec<&str> = merged.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["email", "ipv4", "custom"]);
    assert_eq!(merged.rules[0].pattern.as_deref(), Some("user@example.com"));
    assert_eq!(merged.detectors, Some(vec!["email".to_string()]));
}

#[test]
fn test_discover_explicit_path_merges_over_defaults() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"rules:\n  - name: ticket\n    pattern: 'TICKET-\\d+'\n")?;
    let config = ScrubberConfig::discover(Some(file.path()))?;
    assert!(config.rules.iter().any(|r| r.name == "email"));
    assert!(config.rules.iter().any(|r| r.name == "ticket"));
    Ok(())
}

#[test]
fn test_config_drives_scrubber() -> Result<()> {
    let yaml = r#"
rules:
  - name: ticket
    kind: ticket_id
    pattern: 'TICKET-\d+'
  - name: hidden
    pattern: 'hidden'
    opt_in: true
"#;
    let config = ScrubberConfig::from_yaml(yaml)?;
    let scrubber = Scrubber::from_config(&config)?;
    assert_eq!(scrubber.detectors().names(), vec!["ticket"]);
    assert!(scrubber.transforms().is_empty());
    let out = scrubber.clean("see TICKET-42, hidden", &CleanOptions::default())?;
    assert_eq!(out, "see {{TICKET_ID}}, hidden");
    Ok(())
}

#[test]
fn test_token_config_with_bad_seed_fails_catalog_build() {
    let yaml = "token:\n  seed_hex: 'not-hex'\n";
    let config = ScrubberConfig::from_yaml(yaml).unwrap();
    assert!(matches!(Catalog::from_config(&config), Err(ScrubError::Config(_))));
}
