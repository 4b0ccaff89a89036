//! Configuration management for `redactum-core`.
//!
//! This module defines the data structures for regex detection rules and
//! for the scrubber as a whole (which plugins to load, placeholder options,
//! token settings). It handles YAML (de)serialization and provides
//! utilities for loading, merging, and validating these configs.
//!
//! License: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ScrubError};
use crate::options::CleanOptions;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// File name looked up in the candidate configuration directories.
pub const CONFIG_FILE_NAME: &str = "redactum.yaml";

/// A single regex-backed detection rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegexRule {
    /// Unique identifier for the rule, also the detector name (e.g. "email").
    pub name: String,
    /// Label given to every span the rule finds; defaults to `name`.
    pub kind: Option<String>,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    /// If true, enables multiline mode for the regex engine.
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// If true, the rule is not loaded unless explicitly named.
    pub opt_in: bool,
    /// If true, matches must also pass a programmatic validator (e.g. Luhn).
    pub programmatic_validation: bool,
    /// If true, the pattern runs over ANSI-stripped text.
    pub strip_ansi: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    /// Metadata tags for categorization.
    pub tags: Option<Vec<String>>,
}

impl Default for RegexRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: None,
            description: None,
            pattern: None,
            multiline: false,
            dot_matches_new_line: false,
            opt_in: false,
            programmatic_validation: false,
            strip_ansi: false,
            enabled: None,
            tags: None,
        }
    }
}

impl Hash for RegexRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
        self.pattern.hash(state);
        self.multiline.hash(state);
        self.dot_matches_new_line.hash(state);
        self.programmatic_validation.hash(state);
        self.strip_ansi.hash(state);
    }
}

impl RegexRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: Some(pattern.into()),
            ..Default::default()
        }
    }

    /// The span kind this rule produces.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(&self.name)
    }
}

/// Settings for the `token_replacer` transform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// TinyTemplate format; `{kind}` and `{shorthash}` are available.
    pub token_format: String,
    /// Hex-encoded key mixed into every token. Tokens are only stable across
    /// runs that share the key.
    pub seed_hex: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_format: "{kind}-{shorthash}".to_string(),
            seed_hex: None,
        }
    }
}

/// Top-level configuration for a scrubber.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScrubberConfig {
    /// Regex rules; each becomes a catalog detector entry.
    pub rules: Vec<RegexRule>,
    /// Detectors to load by name. `None` loads every autoload entry.
    pub detectors: Option<Vec<String>>,
    /// Transforms to load by name, in order. `None` loads autoload entries.
    pub transforms: Option<Vec<String>>,
    /// Options forwarded to replacement computation.
    pub options: CleanOptions,
    /// Overrides for the token transform.
    pub token: Option<TokenConfig>,
}

impl ScrubberConfig {
    /// Loads a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)
            .map_err(|e| ScrubError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: ScrubberConfig =
            serde_yml::from_str(text).map_err(|e| ScrubError::Config(format!("failed to parse YAML: {}", e)))?;
        validate_rules(&config.rules)?;
        Ok(config)
    }

    /// Loads the rules embedded in the library.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: ScrubberConfig = serde_yml::from_str(default_yaml)
            .map_err(|e| ScrubError::Config(format!("failed to parse default rules: {}", e)))?;
        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Resolves the configuration to use: an explicit path, else the first
    /// candidate file that exists, else the embedded defaults. User files are
    /// merged over the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Self::load_default_rules()?;
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => config_candidate_paths().into_iter().find(|p| p.is_file()),
        };
        match path {
            Some(p) => Ok(merge_rules(defaults, Some(Self::load_from_file(&p)?))),
            None => {
                debug!("No configuration file found; using embedded defaults.");
                Ok(defaults)
            }
        }
    }
}

/// Locations searched for `redactum.yaml`, most specific first.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let base_dirs = vec![
        Some(PathBuf::from(".")),
        dirs::config_dir().map(|p| p.join("redactum")),
        dirs::home_dir().map(|p| p.join(".redactum")),
        Some(PathBuf::from("/etc/redactum")),
    ];

    base_dirs
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .collect()
}

/// Merges a user configuration over the defaults. Rules are replaced by
/// name; every other field set in the user config wins.
pub fn merge_rules(default_config: ScrubberConfig, user_config: Option<ScrubberConfig>) -> ScrubberConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());

    let Some(user_cfg) = user_config else {
        return default_config;
    };

    let mut order: Vec<String> = default_config.rules.iter().map(|r| r.name.clone()).collect();
    let mut final_rules_map: HashMap<String, RegexRule> = default_config
        .rules
        .into_iter()
        .map(|rule| (rule.name.clone(), rule))
        .collect();

    debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
    for user_rule in user_cfg.rules {
        if !final_rules_map.contains_key(&user_rule.name) {
            order.push(user_rule.name.clone());
        }
        final_rules_map.insert(user_rule.name.clone(), user_rule);
    }

    let rules: Vec<RegexRule> = order
        .into_iter()
        .filter_map(|name| final_rules_map.remove(&name))
        .collect();
    debug!("Final total rules after merge: {}", rules.len());

    ScrubberConfig {
        rules,
        detectors: user_cfg.detectors.or(default_config.detectors),
        transforms: user_cfg.transforms.or(default_config.transforms),
        options: user_cfg.options,
        token: user_cfg.token.or(default_config.token),
    }
}

/// Validates rule integrity (names, pattern presence, length and syntax).
fn validate_rules(rules: &[RegexRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        let pattern = match &rule.pattern {
            Some(p) if !p.is_empty() => p,
            _ => {
                errors.push(format!("Rule '{}' is missing the `pattern` field.", rule.name));
                continue;
            }
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        if let Err(e) = regex::Regex::new(pattern) {
            errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
        }

        if rule.enabled == Some(false) && !rule.opt_in {
            warn!("Rule '{}' is disabled and will not be autoloaded.", rule.name);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ScrubError::Config(format!("Rule validation failed:\n{}", errors.join("\n"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_defaults_to_name() {
        let rule = RegexRule::new("email", "x");
        assert_eq!(rule.kind(), "email");
        let rule = RegexRule { kind: Some("EMAIL".to_string()), ..rule };
        assert_eq!(rule.kind(), "EMAIL");
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_patterns() {
        let rules = vec![
            RegexRule::new("a", "x"),
            RegexRule::new("a", "y"),
            RegexRule::new("b", "("),
            RegexRule { name: "c".to_string(), ..Default::default() },
        ];
        let err = validate_rules(&rules).unwrap_err().to_string();
        assert!(err.contains("Duplicate rule name found: 'a'"));
        assert!(err.contains("Rule 'b' has an invalid regex pattern"));
        assert!(err.contains("Rule 'c' is missing the `pattern` field"));
    }

    #[test]
    fn test_validate_rejects_long_patterns() {
        let rules = vec![RegexRule::new("long", "a".repeat(MAX_PATTERN_LENGTH + 1))];
        assert!(validate_rules(&rules).is_err());
    }

    #[test]
    fn test_candidate_paths_end_with_file_name() {
        assert!(config_candidate_paths().iter().all(|p| p.ends_with(CONFIG_FILE_NAME)));
    }
}
