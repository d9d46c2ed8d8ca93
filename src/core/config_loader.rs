//! Configuration file loader for warehouse-publisher
//!
//! This module provides configuration loading, validation, and merging capabilities.

use super::config::PublisherConfig;
use crate::core::error::PublishError;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
const CONFIG_FILENAME: &str = ".warehouse-publisher.yaml";

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// CLI arguments (highest priority)
    pub cli_args: Option<PublisherConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,

    /// Validation warnings
    pub warnings: Vec<ConfigValidationWarning>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "packages[2].name")
    pub field: String,

    /// Error message
    pub message: String,

    /// Expected type/value
    pub expected: Option<String>,

    /// Actual type/value
    pub actual: Option<String>,
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    /// Field path
    pub field: String,

    /// Warning message
    pub message: String,

    /// Suggestion
    pub suggestion: Option<String>,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.warehouse-publisher.yaml)
    /// 4. Global config (~/.warehouse-publisher.yaml)
    /// 5. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<PublisherConfig, PublishError> {
        let mut configs: Vec<PublisherConfig> = Vec::new();

        // 5. Default values (lowest priority)
        configs.push(PublisherConfig::default());

        // 4. Global config
        if let Some(global_config) = Self::load_global_config().await? {
            configs.push(global_config);
        }

        // 3. Project config
        if let Some(project_config) = Self::load_project_config(&options.project_path).await? {
            configs.push(project_config);
        }

        // 2. Environment variables
        if let Some(env_config) = Self::load_env_config(&options.env) {
            configs.push(env_config);
        }

        // 1. CLI arguments (highest priority)
        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        Ok(Self::merge_configs(configs))
    }

    /// Load global configuration from ~/.warehouse-publisher.yaml
    ///
    /// A missing HOME just means there is no global config.
    async fn load_global_config() -> Result<Option<PublisherConfig>, PublishError> {
        let Ok(home_dir) = env::var("HOME") else {
            return Ok(None);
        };
        let global_config_path = PathBuf::from(home_dir).join(CONFIG_FILENAME);

        Self::load_config_file(&global_config_path).await
    }

    /// Load project configuration from ./.warehouse-publisher.yaml
    async fn load_project_config(
        project_path: &Path,
    ) -> Result<Option<PublisherConfig>, PublishError> {
        let project_config_path = project_path.join(CONFIG_FILENAME);

        Self::load_config_file(&project_config_path).await
    }

    /// Load configuration from a YAML file
    async fn load_config_file(file_path: &Path) -> Result<Option<PublisherConfig>, PublishError> {
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path)
            .await
            .map_err(|e| PublishError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: PublisherConfig = serde_yaml::from_str(&content).map_err(|e| {
            PublishError::ConfigError(format!("Failed to parse YAML config: {}", e))
        })?;

        Ok(Some(config))
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Option<PublisherConfig> {
        let mut config = PublisherConfig::empty();
        let mut has_changes = false;

        // WAREHOUSE_PACKAGES_ROOT -> packagesRoot
        if let Some(root) = env.get("WAREHOUSE_PACKAGES_ROOT") {
            config.packages_root = Some(PathBuf::from(root));
            has_changes = true;
        }

        // WAREHOUSE_PAUSE_SECONDS -> pauseSeconds
        if let Some(pause) = env.get("WAREHOUSE_PAUSE_SECONDS") {
            match pause.parse::<u64>() {
                Ok(seconds) => {
                    config.pause_seconds = Some(seconds);
                    has_changes = true;
                }
                Err(_) => {
                    eprintln!(
                        "⚠️  WAREHOUSE_PAUSE_SECONDS is not a number ({}), ignoring",
                        pause
                    );
                }
            }
        }

        // WAREHOUSE_NON_INTERACTIVE -> nonInteractive
        if env.get("WAREHOUSE_NON_INTERACTIVE").map(|s| s.as_str()) == Some("true") {
            config.non_interactive = Some(true);
            has_changes = true;
        }

        if has_changes { Some(config) } else { None }
    }

    /// Merge multiple configurations with priority
    fn merge_configs(configs: Vec<PublisherConfig>) -> PublisherConfig {
        let mut result = PublisherConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target
    ///
    /// A source roster replaces the target roster wholesale; roster entries
    /// are never spliced together across sources.
    fn merge_into(target: &mut PublisherConfig, source: PublisherConfig) {
        if source.python.is_some() {
            target.python = source.python;
        }
        if source.packages_root.is_some() {
            target.packages_root = source.packages_root;
        }
        if source.packages.is_some() {
            target.packages = source.packages;
        }
        if source.pause_seconds.is_some() {
            target.pause_seconds = source.pause_seconds;
        }
        if source.non_interactive.is_some() {
            target.non_interactive = source.non_interactive;
        }
        if source.repository_url.is_some() {
            target.repository_url = source.repository_url;
        }
    }

    /// Validate configuration
    pub fn validate(config: &PublisherConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Interpreter must not be blank
        if let Some(python) = &config.python
            && python.trim().is_empty()
        {
            errors.push(ConfigValidationError {
                field: "python".to_string(),
                message: "Interpreter name must not be empty".to_string(),
                expected: Some("e.g. \"python3\"".to_string()),
                actual: Some("empty".to_string()),
            });
        }

        // 2. Validate the roster
        let roster = config.roster();
        if roster.is_empty() {
            warnings.push(ConfigValidationWarning {
                field: "packages".to_string(),
                message: "Roster is empty; nothing will be published".to_string(),
                suggestion: Some("List packages under the packages key".to_string()),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for (i, entry) in roster.iter().enumerate() {
            if entry.name.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("packages[{}].name", i),
                    message: "Package name must not be empty".to_string(),
                    expected: Some("non-empty string".to_string()),
                    actual: Some("empty".to_string()),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                errors.push(ConfigValidationError {
                    field: format!("packages[{}].name", i),
                    message: format!("Duplicate package name: {}", entry.name),
                    expected: Some("unique names".to_string()),
                    actual: Some(entry.name.clone()),
                });
            }
        }

        // 3. Pause sanity
        if let Some(pause) = config.pause_seconds
            && pause > 300
        {
            warnings.push(ConfigValidationWarning {
                field: "pauseSeconds".to_string(),
                message: format!("Unusually long inter-package pause: {}s", pause),
                suggestion: Some("The index needs only a short courtesy pause".to_string()),
            });
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Format validation result as human-readable string
    pub fn format_validation_result(result: &ConfigValidationResult) -> String {
        let mut lines = Vec::new();

        if result.valid {
            lines.push("✅ Configuration validation succeeded".to_string());
        } else {
            lines.push("❌ Configuration has errors".to_string());
        }

        if !result.errors.is_empty() {
            lines.push("\n🔴 Errors:".to_string());
            for error in &result.errors {
                lines.push(format!("  - [{}] {}", error.field, error.message));
                if let (Some(expected), Some(actual)) = (&error.expected, &error.actual) {
                    lines.push(format!("    Expected: {}", expected));
                    lines.push(format!("    Actual: {}", actual));
                }
            }
        }

        if !result.warnings.is_empty() {
            lines.push("\n🟡 Warnings:".to_string());
            for warning in &result.warnings {
                lines.push(format!("  - [{}] {}", warning.field, warning.message));
                if let Some(suggestion) = &warning.suggestion {
                    lines.push(format!("    Suggestion: {}", suggestion));
                }
            }
        }

        lines.join("\n")
    }
}
