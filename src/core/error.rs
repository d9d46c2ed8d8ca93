//! Error handling for the publishing workflows
//!
//! This module provides the error taxonomy with recovery guidance
//! using the thiserror crate for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for publishing and maintenance operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Per-package errors: terminal for that package only
    #[error("[{}] package directory not found: {}", .package, .path.display())]
    MissingDirectory { package: String, path: PathBuf },

    #[error("[{package}] failed to remove old build artifacts: {message}")]
    CleanupFailed { package: String, message: String },

    #[error("[{package}] build failed:\n{details}")]
    BuildFailed { package: String, details: String },

    #[error("[{package}] upload failed:\n{details}")]
    UploadFailed { package: String, details: String },

    #[error("[{package}] command execution error: {message}")]
    CommandFailed { package: String, message: String },

    // Run-level errors: raised before any package is processed
    #[error("no PyPI API token configured and interactive login is disabled")]
    TokenMissing,

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl PublishError {
    /// Get the package name associated with this error, if it is package-scoped
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::MissingDirectory { package, .. }
            | Self::CleanupFailed { package, .. }
            | Self::BuildFailed { package, .. }
            | Self::UploadFailed { package, .. }
            | Self::CommandFailed { package, .. } => Some(package),
            Self::TokenMissing | Self::ConfigError(_) => None,
        }
    }

    /// Check if this error aborts the whole run rather than a single package
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TokenMissing | Self::ConfigError(_))
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::MissingDirectory { .. } => vec![
                "Check the packages root path",
                "Run the rename command if the package still has its legacy directory name",
            ],
            Self::CleanupFailed { .. } => vec![
                "Check filesystem permissions on the dist/ directory",
                "Remove the directory manually and retry",
            ],
            Self::BuildFailed { .. } => vec![
                "Inspect the build diagnostics above",
                "Verify the build module is installed (pip install build)",
            ],
            Self::UploadFailed { .. } => vec![
                "Inspect the upload diagnostics above",
                "Verify the token has upload permission for this project",
            ],
            Self::CommandFailed { .. } => {
                vec!["Verify the configured python interpreter is installed and on PATH"]
            }
            Self::TokenMissing => vec![
                "Set PYPI_TOKEN or TWINE_PASSWORD",
                "Pass --token, or drop --non-interactive to log in manually",
            ],
            Self::ConfigError(_) => {
                vec!["Check .warehouse-publisher.yaml against the documented schema"]
            }
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDirectory { .. } => "MISSING_DIRECTORY",
            Self::CleanupFailed { .. } => "CLEANUP_FAILED",
            Self::BuildFailed { .. } => "BUILD_FAILED",
            Self::UploadFailed { .. } => "UPLOAD_FAILED",
            Self::CommandFailed { .. } => "COMMAND_FAILED",
            Self::TokenMissing => "TOKEN_MISSING",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_error() {
        let error = PublishError::MissingDirectory {
            package: "pylogfmt-rj".to_string(),
            path: PathBuf::from("packages/pylogfmt-rj"),
        };

        assert_eq!(error.package(), Some("pylogfmt-rj"));
        assert!(!error.is_fatal());
        assert_eq!(error.code(), "MISSING_DIRECTORY");
        assert!(error.to_string().contains("packages/pylogfmt-rj"));
    }

    #[test]
    fn test_build_failed_error_with_details() {
        let error = PublishError::BuildFailed {
            package: "envmaster".to_string(),
            details: "error: invalid pyproject.toml".to_string(),
        };

        assert_eq!(error.package(), Some("envmaster"));
        assert_eq!(error.code(), "BUILD_FAILED");
        let error_msg = error.to_string();
        assert!(error_msg.contains("invalid pyproject.toml"));
    }

    #[test]
    fn test_upload_failed_error() {
        let error = PublishError::UploadFailed {
            package: "pycachely-rj".to_string(),
            details: "403 Forbidden".to_string(),
        };

        assert!(!error.is_fatal());
        assert_eq!(error.code(), "UPLOAD_FAILED");
        assert!(error.to_string().contains("403 Forbidden"));
    }

    #[test]
    fn test_cleanup_failed_error() {
        let error = PublishError::CleanupFailed {
            package: "envmaster".to_string(),
            message: "permission denied".to_string(),
        };

        assert_eq!(error.code(), "CLEANUP_FAILED");
        assert_eq!(error.package(), Some("envmaster"));
    }

    #[test]
    fn test_command_failed_error() {
        let error = PublishError::CommandFailed {
            package: "envmaster".to_string(),
            message: "python3 not found".to_string(),
        };

        assert_eq!(error.code(), "COMMAND_FAILED");
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("python")));
    }

    #[test]
    fn test_token_missing_is_fatal() {
        let error = PublishError::TokenMissing;

        assert!(error.is_fatal());
        assert_eq!(error.package(), None);
        assert_eq!(error.code(), "TOKEN_MISSING");
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("PYPI_TOKEN")));
    }

    #[test]
    fn test_config_error_is_fatal() {
        let error = PublishError::ConfigError("duplicate package name".to_string());

        assert!(error.is_fatal());
        assert_eq!(error.code(), "CONFIG_ERROR");
        assert!(error.to_string().contains("duplicate package name"));
    }

    #[test]
    fn test_error_display_prefixes_package() {
        let error = PublishError::BuildFailed {
            package: "pyretryit-rj".to_string(),
            details: "boom".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.starts_with("[pyretryit-rj]"));
    }
}
