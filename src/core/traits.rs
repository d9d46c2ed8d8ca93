//! Core traits and types for the publish workflow
//!
//! This module defines the narrow build and upload abstractions the
//! publisher drives, so tests can substitute fakes without spawning
//! real processes.

use async_trait::async_trait;
use std::path::Path;

/// Captured result of one build or upload subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    /// Process exit code (None when the process was terminated by a signal)
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    /// A step succeeded only on an explicit zero exit code
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Diagnostic text for failure reports: stderr, falling back to stdout
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }

    /// Case-insensitive search across both captured streams
    pub fn mentions(&self, phrase: &str) -> bool {
        let phrase = phrase.to_lowercase();
        self.stderr.to_lowercase().contains(&phrase)
            || self.stdout.to_lowercase().contains(&phrase)
    }
}

impl From<std::process::Output> for StepOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Build capability: produce distribution artifacts for one package
///
/// Implementations run with `package_dir` as the working directory and
/// report the subprocess outcome without interpreting it; classification
/// of failures belongs to the publisher.
#[async_trait]
pub trait BuildStep: Send + Sync {
    async fn run(&self, package_dir: &Path) -> anyhow::Result<StepOutput>;
}

/// Upload capability: push a package's distribution artifacts to the index
#[async_trait]
pub trait UploadStep: Send + Sync {
    async fn run(&self, package_dir: &Path) -> anyhow::Result<StepOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_zero_exit() {
        let ok = StepOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        let failed = StepOutput {
            code: Some(1),
            ..ok.clone()
        };
        let signalled = StepOutput {
            code: None,
            ..ok.clone()
        };

        assert!(ok.success());
        assert!(!failed.success());
        assert!(!signalled.success());
    }

    #[test]
    fn test_diagnostics_prefers_stderr() {
        let output = StepOutput {
            code: Some(1),
            stdout: "progress noise".to_string(),
            stderr: "error: missing metadata".to_string(),
        };

        assert_eq!(output.diagnostics(), "error: missing metadata");
    }

    #[test]
    fn test_diagnostics_falls_back_to_stdout() {
        let output = StepOutput {
            code: Some(1),
            stdout: "HTTPError: 400 Bad Request".to_string(),
            stderr: "  \n".to_string(),
        };

        assert_eq!(output.diagnostics(), "HTTPError: 400 Bad Request");
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let output = StepOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "400 File already EXISTS. See /help".to_string(),
        };

        assert!(output.mentions("already exists"));
        assert!(!output.mentions("rate limit"));
    }

    #[test]
    fn test_mentions_checks_stdout_too() {
        let output = StepOutput {
            code: Some(1),
            stdout: "Error: this filename has already exists on the index".to_string(),
            stderr: String::new(),
        };

        assert!(output.mentions("already exists"));
    }
}
