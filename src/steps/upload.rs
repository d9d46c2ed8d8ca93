//! Upload step: push distribution artifacts with `python -m twine upload`
//!
//! With a configured token the subprocess runs with captured output so the
//! publisher can classify the outcome. Without one, twine prompts the
//! operator itself, so stdio is inherited and only the exit status is
//! reported.

use crate::core::traits::{StepOutput, UploadStep};
use crate::security::SafeCommandExecutor;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;

pub struct TwineUploadStep {
    python: String,
    token: Option<SecretString>,
    repository_url: Option<String>,
}

impl TwineUploadStep {
    pub fn new(python: &str, token: Option<SecretString>, repository_url: Option<String>) -> Self {
        Self {
            python: python.to_string(),
            token,
            repository_url,
        }
    }

    /// Whether this step will prompt the operator instead of capturing output
    pub fn is_interactive(&self) -> bool {
        self.token.is_none()
    }

    /// Assembles the twine invocation.
    ///
    /// `dist/*` is passed literally; twine does its own globbing, so no
    /// shell is involved.
    fn args(&self) -> Vec<String> {
        let mut args = vec!["-m".to_string(), "twine".to_string(), "upload".to_string()];

        if let Some(url) = &self.repository_url {
            args.push("--repository-url".to_string());
            args.push(url.clone());
        }

        if let Some(token) = &self.token {
            args.push("--username".to_string());
            args.push("__token__".to_string());
            args.push("--password".to_string());
            args.push(token.expose_secret().to_string());
        }

        args.push("dist/*".to_string());
        args
    }
}

#[async_trait]
impl UploadStep for TwineUploadStep {
    async fn run(&self, package_dir: &Path) -> anyhow::Result<StepOutput> {
        let executor = SafeCommandExecutor::new(package_dir)?;
        let args = self.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        if self.is_interactive() {
            let status = executor.execute_interactive(&self.python, &args).await?;
            return Ok(StepOutput {
                code: status.code(),
                stdout: String::new(),
                stderr: String::new(),
            });
        }

        let output = executor.execute(&self.python, &args).await?;
        Ok(output.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_with_token() {
        let step = TwineUploadStep::new(
            "python3",
            Some(SecretString::new("pypi-test-token".to_string().into())),
            None,
        );

        let args = step.args();

        assert_eq!(
            args,
            vec![
                "-m",
                "twine",
                "upload",
                "--username",
                "__token__",
                "--password",
                "pypi-test-token",
                "dist/*",
            ]
        );
        assert!(!step.is_interactive());
    }

    #[test]
    fn test_args_without_token_are_bare() {
        let step = TwineUploadStep::new("python3", None, None);

        assert_eq!(step.args(), vec!["-m", "twine", "upload", "dist/*"]);
        assert!(step.is_interactive());
    }

    #[test]
    fn test_args_with_repository_url() {
        let step = TwineUploadStep::new(
            "python3",
            Some(SecretString::new("pypi-test-token".to_string().into())),
            Some("https://test.pypi.org/legacy/".to_string()),
        );

        let args = step.args();

        // The endpoint override comes before the credentials
        assert_eq!(args[3], "--repository-url");
        assert_eq!(args[4], "https://test.pypi.org/legacy/");
        assert_eq!(args[5], "--username");
        assert_eq!(args.last().map(String::as_str), Some("dist/*"));
    }

    #[tokio::test]
    async fn test_run_fails_for_missing_package_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let step = TwineUploadStep::new("python3", None, None);
        let result = step.run(&missing).await;

        assert!(result.is_err());
    }
}
