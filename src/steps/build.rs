//! Build step: produce distribution artifacts with `python -m build`

use crate::core::traits::{BuildStep, StepOutput};
use crate::security::SafeCommandExecutor;
use async_trait::async_trait;
use std::path::Path;

/// Runs the standard PEP 517 build frontend in a package directory,
/// leaving the artifacts in `dist/`.
pub struct PythonBuildStep {
    python: String,
}

impl PythonBuildStep {
    pub fn new(python: &str) -> Self {
        Self {
            python: python.to_string(),
        }
    }
}

#[async_trait]
impl BuildStep for PythonBuildStep {
    async fn run(&self, package_dir: &Path) -> anyhow::Result<StepOutput> {
        let executor = SafeCommandExecutor::new(package_dir)?;
        let output = executor.execute(&self.python, &["-m", "build"]).await?;

        Ok(output.into())
    }
}
