//! SafeCommandExecutor: Type-safe command execution with compile-time injection prevention
//!
//! # Security Features
//!
//! - **Whitelist-based validation**: Only pre-approved commands can execute
//! - **Injection prevention**: Uses `tokio::process::Command` which prevents shell injection
//! - **Argument sanitization**: Arguments passed as a slice, never interpolated into shell strings
//! - **Working directory validation**: Validates existence before execution
//!
//! # Example
//!
//! ```rust,no_run
//! use warehouse_publisher::SafeCommandExecutor;
//!
//! # async fn demo() -> Result<(), warehouse_publisher::CommandError> {
//! let executor = SafeCommandExecutor::new(std::env::temp_dir())?;
//! let output = executor.execute("python3", &["--version"]).await?;
//! println!("{}", String::from_utf8_lossy(&output.stdout));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};
use thiserror::Error;
use tokio::process::Command;

/// Allowed commands whitelist for security.
///
/// Only these commands can be executed via SafeCommandExecutor. Both the
/// build and upload steps run as python modules, so nothing else is needed.
const ALLOWED_COMMANDS: &[&str] = &["python", "python3"];

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command is not in the allowed whitelist
    #[error("Command '{0}' is not in the allowed whitelist")]
    CommandNotAllowed(String),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {}", .0.display())]
    InvalidWorkingDirectory(PathBuf),

    /// Command execution failed (e.g., binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),
}

/// Safe command executor with security controls
///
/// Provides a secure way to execute the build and upload tools with
/// whitelist validation, working directory control, and injection
/// prevention through `tokio::process::Command`.
#[derive(Debug)]
pub struct SafeCommandExecutor {
    /// Working directory where commands will be executed
    working_dir: PathBuf,
}

impl SafeCommandExecutor {
    /// Create a new SafeCommandExecutor with working directory validation.
    ///
    /// # Arguments
    ///
    /// * `working_dir` - The directory where commands will be executed. Must exist.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidWorkingDirectory` if the directory does not exist.
    ///
    /// # Example
    ///
    /// ```rust
    /// use warehouse_publisher::SafeCommandExecutor;
    ///
    /// let executor = SafeCommandExecutor::new(std::env::temp_dir()).unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Result<Self, CommandError> {
        let working_dir = working_dir.as_ref().to_path_buf();

        if !working_dir.exists() {
            return Err(CommandError::InvalidWorkingDirectory(working_dir));
        }

        Ok(Self { working_dir })
    }

    /// Execute a command with whitelist validation and captured output.
    ///
    /// Both stdout and stderr are piped and collected; the caller decides
    /// what a non-zero exit status means.
    ///
    /// # Arguments
    ///
    /// * `command` - The command to execute (must be in `ALLOWED_COMMANDS`)
    /// * `args` - Command arguments (safely passed without shell interpretation)
    ///
    /// # Errors
    ///
    /// - `CommandError::CommandNotAllowed` - Command not in whitelist
    /// - `CommandError::ExecutionFailed` - Binary not found or execution error
    pub async fn execute(&self, command: &str, args: &[&str]) -> Result<Output, CommandError> {
        Self::check_allowed(command)?;

        let output = Command::new(command)
            .args(args)
            .current_dir(&self.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        Ok(output)
    }

    /// Execute a command with inherited stdio, for tools that prompt the operator.
    ///
    /// Nothing is captured; only the exit status is reported. Used for the
    /// tokenless upload path where twine asks for credentials itself.
    pub async fn execute_interactive(
        &self,
        command: &str,
        args: &[&str],
    ) -> Result<ExitStatus, CommandError> {
        Self::check_allowed(command)?;

        let status = Command::new(command)
            .args(args)
            .current_dir(&self.working_dir)
            .status()
            .await
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        Ok(status)
    }

    fn check_allowed(command: &str) -> Result<(), CommandError> {
        if !ALLOWED_COMMANDS.contains(&command) {
            return Err(CommandError::CommandNotAllowed(command.to_string()));
        }
        Ok(())
    }
}
