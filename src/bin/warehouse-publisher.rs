//! Warehouse Publisher CLI
//!
//! Maintenance tool for the PyPI warehouse packages tree: publishes the
//! roster to PyPI and keeps the per-package manifests in shape.

use anyhow::Result;
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use std::process;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use warehouse_publisher::{
    ConfigLoadOptions, ConfigLoader, ManifestChecker, PublishError, PublisherConfig,
    PythonBuildStep, SecureTokenManager, TwineUploadStep, WarehousePublisher, patch_all,
    rename_all,
};

/// PyPI warehouse package maintenance assistant
#[derive(Parser)]
#[command(name = "warehouse-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Build, upload, and maintain the PyPI warehouse packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and upload every roster package to PyPI
    Publish {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// PyPI API token (falls back to PYPI_TOKEN, then TWINE_PASSWORD)
        #[arg(long)]
        token: Option<String>,

        /// Packages root, relative to the project path
        #[arg(long)]
        packages_root: Option<PathBuf>,

        /// Python interpreter for the build and upload subprocesses
        #[arg(long)]
        python: Option<String>,

        /// Seconds to wait between packages
        #[arg(long)]
        pause: Option<u64>,

        /// Non-interactive mode (CI/CD)
        #[arg(long)]
        non_interactive: bool,

        /// Alternative index endpoint, passed to twine as --repository-url
        #[arg(long)]
        repository_url: Option<String>,
    },

    /// Check roster manifests without modifying anything
    Check {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Packages root, relative to the project path
        #[arg(long)]
        packages_root: Option<PathBuf>,
    },

    /// Append missing wheel build stanzas to roster manifests
    Patch {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Packages root, relative to the project path
        #[arg(long)]
        packages_root: Option<PathBuf>,
    },

    /// Rename legacy package directories to their published names
    Rename {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Packages root, relative to the project path
        #[arg(long)]
        packages_root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            project_path,
            token,
            packages_root,
            python,
            pause,
            non_interactive,
            repository_url,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            let overlay = PublisherConfig {
                python,
                packages_root,
                packages: None,
                pause_seconds: pause,
                non_interactive: if non_interactive { Some(true) } else { None },
                repository_url,
            };
            publish_command(path, overlay, token).await
        }
        Commands::Check {
            project_path,
            packages_root,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            check_command(path, root_overlay(packages_root)).await
        }
        Commands::Patch {
            project_path,
            packages_root,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            patch_command(path, root_overlay(packages_root)).await
        }
        Commands::Rename {
            project_path,
            packages_root,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            rename_command(path, root_overlay(packages_root)).await
        }
    }
}

/// CLI overlay carrying only the packages-root override
fn root_overlay(packages_root: Option<PathBuf>) -> PublisherConfig {
    PublisherConfig {
        packages_root,
        ..PublisherConfig::empty()
    }
}

/// Load and validate the effective configuration for one command.
///
/// Returns `Ok(None)` after printing the validation report when the
/// configuration is unusable; the caller exits 1.
async fn load_config(
    project_path: &Path,
    cli_overlay: PublisherConfig,
) -> Result<Option<PublisherConfig>> {
    let mut config = ConfigLoader::load(ConfigLoadOptions {
        project_path: project_path.to_path_buf(),
        cli_args: Some(cli_overlay),
        env: std::env::vars().collect(),
    })
    .await?;

    let validation = ConfigLoader::validate(&config);
    if !validation.valid {
        eprintln!("{}", ConfigLoader::format_validation_result(&validation));
        return Ok(None);
    }
    for warning in &validation.warnings {
        eprintln!("⚠️  [{}] {}", warning.field, warning.message);
    }

    // Relative roots are anchored at the project path
    let root = config.packages_root();
    if !root.is_absolute() {
        config.packages_root = Some(project_path.join(root));
    }

    Ok(Some(config))
}

fn report_fatal(error: &PublishError) {
    eprintln!("\n❌ [{}] {}", error.code(), error);
    for action in error.suggested_actions() {
        eprintln!("   💡 {}", action);
    }
}

async fn publish_command(
    project_path: PathBuf,
    cli_overlay: PublisherConfig,
    token_arg: Option<String>,
) -> Result<i32> {
    println!("🚀 PyPI Warehouse Package Publisher");
    println!("{}", "=".repeat(60));

    let Some(config) = load_config(&project_path, cli_overlay).await? else {
        return Ok(1);
    };

    let tokens = SecureTokenManager::new();
    let token = tokens.resolve(token_arg.as_deref());

    match &token {
        Some(token) => {
            println!("🔑 Using API token {}", tokens.mask_token(token.expose_secret()));
        }
        None => {
            if config.is_non_interactive() {
                report_fatal(&PublishError::TokenMissing);
                return Ok(1);
            }

            println!("\n⚠️  WARNING: No API token configured!");
            println!("You'll need to enter your PyPI credentials for each package.");
            println!("\nTo avoid this, pass --token or use:");
            println!("export PYPI_TOKEN=your-token-here\n");

            if !confirm("Continue with interactive login?").await? {
                println!("❌ Cancelled");
                return Ok(1);
            }
        }
    }

    let build = PythonBuildStep::new(config.python());
    let upload = TwineUploadStep::new(
        config.python(),
        token.clone(),
        config.repository_url.clone(),
    );

    let publisher = WarehousePublisher::new(config, Box::new(build), Box::new(upload), token);
    let summary = publisher.publish_all().await;

    Ok(if summary.all_succeeded() { 0 } else { 1 })
}

async fn check_command(project_path: PathBuf, cli_overlay: PublisherConfig) -> Result<i32> {
    println!("\n🔍 Manifest Check\n");

    let Some(config) = load_config(&project_path, cli_overlay).await? else {
        return Ok(1);
    };

    let checker = ManifestChecker::new();
    let reports = checker
        .check_all(&config.packages_root(), config.roster())
        .await?;

    let mut all_valid = true;
    for report in &reports {
        println!("📦 {}:", report.package);

        if report.is_valid {
            println!("  ✅ Validation successful");
        } else {
            all_valid = false;
            println!("  ❌ Validation failed");
            for error in &report.errors {
                println!("    - {}", error);
            }
        }

        if !report.warnings.is_empty() {
            println!("  ⚠️  Warnings:");
            for warning in &report.warnings {
                println!("    - {}", warning);
            }
        }
    }

    println!();
    Ok(if all_valid { 0 } else { 1 })
}

async fn patch_command(project_path: PathBuf, cli_overlay: PublisherConfig) -> Result<i32> {
    println!("\n🔧 Manifest Patch\n");

    let Some(config) = load_config(&project_path, cli_overlay).await? else {
        return Ok(1);
    };

    patch_all(&config.packages_root(), config.roster()).await?;
    Ok(0)
}

async fn rename_command(project_path: PathBuf, cli_overlay: PublisherConfig) -> Result<i32> {
    println!("\n📁 Package Rename\n");

    let Some(config) = load_config(&project_path, cli_overlay).await? else {
        return Ok(1);
    };

    rename_all(&config.packages_root(), config.roster()).await?;
    Ok(0)
}

/// Prompt the operator for confirmation
async fn confirm(message: &str) -> Result<bool> {
    print!("{} (y/n): ", message);
    io::stdout().flush().await?;

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut answer = String::new();

    reader.read_line(&mut answer).await?;

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
