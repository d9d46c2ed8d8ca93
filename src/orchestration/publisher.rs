//! Warehouse publisher - drives the clean → build → upload sequence
//!
//! One package is in flight at a time; a failure for one package never
//! halts the rest of the roster. All outcomes are narrated as they happen
//! and collected into an ordered summary printed at the end.

use crate::core::config::PublisherConfig;
use crate::core::error::PublishError;
use crate::core::traits::{BuildStep, UploadStep};
use crate::security::SecureTokenManager;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use tokio::fs;
use tokio::time::sleep;

/// Upload rejections carrying this phrase mean the version is already on
/// the index, which is the end state publishing was after anyway.
const ALREADY_EXISTS_MARKER: &str = "already exists";

/// Ordered per-package outcomes of one publishing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// Packages published (or already present), in roster order
    pub succeeded: Vec<String>,

    /// Packages that failed, in roster order
    pub failed: Vec<String>,
}

impl PublishSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// WarehousePublisher - sequential build-then-upload over the roster
pub struct WarehousePublisher {
    config: PublisherConfig,
    build: Box<dyn BuildStep>,
    upload: Box<dyn UploadStep>,
    tokens: SecureTokenManager,
    token: Option<SecretString>,
}

impl WarehousePublisher {
    /// Create a publisher over the given configuration and steps.
    ///
    /// `token` is only used for scrubbing diagnostics before they are
    /// printed or embedded in errors; the upload step carries its own copy.
    pub fn new(
        config: PublisherConfig,
        build: Box<dyn BuildStep>,
        upload: Box<dyn UploadStep>,
        token: Option<SecretString>,
    ) -> Self {
        Self {
            config,
            build,
            upload,
            tokens: SecureTokenManager::new(),
            token,
        }
    }

    /// Publish every roster package in order and print the summary.
    ///
    /// Never returns an error: every per-package failure is absorbed into
    /// the summary so one broken package cannot abort the run.
    pub async fn publish_all(&self) -> PublishSummary {
        let mut summary = PublishSummary::default();

        let roster: Vec<String> = self
            .config
            .roster()
            .iter()
            .map(|entry| entry.name.clone())
            .collect();

        for name in roster {
            match self.publish_package(&name).await {
                Ok(()) => summary.succeeded.push(name),
                Err(e) => {
                    println!("❌ {}", self.scrub(&e.to_string()));
                    summary.failed.push(name);
                }
            }

            // Courtesy pause so sequential uploads don't hammer the index
            sleep(self.config.pause()).await;
        }

        self.print_summary(&summary);
        summary
    }

    /// Run the full sequence for one package
    async fn publish_package(&self, name: &str) -> Result<(), PublishError> {
        let package_dir = self.package_dir(name);
        if fs::metadata(&package_dir).await.is_err() {
            return Err(PublishError::MissingDirectory {
                package: name.to_string(),
                path: package_dir,
            });
        }

        println!("\n{}", "=".repeat(60));
        println!("📦 Publishing: {}", name);
        println!("{}\n", "=".repeat(60));

        self.clean_artifacts(name, &package_dir).await?;

        println!("🔨 Building package...");
        let build_output = self.build.run(&package_dir).await.map_err(|e| {
            PublishError::CommandFailed {
                package: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if !build_output.success() {
            return Err(PublishError::BuildFailed {
                package: name.to_string(),
                details: self.scrub(build_output.diagnostics()),
            });
        }
        println!("✅ Build successful!");

        println!("📤 Uploading to PyPI...");
        let upload_output = self.upload.run(&package_dir).await.map_err(|e| {
            PublishError::CommandFailed {
                package: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if !upload_output.success() {
            if upload_output.mentions(ALREADY_EXISTS_MARKER) {
                println!("⚠️  Package already exists on PyPI (possibly older version)");
            } else {
                return Err(PublishError::UploadFailed {
                    package: name.to_string(),
                    details: self.scrub(upload_output.diagnostics()),
                });
            }
        }

        println!("✅ {} published successfully!", name);
        println!("🔗 https://pypi.org/project/{}/", name);
        Ok(())
    }

    /// Remove stale `dist/` output so old artifacts are never uploaded
    async fn clean_artifacts(&self, name: &str, package_dir: &PathBuf) -> Result<(), PublishError> {
        let dist_dir = package_dir.join("dist");
        if fs::metadata(&dist_dir).await.is_ok() {
            fs::remove_dir_all(&dist_dir)
                .await
                .map_err(|e| PublishError::CleanupFailed {
                    package: name.to_string(),
                    message: e.to_string(),
                })?;
            println!("🧹 Cleaned old build artifacts");
        }
        Ok(())
    }

    fn package_dir(&self, name: &str) -> PathBuf {
        self.config.packages_root().join(name)
    }

    /// Mask any known token value before text reaches the console
    fn scrub(&self, text: &str) -> String {
        let mut masked = self.tokens.mask_tokens_in_string(text);
        if let Some(token) = &self.token {
            masked = self
                .tokens
                .mask_value_in_string(&masked, token.expose_secret());
        }
        masked
    }

    /// Print the final roster-ordered summary
    fn print_summary(&self, summary: &PublishSummary) {
        println!("\n{}", "=".repeat(60));
        println!("📊 Publishing Summary");
        println!("{}", "=".repeat(60));

        println!("✅ Successful: {}", summary.succeeded.len());
        for package in &summary.succeeded {
            println!("   • {}", package);
        }

        if !summary.failed.is_empty() {
            println!("\n❌ Failed: {}", summary.failed.len());
            for package in &summary.failed {
                println!("   • {}", package);
            }
        }

        println!("\n🎉 Publishing complete!");
    }
}
