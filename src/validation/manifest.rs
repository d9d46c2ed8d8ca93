//! Manifest checks - validates roster packages' pyproject.toml files
//!
//! Read-only: nothing is written, the reports feed the `check` subcommand.
//!
//! # Example
//!
//! ```no_run
//! use warehouse_publisher::core::config::PackageEntry;
//! use warehouse_publisher::validation::ManifestChecker;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let checker = ManifestChecker::new();
//! let entry = PackageEntry::new("pylogfmt-rj", Some("logfmt"));
//! let report = checker.check_package(Path::new("packages"), &entry).await?;
//!
//! if report.is_valid {
//!     println!("{} is ready to publish", report.package);
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::config::PackageEntry;
use std::path::Path;
use tokio::fs;

/// Result of checking one package's manifest
#[derive(Debug, Clone)]
pub struct ManifestReport {
    /// Package the report is about
    pub package: String,

    /// Whether the manifest passed all checks
    pub is_valid: bool,

    /// Check errors
    pub errors: Vec<String>,

    /// Check warnings
    pub warnings: Vec<String>,
}

impl ManifestReport {
    fn invalid(package: &str, error: String) -> Self {
        Self {
            package: package.to_string(),
            is_valid: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

/// Checker for PEP 621 package manifests
pub struct ManifestChecker;

impl Default for ManifestChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check one roster package's manifest
    pub async fn check_package(
        &self,
        packages_root: &Path,
        entry: &PackageEntry,
    ) -> anyhow::Result<ManifestReport> {
        let manifest = packages_root.join(&entry.name).join("pyproject.toml");

        let content = match fs::read_to_string(&manifest).await {
            Ok(content) => content,
            Err(e) => {
                return Ok(ManifestReport::invalid(
                    &entry.name,
                    format!("Cannot read {}: {}", manifest.display(), e),
                ));
            }
        };

        Ok(self.check_content(entry, &content))
    }

    /// Check every roster package, preserving roster order
    pub async fn check_all(
        &self,
        packages_root: &Path,
        roster: &[PackageEntry],
    ) -> anyhow::Result<Vec<ManifestReport>> {
        let mut reports = Vec::with_capacity(roster.len());
        for entry in roster {
            reports.push(self.check_package(packages_root, entry).await?);
        }
        Ok(reports)
    }

    fn check_content(&self, entry: &PackageEntry, content: &str) -> ManifestReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let parsed: toml::Value = match toml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                return ManifestReport::invalid(&entry.name, format!("Invalid TOML: {}", e));
            }
        };

        // [project] metadata
        match parsed.get("project") {
            None => errors.push("Missing [project] section".to_string()),
            Some(project) => {
                match project.get("name").and_then(|v| v.as_str()) {
                    None => errors.push("Missing required field: project.name".to_string()),
                    Some(name) if name != entry.name => {
                        errors.push(format!(
                            "project.name is \"{}\" but the roster expects \"{}\"",
                            name, entry.name
                        ));
                    }
                    Some(_) => {}
                }

                // Dynamic versioning is legitimate, so only warn
                if project.get("version").is_none() {
                    warnings.push("Missing field: project.version".to_string());
                }
            }
        }

        // Packages with a src/ folder need the explicit wheel target table
        if let Some(src_folder) = &entry.src_folder
            && !Self::has_wheel_targets(&parsed)
        {
            errors.push(format!(
                "Missing [tool.hatch.build.targets.wheel] for src/{} (run the patch command)",
                src_folder
            ));
        }

        ManifestReport {
            package: entry.name.clone(),
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn has_wheel_targets(parsed: &toml::Value) -> bool {
        parsed
            .get("tool")
            .and_then(|v| v.get("hatch"))
            .and_then(|v| v.get("build"))
            .and_then(|v| v.get("targets"))
            .and_then(|v| v.get("wheel"))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn checker() -> ManifestChecker {
        ManifestChecker::new()
    }

    fn entry_with_src() -> PackageEntry {
        PackageEntry::new("pylogfmt-rj", Some("logfmt"))
    }

    #[test]
    fn test_valid_manifest_with_wheel_targets() {
        let content = r#"
[project]
name = "pylogfmt-rj"
version = "0.1.0"

[tool.hatch.build.targets.wheel]
packages = ["src/logfmt"]
        "#;

        let report = checker().check_content(&entry_with_src(), content);

        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let report = checker().check_content(&entry_with_src(), "not toml [[[");

        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("Invalid TOML")));
    }

    #[test]
    fn test_name_mismatch() {
        let content = r#"
[project]
name = "logfmt"
version = "0.1.0"

[tool.hatch.build.targets.wheel]
packages = ["src/logfmt"]
        "#;

        let report = checker().check_content(&entry_with_src(), content);

        assert!(!report.is_valid);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.contains("roster expects \"pylogfmt-rj\""))
        );
    }

    #[test]
    fn test_missing_wheel_targets_suggests_patch() {
        let content = "[project]\nname = \"pylogfmt-rj\"\nversion = \"0.1.0\"\n";

        let report = checker().check_content(&entry_with_src(), content);

        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("patch")));
    }

    #[test]
    fn test_wheel_targets_not_required_without_src_folder() {
        let entry = PackageEntry::new("envmaster", None);
        let content = "[project]\nname = \"envmaster\"\nversion = \"1.0.0\"\n";

        let report = checker().check_content(&entry, content);

        assert!(report.is_valid);
    }

    #[test]
    fn test_missing_version_is_warning_only() {
        let entry = PackageEntry::new("envmaster", None);
        let content = "[project]\nname = \"envmaster\"\n";

        let report = checker().check_content(&entry, content);

        assert!(report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("version")));
    }

    #[tokio::test]
    async fn test_check_package_reports_missing_manifest() {
        let temp = TempDir::new().unwrap();

        let report = checker()
            .check_package(temp.path(), &entry_with_src())
            .await
            .unwrap();

        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("Cannot read")));
    }

    #[tokio::test]
    async fn test_check_all_preserves_roster_order() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("envmaster");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(
            dir.join("pyproject.toml"),
            "[project]\nname = \"envmaster\"\nversion = \"1.0.0\"\n",
        )
        .await
        .unwrap();

        let roster = vec![
            PackageEntry::new("envmaster", None),
            PackageEntry::new("pylogfmt-rj", Some("logfmt")),
        ];

        let reports = checker().check_all(temp.path(), &roster).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].package, "envmaster");
        assert!(reports[0].is_valid);
        assert_eq!(reports[1].package, "pylogfmt-rj");
        assert!(!reports[1].is_valid);
    }
}
