//! Configuration structures and types for warehouse-publisher
//!
//! This module provides type-safe configuration management with serde support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One roster entry: a publishable package and its legacy source folder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageEntry {
    /// Package identifier: the directory name under the packages root and
    /// the manifest `name` field
    pub name: String,

    /// Legacy source folder under `src/` (absent for packages that never
    /// had one); consumed read-only by the patch, rename, and check flows
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "src")]
    pub src_folder: Option<String>,
}

impl PackageEntry {
    pub fn new(name: &str, src_folder: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            src_folder: src_folder.map(|s| s.to_string()),
        }
    }
}

/// Root configuration object
///
/// All fields are optional so partial files and overlays merge cleanly;
/// the accessors supply the effective values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublisherConfig {
    /// Python interpreter used for the build and upload subprocesses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Root directory containing one subdirectory per package
    #[serde(skip_serializing_if = "Option::is_none", rename = "packagesRoot")]
    pub packages_root: Option<PathBuf>,

    /// Ordered publish roster; insertion order is publish order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<PackageEntry>>,

    /// Seconds to wait between packages
    #[serde(skip_serializing_if = "Option::is_none", rename = "pauseSeconds")]
    pub pause_seconds: Option<u64>,

    /// Disable interactive prompting (CI/CD)
    #[serde(skip_serializing_if = "Option::is_none", rename = "nonInteractive")]
    pub non_interactive: Option<bool>,

    /// Alternative index endpoint, passed to twine as --repository-url
    #[serde(skip_serializing_if = "Option::is_none", rename = "repositoryUrl")]
    pub repository_url: Option<String>,
}

/// The distribution packages this tool maintains, in publish order
pub fn default_roster() -> Vec<PackageEntry> {
    vec![
        PackageEntry::new("envmaster", None),
        PackageEntry::new("pylogfmt-rj", Some("logfmt")),
        PackageEntry::new("pycachely-rj", Some("cachely")),
        PackageEntry::new("pyretryit-rj", Some("retryit")),
        PackageEntry::new("pyvaliddict-rj", Some("validdict")),
        PackageEntry::new("pytimefunc-rj", Some("timefunc")),
        PackageEntry::new("pycliprog-rj", Some("cliprog")),
        PackageEntry::new("pyprojectcheck-rj", Some("pyprojectcheck")),
    ]
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            python: Some("python3".to_string()),
            packages_root: Some(PathBuf::from("packages")),
            packages: Some(default_roster()),
            pause_seconds: Some(2),
            non_interactive: Some(false),
            repository_url: None,
        }
    }
}

impl PublisherConfig {
    /// An entirely empty overlay, for layering partial sources on top of
    /// the defaults
    pub fn empty() -> Self {
        Self {
            python: None,
            packages_root: None,
            packages: None,
            pause_seconds: None,
            non_interactive: None,
            repository_url: None,
        }
    }

    /// Effective interpreter name
    pub fn python(&self) -> &str {
        self.python.as_deref().unwrap_or("python3")
    }

    /// Effective packages root
    pub fn packages_root(&self) -> PathBuf {
        self.packages_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("packages"))
    }

    /// Effective roster
    pub fn roster(&self) -> &[PackageEntry] {
        self.packages.as_deref().unwrap_or(&[])
    }

    /// Effective inter-package pause
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_seconds.unwrap_or(2))
    }

    /// Whether interactive prompting is disabled
    pub fn is_non_interactive(&self) -> bool {
        self.non_interactive.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_order() {
        let roster = default_roster();

        assert_eq!(roster.len(), 8);
        assert_eq!(roster[0].name, "envmaster");
        assert_eq!(roster[0].src_folder, None);
        assert_eq!(roster[1].name, "pylogfmt-rj");
        assert_eq!(roster[1].src_folder.as_deref(), Some("logfmt"));
        assert_eq!(roster[7].name, "pyprojectcheck-rj");
        assert_eq!(roster[7].src_folder.as_deref(), Some("pyprojectcheck"));
    }

    #[test]
    fn test_default_config() {
        let config = PublisherConfig::default();

        assert_eq!(config.python(), "python3");
        assert_eq!(config.packages_root(), PathBuf::from("packages"));
        assert_eq!(config.pause(), Duration::from_secs(2));
        assert!(!config.is_non_interactive());
        assert_eq!(config.roster().len(), 8);
    }

    #[test]
    fn test_empty_config_accessors_fall_back() {
        let config = PublisherConfig::empty();

        assert_eq!(config.python(), "python3");
        assert_eq!(config.packages_root(), PathBuf::from("packages"));
        assert_eq!(config.pause(), Duration::from_secs(2));
        assert!(config.roster().is_empty());
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let yaml = r#"
pauseSeconds: 0
nonInteractive: true
packages:
  - name: pylogfmt-rj
    src: logfmt
  - name: envmaster
"#;
        let config: PublisherConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.pause(), Duration::ZERO);
        assert!(config.is_non_interactive());
        let roster = config.roster();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].src_folder.as_deref(), Some("logfmt"));
        assert_eq!(roster[1].src_folder, None);
        // Untouched fields keep their effective defaults
        assert_eq!(config.python(), "python3");
    }

    #[test]
    fn test_serialize_config() {
        let config = PublisherConfig {
            repository_url: Some("https://test.pypi.org/legacy/".to_string()),
            ..PublisherConfig::empty()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(yaml.contains("repositoryUrl: https://test.pypi.org/legacy/"));
        assert!(!yaml.contains("packagesRoot"));
    }
}
