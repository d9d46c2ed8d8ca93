//! Idempotent wheel-stanza patching for package manifests
//!
//! Hatch only packages the right sources when `pyproject.toml` names the
//! `src/` folder explicitly. The patch appends that stanza when it is
//! missing and leaves the file untouched, byte for byte, when it is
//! already there. The manifest is deliberately treated as text rather
//! than parsed TOML so a no-op really writes nothing.

use crate::core::config::PackageEntry;
use anyhow::Context;
use std::path::Path;
use tokio::fs;

/// Presence of this table header is the idempotence check
const WHEEL_TABLE: &str = "[tool.hatch.build.targets.wheel]";

/// Outcome of patching one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The stanza was appended
    Patched,

    /// The manifest already carries the stanza; nothing was written
    AlreadyConfigured,

    /// The package has no manifest to patch
    MissingManifest,
}

/// Append the wheel build stanza to one package's manifest if absent.
///
/// Existing content is preserved unchanged; the stanza is appended at the
/// end, parameterized by the package's source folder under `src/`.
pub async fn patch_manifest(package_dir: &Path, src_folder: &str) -> anyhow::Result<PatchOutcome> {
    let manifest = package_dir.join("pyproject.toml");

    if fs::metadata(&manifest).await.is_err() {
        return Ok(PatchOutcome::MissingManifest);
    }

    let content = fs::read_to_string(&manifest)
        .await
        .with_context(|| format!("Failed to read {}", manifest.display()))?;

    if content.contains(WHEEL_TABLE) {
        return Ok(PatchOutcome::AlreadyConfigured);
    }

    let stanza = format!("\n\n{}\npackages = [\"src/{}\"]\n", WHEEL_TABLE, src_folder);

    fs::write(&manifest, format!("{}{}", content, stanza))
        .await
        .with_context(|| format!("Failed to write {}", manifest.display()))?;

    Ok(PatchOutcome::Patched)
}

/// Patch every roster package that has a configured source folder,
/// narrating one status line per package.
pub async fn patch_all(packages_root: &Path, roster: &[PackageEntry]) -> anyhow::Result<()> {
    for entry in roster {
        let Some(src_folder) = &entry.src_folder else {
            continue;
        };

        let package_dir = packages_root.join(&entry.name);
        match patch_manifest(&package_dir, src_folder).await? {
            PatchOutcome::Patched => {
                println!("✅ Fixed {}/pyproject.toml", entry.name);
            }
            PatchOutcome::AlreadyConfigured => {
                println!("⏭️  {} already has build config", entry.name);
            }
            PatchOutcome::MissingManifest => {
                println!("❌ {} not found", package_dir.join("pyproject.toml").display());
            }
        }
    }

    println!("\n✅ All pyproject.toml files fixed!");
    Ok(())
}
