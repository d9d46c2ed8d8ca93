//! Directory and identifier migration from legacy to published names
//!
//! Moves `<root>/<old>` to `<root>/<new>` and rewrites the manifest's
//! `name` field to match. Re-running over a half-migrated tree is safe:
//! already-moved packages report `TargetExists` and nothing is touched.

use crate::core::config::PackageEntry;
use anyhow::Context;
use std::path::Path;
use tokio::fs;

/// Outcome of renaming one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Directory moved and manifest identifier rewritten
    Renamed,

    /// The legacy directory does not exist
    SourceMissing,

    /// The published-name directory is already in place; nothing moved
    TargetExists,
}

/// Rename one package directory and update its manifest identifier.
///
/// Only the exact `name = "<old>"` occurrence is rewritten; everything
/// else in the manifest is preserved.
pub async fn rename_package(
    packages_root: &Path,
    old: &str,
    new: &str,
) -> anyhow::Result<RenameOutcome> {
    let old_dir = packages_root.join(old);
    let new_dir = packages_root.join(new);

    if fs::metadata(&old_dir).await.is_err() {
        return Ok(RenameOutcome::SourceMissing);
    }
    if fs::metadata(&new_dir).await.is_ok() {
        return Ok(RenameOutcome::TargetExists);
    }

    fs::rename(&old_dir, &new_dir)
        .await
        .with_context(|| format!("Failed to rename {} -> {}", old_dir.display(), new_dir.display()))?;

    let manifest = new_dir.join("pyproject.toml");
    if fs::metadata(&manifest).await.is_ok() {
        let content = fs::read_to_string(&manifest)
            .await
            .with_context(|| format!("Failed to read {}", manifest.display()))?;

        let updated = content.replace(
            &format!("name = \"{}\"", old),
            &format!("name = \"{}\"", new),
        );

        if updated != content {
            fs::write(&manifest, updated)
                .await
                .with_context(|| format!("Failed to write {}", manifest.display()))?;
        }
    }

    Ok(RenameOutcome::Renamed)
}

/// Migrate every roster package from its legacy source-folder name to its
/// published name, narrating one status line per package.
pub async fn rename_all(packages_root: &Path, roster: &[PackageEntry]) -> anyhow::Result<()> {
    for entry in roster {
        let Some(old) = &entry.src_folder else {
            continue;
        };

        match rename_package(packages_root, old, &entry.name).await? {
            RenameOutcome::Renamed => {
                println!("📁 Renamed {} -> {}", old, entry.name);
                println!("✅ Updated {}/pyproject.toml", entry.name);
            }
            RenameOutcome::SourceMissing => {
                println!("❌ {} doesn't exist", old);
            }
            RenameOutcome::TargetExists => {
                println!("⏭️  {} already renamed", entry.name);
            }
        }
    }

    println!("\n✅ All packages renamed!");
    Ok(())
}
