//! Maintenance utilities for the packages tree
//!
//! Both utilities consume the configured roster read-only: the patcher
//! appends missing wheel build stanzas, the renamer migrates legacy
//! directory names to their published names.

pub mod manifest_patch;
pub mod rename;

pub use manifest_patch::{PatchOutcome, patch_all, patch_manifest};
pub use rename::{RenameOutcome, rename_all, rename_package};
