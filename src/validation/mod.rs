pub mod manifest;

pub use manifest::{ManifestChecker, ManifestReport};
