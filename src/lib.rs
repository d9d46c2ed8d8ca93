pub mod core;
pub mod maintenance;
pub mod orchestration;
pub mod security;
pub mod steps;
pub mod validation;

pub use core::*;
pub use maintenance::{
    PatchOutcome, RenameOutcome, patch_all, patch_manifest, rename_all, rename_package,
};
pub use orchestration::{PublishSummary, WarehousePublisher};
pub use security::{CommandError, SafeCommandExecutor, SecureTokenManager};
pub use steps::{PythonBuildStep, TwineUploadStep};
pub use validation::{ManifestChecker, ManifestReport};
