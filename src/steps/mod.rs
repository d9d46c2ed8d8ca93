//! Subprocess-backed implementations of the build and upload steps

pub mod build;
pub mod upload;

pub use build::PythonBuildStep;
pub use upload::TwineUploadStep;
