//! Orchestration layer for the publish workflow
//!
//! This module provides the sequential publisher that drives the
//! clean → build → upload sequence over the configured roster.

pub mod publisher;

pub use publisher::{PublishSummary, WarehousePublisher};
