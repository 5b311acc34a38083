//! Core types, errors, and configuration for the dirsrc artifact index.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`ArtifactSummary`] and [`ResourceKind`], the kind-tagged summary records
//! - [`ErrorInfo`], a recoverable per-file parse failure
//! - [`DiscoverySettings`] and [`DuplicateFilePreference`] for configuring discovery
//! - [`ConfigError`] for configuration loading failures
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{
    DEFAULT_MASK, DiscoverySettings, DuplicateFilePreference, default_root, parse_mask,
    resolve_default_root,
};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{ArtifactSummary, ErrorInfo, ResourceKind, SummaryDetails};
