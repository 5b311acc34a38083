//! Domain types for the artifact index.
//!
//! - [`summary`] - kind-tagged resource summaries
//! - [`error_info`] - per-file parse failures collected during harvesting
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use dirsrc_core::{ArtifactSummary, ErrorInfo, ResourceKind, SummaryDetails};
//! ```

mod error_info;
mod summary;

pub use error_info::ErrorInfo;
pub use summary::{ArtifactSummary, ResourceKind, SummaryDetails};
