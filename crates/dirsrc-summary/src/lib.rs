//! Document navigation and summary harvesting for XML and JSON resources.
//!
//! This crate is what the index calls when it needs to know what a file
//! contains without building the full resource. It has two seams:
//!
//! - [`NavigatorStreamFactory`]: turns a file into a [`NavigatorStream`] of
//!   located resources ([`NavigatorItem`]). Bundles yield one item per entry.
//! - [`SummaryHarvester`]: turns each item into an
//!   [`ArtifactSummary`](dirsrc_core::ArtifactSummary).
//!
//! [`DefaultStreamFactory`] and [`StandardHarvester`] are the standard
//! implementations.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use dirsrc_summary::{DefaultStreamFactory, NavigatorStreamFactory, StandardHarvester, SummaryHarvester};
//!
//! let path = Utf8Path::new("/data/valueset.json");
//! let source = r#"{"resourceType": "ValueSet", "id": "vs", "codeSystem": {"system": "http://x/vs"}}"#;
//!
//! let stream = DefaultStreamFactory.open(path, &mut source.as_bytes())?;
//! let summaries: Vec<_> = stream
//!     .filter_map(|item| StandardHarvester.harvest(path, &item))
//!     .collect();
//!
//! assert_eq!(summaries.len(), 1);
//! assert_eq!(summaries[0].value_set_system(), Some("http://x/vs"));
//! # Ok::<(), dirsrc_summary::HarvestError>(())
//! ```
//!
//! # Error classes
//!
//! A malformed document is a [`HarvestError::Format`], which callers are
//! expected to record and move past. Anything else is fatal.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
mod harvest;
mod json;
mod node;
mod stream;
mod xml;

pub use error::HarvestError;
pub use harvest::{StandardHarvester, SummaryHarvester};
pub use json::read_json;
pub use node::SourceNode;
pub use stream::{DefaultStreamFactory, DocumentFormat, NavigatorItem, NavigatorStream, NavigatorStreamFactory};
pub use xml::read_xml;
