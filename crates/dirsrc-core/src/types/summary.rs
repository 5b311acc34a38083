//! Kind-tagged resource summaries.
//!
//! A summary is the small set of identifying fields harvested from a
//! resource without materializing it. The resource kind is an explicit tag
//! ([`ResourceKind`]) and kind-specific fields live in the matching
//! [`SummaryDetails`] variant, so narrowing by kind is a `match` rather than
//! a type test.

use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The kind of resource a summary describes.
///
/// `ValueSet`, `ConceptMap` and `NamingSystem` are refinements of
/// `ConformanceResource`: they can carry a canonical identifier and take
/// part in the canonical uniqueness check.
///
/// # Examples
///
/// ```
/// use dirsrc_core::ResourceKind;
///
/// assert!(ResourceKind::ValueSet.is_conformance());
/// assert!(!ResourceKind::Generic.is_conformance());
///
/// // Filtering by the broader kind admits its refinements.
/// assert!(ResourceKind::ConformanceResource.admits(ResourceKind::ConceptMap));
/// assert!(!ResourceKind::ValueSet.admits(ResourceKind::ConceptMap));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Any resource without conformance semantics.
    Generic,
    /// A conformance resource (profile, capability statement, ...).
    ConformanceResource,
    /// A value set.
    ValueSet,
    /// A concept map.
    ConceptMap,
    /// A naming system.
    NamingSystem,
}

impl ResourceKind {
    /// All kinds, broadest first.
    pub const ALL: [Self; 5] = [
        Self::Generic,
        Self::ConformanceResource,
        Self::ValueSet,
        Self::ConceptMap,
        Self::NamingSystem,
    ];

    /// Returns `true` for conformance resources and their refinements.
    #[inline]
    #[must_use]
    pub const fn is_conformance(self) -> bool {
        !matches!(self, Self::Generic)
    }

    /// Returns `true` if a summary of kind `kind` passes a filter on `self`.
    ///
    /// `Generic` admits everything and `ConformanceResource` admits every
    /// conformance kind; the specific kinds admit only themselves.
    #[must_use]
    pub fn admits(self, kind: Self) -> bool {
        match self {
            Self::Generic => true,
            Self::ConformanceResource => kind.is_conformance(),
            specific => specific == kind,
        }
    }

    /// Returns the kebab-case label for this kind.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::ConformanceResource => "conformance",
            Self::ValueSet => "value-set",
            Self::ConceptMap => "concept-map",
            Self::NamingSystem => "naming-system",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if wanted == "conformance-resource" {
            return Ok(Self::ConformanceResource);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == wanted)
            .ok_or_else(|| format!("unknown resource kind '{s}'"))
    }
}

/// Kind-specific summary fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryDetails {
    /// No kind-specific fields.
    Generic,

    /// A conformance resource with no further indexed fields.
    ConformanceResource,

    /// A value set and the coding system it defines.
    ValueSet {
        /// The coding system defined inline by the value set.
        system: Option<String>,
    },

    /// A concept map and its endpoints.
    ConceptMap {
        /// The source value set or uri.
        source: Option<String>,
        /// The target value set or uri.
        target: Option<String>,
    },

    /// A naming system and its unique ids.
    NamingSystem {
        /// Every unique id the naming system declares.
        unique_ids: SmallVec<[String; 2]>,
    },
}

impl SummaryDetails {
    /// Returns the kind tag for these details.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Generic => ResourceKind::Generic,
            Self::ConformanceResource => ResourceKind::ConformanceResource,
            Self::ValueSet { .. } => ResourceKind::ValueSet,
            Self::ConceptMap { .. } => ResourceKind::ConceptMap,
            Self::NamingSystem { .. } => ResourceKind::NamingSystem,
        }
    }
}

/// One harvested record per discovered resource occurrence.
///
/// A single file may contribute several summaries (one per bundle entry).
/// The canonical identifier is only ever set on conformance kinds;
/// [`with_canonical`](Self::with_canonical) ignores it otherwise.
///
/// # Examples
///
/// ```
/// use dirsrc_core::{ArtifactSummary, ResourceKind, SummaryDetails};
///
/// let summary = ArtifactSummary::new(
///     "/data/valueset.json",
///     "ValueSet/vs1",
///     "ValueSet",
///     SummaryDetails::ValueSet { system: Some("http://x/vs".to_owned()) },
/// )
/// .with_canonical("http://x/ValueSet/vs1");
///
/// assert_eq!(summary.kind(), ResourceKind::ValueSet);
/// assert_eq!(summary.value_set_system(), Some("http://x/vs"));
/// assert_eq!(summary.canonical(), Some("http://x/ValueSet/vs1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactSummary {
    /// The file the summary was harvested from.
    pub origin: Utf8PathBuf,

    /// The resource identifier.
    pub resource_uri: String,

    /// The resource type name as written in the document.
    pub resource_type: String,

    /// The logical id, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The canonical identifier (conformance kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,

    /// The business version, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// The computer-friendly name, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Kind tag and kind-specific fields.
    #[serde(flatten)]
    pub details: SummaryDetails,
}

impl ArtifactSummary {
    /// Creates a summary with the required fields.
    #[must_use]
    pub fn new(
        origin: impl Into<Utf8PathBuf>,
        resource_uri: impl Into<String>,
        resource_type: impl Into<String>,
        details: SummaryDetails,
    ) -> Self {
        Self {
            origin: origin.into(),
            resource_uri: resource_uri.into(),
            resource_type: resource_type.into(),
            id: None,
            canonical: None,
            version: None,
            name: None,
            details,
        }
    }

    /// Sets the logical id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the canonical identifier if this is a conformance kind.
    #[must_use]
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        if self.kind().is_conformance() {
            self.canonical = Some(canonical.into());
        }
        self
    }

    /// Sets the business version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the kind tag.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.details.kind()
    }

    /// Returns the originating file.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &Utf8Path {
        &self.origin
    }

    /// Returns the canonical identifier of a conformance resource.
    ///
    /// Always `None` for generic resources, even if the field was set.
    #[must_use]
    pub fn canonical(&self) -> Option<&str> {
        self.canonical.as_deref().filter(|_| self.kind().is_conformance())
    }

    /// Returns the coding system of a value set summary.
    #[must_use]
    pub fn value_set_system(&self) -> Option<&str> {
        match &self.details {
            SummaryDetails::ValueSet { system } => system.as_deref(),
            _ => None,
        }
    }

    /// Returns the source endpoint of a concept map summary.
    #[must_use]
    pub fn concept_map_source(&self) -> Option<&str> {
        match &self.details {
            SummaryDetails::ConceptMap { source, .. } => source.as_deref(),
            _ => None,
        }
    }

    /// Returns the target endpoint of a concept map summary.
    #[must_use]
    pub fn concept_map_target(&self) -> Option<&str> {
        match &self.details {
            SummaryDetails::ConceptMap { target, .. } => target.as_deref(),
            _ => None,
        }
    }

    /// Returns the unique ids of a naming system summary.
    #[must_use]
    pub fn unique_ids(&self) -> &[String] {
        match &self.details {
            SummaryDetails::NamingSystem { unique_ids } => unique_ids,
            _ => &[],
        }
    }

    /// Returns `true` if this is a naming system declaring `unique_id`.
    #[must_use]
    pub fn has_unique_id(&self, unique_id: &str) -> bool {
        self.unique_ids().iter().any(|id| id == unique_id)
    }
}
