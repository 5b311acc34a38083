//! Summary harvesting.
//!
//! A [`SummaryHarvester`] turns one [`NavigatorItem`] into an
//! [`ArtifactSummary`]. [`StandardHarvester`] classifies resources by type
//! name and extracts the identifying fields the index queries on.
//!
//! # Harvested fields
//!
//! | Kind | Fields |
//! |------|--------|
//! | all | `id`, `version`, `name`, resource identifier |
//! | conformance kinds | canonical (`url`) |
//! | ValueSet | coding system (`codeSystem.system`) |
//! | ConceptMap | source and target (`sourceUri`, `sourceCanonical`, `sourceReference.reference`, and the target equivalents) |
//! | NamingSystem | every `uniqueId.value` |
//!
//! The resource identifier is the bundle position when there is one,
//! `{type}/{id}` for a standalone resource with an id, and the origin path
//! otherwise.

use camino::Utf8Path;
use dirsrc_core::{ArtifactSummary, SummaryDetails};
use smallvec::SmallVec;

use crate::node::SourceNode;
use crate::stream::NavigatorItem;

/// Resource types that carry a canonical url.
///
/// `ValueSet`, `ConceptMap` and `NamingSystem` are handled separately since
/// they have kind-specific fields.
const CONFORMANCE_TYPES: &[&str] = &[
    "ActivityDefinition",
    "CapabilityStatement",
    "CodeSystem",
    "CompartmentDefinition",
    "Conformance",
    "DataElement",
    "ExpansionProfile",
    "GraphDefinition",
    "ImplementationGuide",
    "Library",
    "Measure",
    "MessageDefinition",
    "OperationDefinition",
    "PlanDefinition",
    "Questionnaire",
    "SearchParameter",
    "StructureDefinition",
    "StructureMap",
    "TerminologyCapabilities",
    "TestScript",
];

const CONCEPT_MAP_SOURCE: &[&str] = &["sourceUri", "sourceCanonical", "sourceReference.reference"];
const CONCEPT_MAP_TARGET: &[&str] = &["targetUri", "targetCanonical", "targetReference.reference"];

/// Extracts a summary from a located resource.
pub trait SummaryHarvester: Send + Sync {
    /// Harvests `item`, found in the file `origin`.
    ///
    /// Returns `None` to skip the resource entirely.
    fn harvest(&self, origin: &Utf8Path, item: &NavigatorItem) -> Option<ArtifactSummary>;
}

/// The standard harvester for FHIR-style resources.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dirsrc_core::ResourceKind;
/// use dirsrc_summary::{NavigatorItem, SourceNode, StandardHarvester, SummaryHarvester};
///
/// let item = NavigatorItem {
///     position: None,
///     node: SourceNode::new("StructureDefinition")
///         .with_child(SourceNode::leaf("id", "p"))
///         .with_child(SourceNode::leaf("url", "http://x/p")),
/// };
///
/// let summary = StandardHarvester.harvest(Utf8Path::new("/d/profile.xml"), &item).unwrap();
/// assert_eq!(summary.kind(), ResourceKind::ConformanceResource);
/// assert_eq!(summary.resource_uri, "StructureDefinition/p");
/// assert_eq!(summary.canonical(), Some("http://x/p"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHarvester;

impl SummaryHarvester for StandardHarvester {
    fn harvest(&self, origin: &Utf8Path, item: &NavigatorItem) -> Option<ArtifactSummary> {
        let node = &item.node;
        if node.name.is_empty() {
            return None;
        }

        let details = details_for(node);
        let id = node.value_of("id");
        let resource_uri = match (&item.position, id) {
            (Some(position), _) => position.clone(),
            (None, Some(id)) => format!("{}/{id}", node.name),
            (None, None) => origin.as_str().to_owned(),
        };

        let mut summary = ArtifactSummary::new(origin, resource_uri, node.name.as_str(), details);
        if let Some(id) = id {
            summary = summary.with_id(id);
        }
        if let Some(url) = node.value_of("url") {
            summary = summary.with_canonical(url);
        }
        if let Some(version) = node.value_of("version") {
            summary = summary.with_version(version);
        }
        if let Some(name) = node.value_of("name") {
            summary = summary.with_name(name);
        }
        Some(summary)
    }
}

fn details_for(node: &SourceNode) -> SummaryDetails {
    match node.name.as_str() {
        "ValueSet" => SummaryDetails::ValueSet {
            system: node.value_of("codeSystem.system").map(ToOwned::to_owned),
        },
        "ConceptMap" => SummaryDetails::ConceptMap {
            source: first_value(node, CONCEPT_MAP_SOURCE),
            target: first_value(node, CONCEPT_MAP_TARGET),
        },
        "NamingSystem" => SummaryDetails::NamingSystem {
            unique_ids: node
                .values_of("uniqueId.value")
                .into_iter()
                .map(ToOwned::to_owned)
                .collect::<SmallVec<_>>(),
        },
        other if CONFORMANCE_TYPES.contains(&other) => SummaryDetails::ConformanceResource,
        _ => SummaryDetails::Generic,
    }
}

fn first_value(node: &SourceNode, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| node.value_of(path))
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirsrc_core::ResourceKind;

    fn harvest(node: SourceNode, position: Option<&str>) -> ArtifactSummary {
        let item = NavigatorItem {
            position: position.map(ToOwned::to_owned),
            node,
        };
        StandardHarvester
            .harvest(Utf8Path::new("/d/file.xml"), &item)
            .unwrap()
    }

    #[test]
    fn test_generic_resource_has_no_canonical() {
        let summary = harvest(
            SourceNode::new("Patient")
                .with_child(SourceNode::leaf("id", "p1"))
                .with_child(SourceNode::leaf("url", "http://x/not-canonical")),
            None,
        );
        assert_eq!(summary.kind(), ResourceKind::Generic);
        assert_eq!(summary.resource_uri, "Patient/p1");
        assert_eq!(summary.canonical(), None);
    }

    #[test]
    fn test_resource_uri_falls_back_to_origin() {
        let summary = harvest(SourceNode::new("Basic"), None);
        assert_eq!(summary.resource_uri, "/d/file.xml");
        assert_eq!(summary.id, None);
    }

    #[test]
    fn test_resource_uri_prefers_position() {
        let summary = harvest(
            SourceNode::new("Patient").with_child(SourceNode::leaf("id", "p1")),
            Some("http://x/Patient/p1"),
        );
        assert_eq!(summary.resource_uri, "http://x/Patient/p1");
    }

    #[test]
    fn test_value_set_system() {
        let summary = harvest(
            SourceNode::new("ValueSet")
                .with_child(SourceNode::leaf("url", "http://x/ValueSet/vs"))
                .with_child(
                    SourceNode::new("codeSystem")
                        .with_child(SourceNode::leaf("system", "http://x/vs")),
                ),
            None,
        );
        assert_eq!(summary.kind(), ResourceKind::ValueSet);
        assert_eq!(summary.value_set_system(), Some("http://x/vs"));
        assert_eq!(summary.canonical(), Some("http://x/ValueSet/vs"));
    }

    #[test]
    fn test_concept_map_endpoints_across_versions() {
        let stu3 = harvest(
            SourceNode::new("ConceptMap")
                .with_child(SourceNode::leaf("sourceUri", "http://x/src"))
                .with_child(
                    SourceNode::new("targetReference")
                        .with_child(SourceNode::leaf("reference", "http://x/tgt")),
                ),
            None,
        );
        assert_eq!(stu3.concept_map_source(), Some("http://x/src"));
        assert_eq!(stu3.concept_map_target(), Some("http://x/tgt"));

        let r4 = harvest(
            SourceNode::new("ConceptMap")
                .with_child(SourceNode::leaf("targetCanonical", "http://x/tgt")),
            None,
        );
        assert_eq!(r4.concept_map_source(), None);
        assert_eq!(r4.concept_map_target(), Some("http://x/tgt"));
    }

    #[test]
    fn test_naming_system_unique_ids() {
        let summary = harvest(
            SourceNode::new("NamingSystem")
                .with_child(SourceNode::leaf("name", "Example"))
                .with_child(
                    SourceNode::new("uniqueId").with_child(SourceNode::leaf("value", "urn:oid:1")),
                )
                .with_child(
                    SourceNode::new("uniqueId").with_child(SourceNode::leaf("value", "http://x/ns")),
                ),
            None,
        );
        assert_eq!(summary.kind(), ResourceKind::NamingSystem);
        assert_eq!(summary.unique_ids(), ["urn:oid:1", "http://x/ns"]);
        assert_eq!(summary.name.as_deref(), Some("Example"));
    }

    #[test]
    fn test_conformance_types() {
        for type_name in ["StructureDefinition", "CodeSystem", "SearchParameter"] {
            let summary = harvest(SourceNode::new(type_name), None);
            assert_eq!(summary.kind(), ResourceKind::ConformanceResource, "{type_name}");
        }
    }
}
