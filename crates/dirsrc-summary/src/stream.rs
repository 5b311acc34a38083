//! Navigator streams: one item per resource found in a document.
//!
//! A plain resource document yields a single item. A `Bundle` yields one
//! item per `entry.resource`, positioned at the entry's `fullUrl`.
//!
//! The [`NavigatorStreamFactory`] trait is the seam the index uses to turn a
//! file into a stream. It is keyed by extension: only `.xml` and `.json`
//! (case-insensitive) are supported by [`DefaultStreamFactory`].

use std::io::Read;

use camino::Utf8Path;
use tracing::debug;

use crate::error::HarvestError;
use crate::json::read_json;
use crate::node::SourceNode;
use crate::xml::read_xml;

/// The two serialization formats the navigators understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.xml`
    Xml,
    /// `.json`
    Json,
}

impl DocumentFormat {
    /// Detects the format from a path's extension, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsrc_summary::DocumentFormat;
    /// use camino::Utf8Path;
    ///
    /// assert_eq!(DocumentFormat::from_path(Utf8Path::new("a.XML")), Some(DocumentFormat::Xml));
    /// assert_eq!(DocumentFormat::from_path(Utf8Path::new("a.json")), Some(DocumentFormat::Json));
    /// assert_eq!(DocumentFormat::from_path(Utf8Path::new("a.txt")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let ext = path.extension()?;
        if ext.eq_ignore_ascii_case("xml") {
            Some(Self::Xml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// A resource located inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorItem {
    /// Location of the resource inside its document (bundle `fullUrl`), or
    /// `None` for a standalone resource.
    pub position: Option<String>,
    /// The resource itself.
    pub node: SourceNode,
}

/// The resources of one document, in document order.
#[derive(Debug, Default)]
pub struct NavigatorStream {
    items: std::vec::IntoIter<NavigatorItem>,
}

impl NavigatorStream {
    /// Builds a stream from a document root, expanding bundles.
    #[must_use]
    pub fn from_root(origin: &Utf8Path, root: SourceNode) -> Self {
        let items = if root.name == "Bundle" {
            let entries = bundle_items(origin, &root);
            debug!(origin = %origin, entries = entries.len(), "Expanded bundle");
            entries
        } else {
            vec![NavigatorItem {
                position: None,
                node: root,
            }]
        };
        Self {
            items: items.into_iter(),
        }
    }
}

impl Iterator for NavigatorStream {
    type Item = NavigatorItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

fn bundle_items(origin: &Utf8Path, bundle: &SourceNode) -> Vec<NavigatorItem> {
    bundle
        .children_named("entry")
        .enumerate()
        .filter_map(|(index, entry)| {
            let resource = entry.child("resource")?.nested_resource()?;
            let position = entry
                .value_of("fullUrl")
                .map_or_else(|| format!("{origin}#entry[{index}]"), ToOwned::to_owned);
            Some(NavigatorItem {
                position: Some(position),
                node: resource.clone(),
            })
        })
        .collect()
}

/// Turns files into navigator streams.
///
/// Implementations must be shareable across the rayon pool used for
/// parallel harvesting.
pub trait NavigatorStreamFactory: Send + Sync {
    /// Returns `true` if this factory can read `path`.
    fn supports(&self, path: &Utf8Path) -> bool;

    /// Reads the document at `path` from `reader` into a stream.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Format`] for malformed documents,
    /// [`HarvestError::Io`] for read failures and
    /// [`HarvestError::UnsupportedFormat`] if [`supports`](Self::supports)
    /// would have returned `false`.
    fn open(&self, path: &Utf8Path, reader: &mut dyn Read) -> Result<NavigatorStream, HarvestError>;
}

/// The standard factory: XML and JSON, chosen by extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStreamFactory;

impl NavigatorStreamFactory for DefaultStreamFactory {
    fn supports(&self, path: &Utf8Path) -> bool {
        DocumentFormat::from_path(path).is_some()
    }

    fn open(&self, path: &Utf8Path, reader: &mut dyn Read) -> Result<NavigatorStream, HarvestError> {
        let root = match DocumentFormat::from_path(path) {
            Some(DocumentFormat::Xml) => read_xml(path, reader)?,
            Some(DocumentFormat::Json) => read_json(path, reader)?,
            None => return Err(HarvestError::UnsupportedFormat(path.to_owned())),
        };
        Ok(NavigatorStream::from_root(path, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(path: &str, source: &str) -> Result<Vec<NavigatorItem>, HarvestError> {
        DefaultStreamFactory
            .open(Utf8Path::new(path), &mut source.as_bytes())
            .map(|stream| stream.collect())
    }

    #[test]
    fn test_supports_by_extension() {
        let factory = DefaultStreamFactory;
        assert!(factory.supports(Utf8Path::new("/d/a.xml")));
        assert!(factory.supports(Utf8Path::new("/d/a.Json")));
        assert!(!factory.supports(Utf8Path::new("/d/a.txt")));
        assert!(!factory.supports(Utf8Path::new("/d/xml")));
    }

    #[test]
    fn test_single_resource_yields_one_item() {
        let items = open("/d/p.json", r#"{"resourceType": "Patient", "id": "p"}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].position, None);
        assert_eq!(items[0].node.name, "Patient");
    }

    #[test]
    fn test_bundle_yields_entries() {
        let items = open(
            "/d/b.xml",
            r#"<Bundle>
                 <entry><fullUrl value="http://x/ValueSet/a"/><resource><ValueSet/></resource></entry>
                 <entry><resource><ConceptMap/></resource></entry>
                 <entry><fullUrl value="http://x/empty"/></entry>
               </Bundle>"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].position.as_deref(), Some("http://x/ValueSet/a"));
        assert_eq!(items[0].node.name, "ValueSet");
        assert_eq!(items[1].position.as_deref(), Some("/d/b.xml#entry[1]"));
        assert_eq!(items[1].node.name, "ConceptMap");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = open("/d/a.txt", "{}").unwrap_err();
        assert!(matches!(err, HarvestError::UnsupportedFormat(_)));
    }
}
