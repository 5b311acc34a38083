//! XML navigator.
//!
//! Converts a FHIR-style XML document into a [`SourceNode`] tree. The root
//! element names the resource type; primitive values live in the `value`
//! attribute (`<id value="vs1"/>`); text content is ignored, which also
//! skips over narrative XHTML.

use std::io::{BufReader, Read};

use camino::Utf8Path;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::HarvestError;
use crate::node::SourceNode;

/// Reads an XML resource document into a node tree.
///
/// # Errors
///
/// Returns [`HarvestError::Format`] if the document is not well-formed or
/// has no single root element, and [`HarvestError::Io`] if reading fails.
pub fn read_xml(path: &Utf8Path, reader: &mut dyn Read) -> Result<SourceNode, HarvestError> {
    let mut xml = Reader::from_reader(BufReader::new(reader));
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<SourceNode> = Vec::new();
    let mut root: Option<SourceNode> = None;

    loop {
        let event = xml.read_event_into(&mut buf).map_err(|e| xml_error(path, e))?;
        match event {
            Event::Start(start) => {
                let node = element_node(path, &start)?;
                if stack.is_empty() && root.is_some() {
                    return Err(HarvestError::format(path, "multiple root elements"));
                }
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = element_node(path, &start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None if root.is_none() => root = Some(node),
                    None => return Err(HarvestError::format(path, "multiple root elements")),
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| HarvestError::format(path, "unbalanced end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(HarvestError::format(path, "unexpected end of document"));
    }
    root.ok_or_else(|| HarvestError::format(path, "document has no root element"))
}

fn element_node(path: &Utf8Path, start: &BytesStart<'_>) -> Result<SourceNode, HarvestError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let value = match start.try_get_attribute("value") {
        Ok(Some(attr)) => Some(
            attr.unescape_value()
                .map_err(|e| HarvestError::format(path, e.to_string()))?
                .into_owned(),
        ),
        Ok(None) => None,
        Err(e) => return Err(HarvestError::format(path, e.to_string())),
    };

    Ok(SourceNode {
        name,
        value,
        children: Vec::new(),
    })
}

fn xml_error(path: &Utf8Path, error: quick_xml::Error) -> HarvestError {
    match error {
        quick_xml::Error::Io(io) => {
            HarvestError::io(path, std::io::Error::new(io.kind(), io.to_string()))
        }
        other => HarvestError::format(path, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(source: &str) -> Result<SourceNode, HarvestError> {
        read_xml(Utf8Path::new("test.xml"), &mut source.as_bytes())
    }

    #[test]
    fn test_reads_root_and_value_attributes() {
        let node = read(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <StructureDefinition xmlns="http://hl7.org/fhir">
              <id value="p1"/>
              <url value="http://x/p"/>
              <text><div xmlns="http://www.w3.org/1999/xhtml">narrative &amp; more</div></text>
            </StructureDefinition>"#,
        )
        .unwrap();
        assert_eq!(node.name, "StructureDefinition");
        assert_eq!(node.value_of("id"), Some("p1"));
        assert_eq!(node.value_of("url"), Some("http://x/p"));
    }

    #[test]
    fn test_unescapes_attribute_values() {
        let node = read(r#"<ValueSet><name value="A &amp; B"/></ValueSet>"#).unwrap();
        assert_eq!(node.value_of("name"), Some("A & B"));
    }

    #[test]
    fn test_nested_resource_elements() {
        let node = read(
            r#"<Bundle xmlns="http://hl7.org/fhir">
                 <entry><fullUrl value="http://x/Patient/1"/>
                   <resource><Patient><id value="1"/></Patient></resource>
                 </entry>
               </Bundle>"#,
        )
        .unwrap();
        let resource = node
            .child("entry")
            .and_then(|e| e.child("resource"))
            .and_then(SourceNode::nested_resource)
            .unwrap();
        assert_eq!(resource.name, "Patient");
    }

    #[test]
    fn test_empty_root_element() {
        let node = read(r#"<Patient/>"#).unwrap();
        assert_eq!(node.name, "Patient");
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_mismatched_tags_are_format_errors() {
        let err = read(r#"<Patient><id value="1"/></Observation>"#).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_truncated_document_is_format_error() {
        let err = read(r#"<Patient><id value="1"/>"#).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_empty_document_is_format_error() {
        assert!(read("").unwrap_err().is_recoverable());
        assert!(read("not xml at all").unwrap_err().is_recoverable());
    }
}
