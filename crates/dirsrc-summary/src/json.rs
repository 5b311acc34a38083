//! JSON navigator.
//!
//! Converts a FHIR-style JSON document into a [`SourceNode`] tree. The
//! resource type comes from the `resourceType` property; arrays become
//! repeated children; `_element` companion properties (primitive
//! extensions) are skipped. A leading UTF-8 byte order mark is ignored.

use std::io::{BufRead, BufReader, Read};

use camino::Utf8Path;
use serde_json::{Map, Value};

use crate::error::HarvestError;
use crate::node::SourceNode;

const RESOURCE_TYPE: &str = "resourceType";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a JSON resource document into a node tree.
///
/// # Errors
///
/// Returns [`HarvestError::Format`] if the document is not valid JSON or its
/// root is not a resource object, and [`HarvestError::Io`] if reading fails.
pub fn read_json(path: &Utf8Path, reader: &mut dyn Read) -> Result<SourceNode, HarvestError> {
    let mut reader = BufReader::new(reader);
    skip_bom(&mut reader).map_err(|e| HarvestError::io(path, e))?;

    let value: Value = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            HarvestError::io(path, e.into())
        } else {
            HarvestError::format(path, e.to_string())
        }
    })?;

    match &value {
        Value::Object(map) => resource_node(map)
            .ok_or_else(|| HarvestError::format(path, "root object has no resourceType")),
        _ => Err(HarvestError::format(path, "root is not a JSON object")),
    }
}

fn skip_bom(reader: &mut impl BufRead) -> std::io::Result<()> {
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(())
}

/// Converts an object carrying `resourceType` into a resource node.
fn resource_node(map: &Map<String, Value>) -> Option<SourceNode> {
    let resource_type = map.get(RESOURCE_TYPE)?.as_str()?;
    let mut node = SourceNode::new(resource_type);
    append_properties(&mut node, map);
    Some(node)
}

fn append_properties(node: &mut SourceNode, map: &Map<String, Value>) {
    for (key, value) in map {
        if key == RESOURCE_TYPE || key.starts_with('_') {
            continue;
        }
        append_value(node, key, value);
    }
}

fn append_value(parent: &mut SourceNode, name: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                append_value(parent, name, item);
            }
        }
        Value::Object(map) => {
            let mut child = SourceNode::new(name);
            match resource_node(map) {
                Some(nested) => child.children.push(nested),
                None => append_properties(&mut child, map),
            }
            parent.children.push(child);
        }
        Value::String(s) => parent.children.push(SourceNode::leaf(name, s.as_str())),
        Value::Number(n) => parent.children.push(SourceNode::leaf(name, n.to_string())),
        Value::Bool(b) => parent.children.push(SourceNode::leaf(name, b.to_string())),
        Value::Null => parent.children.push(SourceNode::new(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(source: &str) -> Result<SourceNode, HarvestError> {
        read_json(Utf8Path::new("test.json"), &mut source.as_bytes())
    }

    #[test]
    fn test_reads_resource_type_and_primitives() {
        let node = read(r#"{"resourceType": "ValueSet", "id": "vs1", "experimental": true}"#)
            .unwrap();
        assert_eq!(node.name, "ValueSet");
        assert_eq!(node.value_of("id"), Some("vs1"));
        assert_eq!(node.value_of("experimental"), Some("true"));
    }

    #[test]
    fn test_arrays_become_repeated_children() {
        let node = read(
            r#"{"resourceType": "NamingSystem",
                "uniqueId": [{"value": "urn:oid:1"}, {"value": "urn:oid:2"}]}"#,
        )
        .unwrap();
        assert_eq!(node.values_of("uniqueId.value"), vec!["urn:oid:1", "urn:oid:2"]);
    }

    #[test]
    fn test_nested_resources_are_wrapped() {
        let node = read(
            r#"{"resourceType": "Bundle",
                "entry": [{"fullUrl": "http://x/Patient/1",
                           "resource": {"resourceType": "Patient", "id": "1"}}]}"#,
        )
        .unwrap();
        let entry = node.child("entry").unwrap();
        let resource = entry.child("resource").and_then(SourceNode::nested_resource).unwrap();
        assert_eq!(resource.name, "Patient");
        assert_eq!(resource.value_of("id"), Some("1"));
    }

    #[test]
    fn test_skips_primitive_extensions() {
        let node = read(r#"{"resourceType": "Patient", "_id": {"extension": []}}"#).unwrap();
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_malformed_json_is_format_error() {
        let err = read(r#"{"resourceType": "Patient", "#).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(br#"{"resourceType": "Patient", "id": "x1"}"#);

        let node = read_json(Utf8Path::new("bom.json"), &mut bytes.as_slice()).unwrap();

        assert_eq!(node.name, "Patient");
        assert_eq!(node.value_of("id"), Some("x1"));
    }

    #[test]
    fn test_missing_resource_type_is_format_error() {
        assert!(read(r#"{"id": "x"}"#).unwrap_err().is_recoverable());
        assert!(read(r#"[1, 2]"#).unwrap_err().is_recoverable());
    }
}
