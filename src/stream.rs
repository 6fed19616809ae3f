//! Resource stream reader and writer.
//!
//! kustomize hands a function either a `ResourceList` envelope or a plain
//! multi-document YAML stream. [`ResourceStream`] reads both and writes the
//! batch back in the same shape it arrived in.
//!
//! Documents that come out equal to what was read are written back from their
//! input text, so comments, quoting and scalar spelling survive. Only edited
//! documents are re-serialized.

use crate::document::{Document, NodeKind};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

pub const RESOURCE_LIST_KIND: &str = "ResourceList";

/// `apiVersion`s accepted for a `ResourceList` envelope.
pub const RESOURCE_LIST_API_VERSIONS: [&str; 2] = ["config.kubernetes.io/v1", "config.k8s.io/v1alpha1"];

const ITEMS_FIELD: &str = "items";
const DOCUMENT_SEPARATOR: &str = "---\n";

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to parse input YAML: {0}")]
    Parse(serde_yaml::Error),

    #[error("invalid ResourceList: `items` must be a sequence, found {0}")]
    InvalidItems(NodeKind),

    #[error("failed to serialize output YAML: {0}")]
    Serialize(serde_yaml::Error),
}

/// A document as read, paired with the text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
struct SourceText {
    value: Value,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Envelope {
    /// `ResourceList` mapping; its `items` slot is refilled on output.
    ResourceList {
        list: Mapping,
        items: Vec<Value>,
        text: String,
    },
    /// Bare `---` separated documents. Empty when no source text is known.
    Documents(Vec<SourceText>),
}

/// A batch of resources together with the framing it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceStream {
    pub items: Vec<Document>,
    envelope: Envelope,
}

impl ResourceStream {
    /// Wrap documents for plain multi-document output.
    pub fn from_documents(items: Vec<Document>) -> Self {
        Self {
            items,
            envelope: Envelope::Documents(Vec::new()),
        }
    }

    /// Read a `ResourceList` or a multi-document stream. Empty documents are dropped.
    pub fn parse(input: &str) -> Result<Self, StreamError> {
        let mut documents = Vec::new();
        for de in serde_yaml::Deserializer::from_str(input) {
            let value = Value::deserialize(de).map_err(StreamError::Parse)?;
            if !value.is_null() {
                documents.push(value);
            }
        }

        if documents.len() == 1 && is_resource_list(&documents[0]) {
            if let Some(Value::Mapping(list)) = documents.pop() {
                return Self::from_resource_list(list, input);
            }
        }

        let sources = source_texts(input, &documents);
        Ok(Self {
            items: documents.into_iter().map(Document::new).collect(),
            envelope: Envelope::Documents(sources),
        })
    }

    fn from_resource_list(mut list: Mapping, input: &str) -> Result<Self, StreamError> {
        let items = match list.get_mut(ITEMS_FIELD) {
            Some(slot) => match std::mem::take(slot) {
                Value::Null => Vec::new(),
                Value::Sequence(items) => items,
                other => return Err(StreamError::InvalidItems(NodeKind::of(&other))),
            },
            None => Vec::new(),
        };

        Ok(Self {
            items: items.iter().cloned().map(Document::new).collect(),
            envelope: Envelope::ResourceList {
                list,
                items,
                text: input.to_string(),
            },
        })
    }

    pub fn is_resource_list(&self) -> bool {
        matches!(self.envelope, Envelope::ResourceList { .. })
    }

    /// Serialize the batch in the shape it was read in.
    pub fn to_yaml(&self) -> Result<String, StreamError> {
        match &self.envelope {
            Envelope::ResourceList { list, items, text } => {
                let unchanged = items.len() == self.items.len()
                    && items.iter().zip(&self.items).all(|(read, item)| read == item.root());
                if unchanged {
                    return Ok(text.clone());
                }

                let mut list = list.clone();
                let items = self.items.iter().map(|d| d.root().clone()).collect();
                list.insert(Value::from(ITEMS_FIELD), Value::Sequence(items));
                serde_yaml::to_string(&list).map_err(StreamError::Serialize)
            }
            Envelope::Documents(sources) => {
                let mut out = String::new();
                for (index, item) in self.items.iter().enumerate() {
                    if index > 0 {
                        out.push_str(DOCUMENT_SEPARATOR);
                    }
                    match sources.get(index).filter(|source| source.value == *item.root()) {
                        Some(source) => out.push_str(&source.text),
                        None => out.push_str(&item.to_yaml().map_err(StreamError::Serialize)?),
                    }
                }
                Ok(out)
            }
        }
    }
}

fn is_resource_list(value: &Value) -> bool {
    let kind = value.get("kind").and_then(Value::as_str);
    let api_version = value.get("apiVersion").and_then(Value::as_str);
    kind == Some(RESOURCE_LIST_KIND)
        && api_version.is_some_and(|v| RESOURCE_LIST_API_VERSIONS.contains(&v))
}

/// Pair every parsed document with its slice of `input`.
///
/// Returns an empty list when the text cannot be matched up with `documents`
/// one to one; the writer then re-serializes everything.
fn source_texts(input: &str, documents: &[Value]) -> Vec<SourceText> {
    let Some(chunks) = split_documents(input) else {
        return Vec::new();
    };

    let mut sources = Vec::with_capacity(documents.len());
    for mut text in chunks {
        if is_blank(&text) {
            continue;
        }
        let value = match serde_yaml::from_str::<Value>(&text) {
            Ok(Value::Null) => continue,
            Ok(value) => value,
            Err(_) => return Vec::new(),
        };
        if documents.get(sources.len()) != Some(&value) {
            return Vec::new();
        }
        if !text.ends_with('\n') {
            text.push('\n');
        }
        sources.push(SourceText { value, text });
    }

    if sources.len() != documents.len() {
        return Vec::new();
    }
    sources
}

/// Cut a stream at bare `---` lines.
///
/// `None` for streams using a marker with inline content, a `...` end marker
/// or a directive.
fn split_documents(input: &str) -> Option<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in input.split_inclusive('\n') {
        if let Some(rest) = line.strip_prefix("---") {
            if !rest.trim().is_empty() {
                return None;
            }
            chunks.push(std::mem::take(&mut current));
            continue;
        }
        if line.starts_with("...") || line.starts_with('%') {
            return None;
        }
        current.push_str(line);
    }
    chunks.push(current);

    Some(chunks)
}

/// Only whitespace and comments.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESOURCE_LIST: &str = "\
apiVersion: config.kubernetes.io/v1
kind: ResourceList
items:
- apiVersion: v1
  kind: Secret
  metadata:
    name: a
- apiVersion: v1
  kind: ConfigMap
  metadata:
    name: b
functionConfig:
  apiVersion: v1
  kind: ConfigMap
  metadata:
    name: fn-config
";

    #[test]
    fn reads_resource_list() {
        let stream = ResourceStream::parse(RESOURCE_LIST).unwrap();
        assert!(stream.is_resource_list());
        let names: Vec<_> = stream.items.iter().map(|d| d.name().unwrap()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn unchanged_resource_list_is_written_verbatim() {
        let input = format!("# rendered by kustomize\n{RESOURCE_LIST}");
        let stream = ResourceStream::parse(&input).unwrap();
        assert_eq!(stream.to_yaml().unwrap(), input);
    }

    #[test]
    fn edited_resource_list_keeps_envelope_and_item_position() {
        let mut stream = ResourceStream::parse(RESOURCE_LIST).unwrap();
        stream.items[0]
            .mapping_mut("metadata")
            .unwrap()
            .unwrap()
            .insert(Value::from("namespace"), Value::from("apps"));

        let out = stream.to_yaml().unwrap();
        let reparsed: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(reparsed["items"][0]["metadata"]["namespace"], Value::from("apps"));
        assert_eq!(reparsed["functionConfig"]["metadata"]["name"], Value::from("fn-config"));

        let keys: Vec<_> = reparsed
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, ["apiVersion", "kind", "items", "functionConfig"]);
    }

    #[test]
    fn reads_multi_document_stream() {
        let input = "apiVersion: v1\nkind: Secret\nmetadata:\n  name: a\n---\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: b\n";
        let stream = ResourceStream::parse(input).unwrap();
        assert!(!stream.is_resource_list());
        assert_eq!(stream.items.len(), 2);

        let out = stream.to_yaml().unwrap();
        assert_eq!(
            out,
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: a\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: b\n"
        );
    }

    #[test]
    fn untouched_documents_keep_their_text() {
        let input = "\
# application settings
apiVersion: example.com/v1
kind: App
metadata:
  name: app # inline comment
spec:
  version: 1.10
  mode: 0755
  flag: 0x1F
  quoted: \"yes\"
";
        let stream = ResourceStream::parse(input).unwrap();
        assert_eq!(stream.to_yaml().unwrap(), input);
    }

    #[test]
    fn only_edited_documents_are_reserialized() {
        let input = "\
---
kind: ConfigMap
metadata:
  name: first   # keep me
---
kind: Secret
metadata:
  name: second
data:
  password: c2VjcmV0
---
kind: ConfigMap
metadata:
  name: third
data: {a: 'b'}";
        let mut stream = ResourceStream::parse(input).unwrap();
        stream.items[1]
            .mapping_mut("data")
            .unwrap()
            .unwrap()
            .insert(Value::from("token"), Value::from("dG9rZW4"));

        assert_eq!(
            stream.to_yaml().unwrap(),
            "\
kind: ConfigMap
metadata:
  name: first   # keep me
---
kind: Secret
metadata:
  name: second
data:
  password: c2VjcmV0
  token: dG9rZW4
---
kind: ConfigMap
metadata:
  name: third
data: {a: 'b'}
"
        );
    }

    #[test]
    fn inline_document_marker_falls_back_to_serialization() {
        let stream = ResourceStream::parse("--- {kind: ConfigMap, data: {a: 'b'}}\n").unwrap();
        assert_eq!(stream.items.len(), 1);
        assert_eq!(stream.to_yaml().unwrap(), "kind: ConfigMap\ndata:\n  a: b\n");
    }

    #[test]
    fn built_documents_are_serialized() {
        let stream = ResourceStream::from_documents(vec![
            Document::from_yaml("kind: ConfigMap\nmetadata:\n  name: cm\n").unwrap(),
        ]);
        assert_eq!(stream.to_yaml().unwrap(), "kind: ConfigMap\nmetadata:\n  name: cm\n");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let stream = ResourceStream::parse("").unwrap();
        assert!(stream.items.is_empty());
        assert_eq!(stream.to_yaml().unwrap(), "");
    }

    #[test]
    fn resource_list_without_items() {
        let stream =
            ResourceStream::parse("apiVersion: config.kubernetes.io/v1\nkind: ResourceList\n").unwrap();
        assert!(stream.is_resource_list());
        assert!(stream.items.is_empty());
    }

    #[test]
    fn resource_list_with_scalar_items_is_rejected() {
        let err = ResourceStream::parse(
            "apiVersion: config.kubernetes.io/v1\nkind: ResourceList\nitems: nope\n",
        )
        .unwrap_err();
        assert!(matches!(err, StreamError::InvalidItems(NodeKind::Scalar)));
    }

    #[test]
    fn list_with_unknown_api_version_is_a_plain_document() {
        let stream =
            ResourceStream::parse("apiVersion: example.com/v1\nkind: ResourceList\nitems: []\n").unwrap();
        assert!(!stream.is_resource_list());
        assert_eq!(stream.items.len(), 1);
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = ResourceStream::parse("a: [unclosed\n").unwrap_err();
        assert!(matches!(err, StreamError::Parse(_)));
    }
}
