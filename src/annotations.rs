//! Removal of pipeline-internal annotations.
//!
//! kustomize marks function inputs with bookkeeping annotations that must not
//! leave the pipeline on a rendered Secret. The cleaner strips them and drops
//! `metadata.annotations` entirely when nothing else is left in it.

use crate::document::{as_mapping_mut, Document, NodeKind};
use crate::error::AnnotationEditError;

/// Marks a resource as local-only configuration.
pub const LOCAL_CONFIG_ANNOTATION: &str = "config.kubernetes.io/local-config";
/// Marks a resource as function metadata.
pub const FUNCTION_ANNOTATION: &str = "config.kubernetes.io/function";

const ANNOTATIONS_FIELD: &str = "annotations";

#[derive(Debug, Clone)]
pub struct AnnotationCleaner {
    keys: Vec<&'static str>,
}

impl Default for AnnotationCleaner {
    fn default() -> Self {
        Self {
            keys: vec![LOCAL_CONFIG_ANNOTATION, FUNCTION_ANNOTATION],
        }
    }
}

impl AnnotationCleaner {
    /// Strip marker annotations from `document`, returning how many were removed.
    ///
    /// Missing `metadata` or `metadata.annotations` is a no-op. A null
    /// `annotations` is dropped like an emptied one. Either field being
    /// anything other than a mapping is an [`AnnotationEditError`].
    pub fn clear(&self, document: &mut Document) -> Result<usize, AnnotationEditError> {
        let Some(metadata) = document.field_mut("metadata") else {
            return Ok(0);
        };
        let metadata = match as_mapping_mut(metadata) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => return Ok(0),
            Err(found) => return Err(self.edit_error("metadata", found)),
        };

        let Some(annotations) = metadata.get_mut(ANNOTATIONS_FIELD) else {
            return Ok(0);
        };
        let annotations = match as_mapping_mut(annotations) {
            Ok(Some(annotations)) => annotations,
            Ok(None) => {
                metadata.shift_remove(ANNOTATIONS_FIELD);
                return Ok(0);
            }
            Err(found) => return Err(self.edit_error("metadata.annotations", found)),
        };

        let mut removed = 0;
        for key in &self.keys {
            // shift_remove keeps the remaining annotations in order.
            if annotations.shift_remove(*key).is_some() {
                removed += 1;
            }
        }

        if annotations.is_empty() {
            metadata.shift_remove(ANNOTATIONS_FIELD);
        }

        Ok(removed)
    }

    fn edit_error(&self, path: &'static str, found: NodeKind) -> AnnotationEditError {
        AnnotationEditError {
            key: self.keys.first().copied().unwrap_or_default().to_string(),
            path,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::key_label;
    use pretty_assertions::assert_eq;

    fn doc(yaml: &str) -> Document {
        Document::from_yaml(yaml).unwrap()
    }

    fn annotation_keys(document: &Document) -> Vec<String> {
        document
            .field("metadata")
            .and_then(|m| m.get("annotations"))
            .and_then(|a| a.as_mapping())
            .map(|a| a.keys().map(key_label).collect())
            .unwrap_or_default()
    }

    #[test]
    fn removes_only_marker_keys() {
        let mut document = doc(
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: mysecret\n  annotations:\n    \
             config.kubernetes.io/local-config: \"true\"\n    \
             config.kubernetes.io/function: \"true\"\n    \
             other-annotation: \"value\"\n",
        );
        let removed = AnnotationCleaner::default().clear(&mut document).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(
            document,
            doc("apiVersion: v1\nkind: Secret\nmetadata:\n  name: mysecret\n  annotations:\n    other-annotation: value\n")
        );
    }

    #[test]
    fn drops_annotations_when_emptied() {
        let mut document = doc(
            "kind: Secret\nmetadata:\n  name: mysecret\n  annotations:\n    \
             config.kubernetes.io/local-config: \"true\"\n    \
             config.kubernetes.io/function: \"true\"\n",
        );
        AnnotationCleaner::default().clear(&mut document).unwrap();
        assert_eq!(document, doc("kind: Secret\nmetadata:\n  name: mysecret\n"));
        assert!(document.field("metadata").unwrap().get("annotations").is_none());
    }

    #[test]
    fn preserves_order_of_remaining_annotations() {
        let mut document = doc(
            "kind: Secret\nmetadata:\n  annotations:\n    \
             zeta: \"1\"\n    \
             config.kubernetes.io/function: \"true\"\n    \
             alpha: \"2\"\n    \
             config.kubernetes.io/local-config: \"true\"\n    \
             mid: \"3\"\n",
        );
        AnnotationCleaner::default().clear(&mut document).unwrap();
        assert_eq!(annotation_keys(&document), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_metadata_or_annotations_is_a_no_op() {
        for yaml in [
            "kind: Secret\n",
            "kind: Secret\nmetadata: ~\n",
            "kind: Secret\nmetadata:\n  name: x\n",
            "kind: Secret\nmetadata:\n  annotations:\n    keep: me\n",
        ] {
            let mut document = doc(yaml);
            assert_eq!(AnnotationCleaner::default().clear(&mut document).unwrap(), 0);
            assert_eq!(document, doc(yaml), "input: {yaml}");
        }
    }

    #[test]
    fn null_annotations_are_dropped() {
        let mut document = doc("kind: Secret\nmetadata:\n  name: x\n  annotations: ~\n");
        assert_eq!(AnnotationCleaner::default().clear(&mut document).unwrap(), 0);
        assert_eq!(document, doc("kind: Secret\nmetadata:\n  name: x\n"));
    }

    #[test]
    fn non_mapping_annotations_is_an_edit_error() {
        let mut document = doc("kind: Secret\nmetadata:\n  annotations:\n  - a\n");
        let err = AnnotationCleaner::default().clear(&mut document).unwrap_err();
        assert_eq!(err.key, LOCAL_CONFIG_ANNOTATION);
        assert_eq!(err.path, "metadata.annotations");
        assert_eq!(err.found, NodeKind::Sequence);
        assert_eq!(
            err.to_string(),
            "failed to remove annotation \"config.kubernetes.io/local-config\": \
             `metadata.annotations` is a sequence, not a mapping"
        );
    }

    #[test]
    fn non_mapping_metadata_is_an_edit_error() {
        let mut document = doc("kind: Secret\nmetadata: broken\n");
        let err = AnnotationCleaner::default().clear(&mut document).unwrap_err();
        assert_eq!(err.path, "metadata");
        assert_eq!(err.found, NodeKind::Scalar);
    }
}
