//! Placeholder resolution for Secret resources.
//!
//! Walks the governed fields of a document in policy order, looks up every
//! `gopass:` placeholder through the injected provider and rewrites the
//! entries with the field's encoding. All lookups for a document complete
//! before anything is written, so a failure leaves the document as it was.

use crate::document::{key_label, Document};
use crate::error::ResolveError;
use crate::policy::{Encoding, FieldPolicy, SECRET_FIELD_POLICIES};
use crate::provider::SecretProvider;
use serde_yaml::Value;
use std::sync::Arc;
use tracing::debug;

/// Marker that turns a value into a lookup.
pub const GOPASS_PREFIX: &str = "gopass:";

/// Lookup path carried by a placeholder value, or `None` for opaque values.
pub fn placeholder_path(value: &str) -> Option<&str> {
    value.strip_prefix(GOPASS_PREFIX)
}

/// A placeholder found during the scan phase.
#[derive(Debug)]
struct Placeholder {
    field: &'static str,
    encoding: Encoding,
    key: Value,
    raw: String,
}

impl Placeholder {
    fn path(&self) -> &str {
        &self.raw[GOPASS_PREFIX.len()..]
    }
}

pub struct SecretResolver {
    provider: Arc<dyn SecretProvider>,
    policies: Vec<FieldPolicy>,
}

impl SecretResolver {
    /// Resolver over the standard Secret policy table.
    pub fn new(provider: Arc<dyn SecretProvider>) -> Self {
        Self {
            provider,
            policies: SECRET_FIELD_POLICIES.to_vec(),
        }
    }

    /// Replace the policy table. Fields are processed in the given order.
    pub fn with_policies(mut self, policies: Vec<FieldPolicy>) -> Self {
        self.policies = policies;
        self
    }

    pub fn policies(&self) -> &[FieldPolicy] {
        &self.policies
    }

    /// Resolve every placeholder in the governed fields of `document`.
    ///
    /// Returns the number of values rewritten.
    pub async fn resolve(&self, document: &mut Document) -> Result<usize, ResolveError> {
        let placeholders = self.scan(document)?;
        if placeholders.is_empty() {
            return Ok(0);
        }

        let mut resolved = Vec::with_capacity(placeholders.len());
        for placeholder in placeholders {
            let key = key_label(&placeholder.key);
            debug!(
                "Looking up '{}' for {}.{} via {}",
                placeholder.path(),
                placeholder.field,
                key,
                self.provider.name()
            );

            let raw = self
                .provider
                .lookup(placeholder.path())
                .await
                .map_err(|source| ResolveError::SecretLookup {
                    field: placeholder.field.to_string(),
                    key,
                    value: placeholder.raw.clone(),
                    source,
                })?;

            let value = placeholder.encoding.apply(&raw);
            resolved.push((placeholder, value));
        }

        let count = resolved.len();
        for (placeholder, value) in resolved {
            // The scan already proved the field is a mapping.
            if let Ok(Some(mapping)) = document.mapping_mut(placeholder.field) {
                if let Some(slot) = mapping.get_mut(&placeholder.key) {
                    *slot = Value::String(value);
                }
            }
        }

        Ok(count)
    }

    /// Collect placeholders in policy order, then mapping order.
    fn scan(&self, document: &Document) -> Result<Vec<Placeholder>, ResolveError> {
        let mut placeholders = Vec::new();

        for policy in &self.policies {
            let mapping = match document.mapping(policy.field) {
                Ok(Some(mapping)) => mapping,
                Ok(None) => continue,
                Err(found) => {
                    return Err(ResolveError::MalformedField {
                        field: policy.field.to_string(),
                        found,
                    })
                }
            };

            for (key, value) in mapping {
                let Some(raw) = value.as_str() else { continue };
                if placeholder_path(raw).is_some() {
                    placeholders.push(Placeholder {
                        field: policy.field,
                        encoding: policy.encoding,
                        key: key.clone(),
                        raw: raw.to_string(),
                    });
                }
            }
        }

        Ok(placeholders)
    }
}
