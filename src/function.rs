//! The gopass secret function.
//!
//! Visits a batch of resources in order. Every core `v1` Secret has its
//! bookkeeping annotations cleared and its placeholders resolved; all other
//! resources pass through untouched. Each Secret is edited on a working copy
//! that replaces the original only when both stages succeed.

use crate::annotations::AnnotationCleaner;
use crate::document::Document;
use crate::error::FunctionError;
use crate::provider::SecretProvider;
use crate::resolver::SecretResolver;
use crate::selector::SecretSelector;
use std::sync::Arc;
use tracing::{debug, info};

/// Counters for one run over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Resources seen.
    pub resources: usize,
    /// Resources selected as Secrets.
    pub secrets: usize,
    pub annotations_removed: usize,
    pub values_resolved: usize,
}

pub struct GopassSecretFunction {
    selector: SecretSelector,
    cleaner: AnnotationCleaner,
    resolver: SecretResolver,
}

impl GopassSecretFunction {
    pub fn new(provider: Arc<dyn SecretProvider>) -> Self {
        Self::with_resolver(SecretResolver::new(provider))
    }

    pub fn with_resolver(resolver: SecretResolver) -> Self {
        Self {
            selector: SecretSelector,
            cleaner: AnnotationCleaner::default(),
            resolver,
        }
    }

    /// Transform `items` in place. Stops at the first failing resource.
    pub async fn process(&self, items: &mut [Document]) -> Result<ProcessSummary, FunctionError> {
        let mut summary = ProcessSummary {
            resources: items.len(),
            ..Default::default()
        };

        for item in items.iter_mut() {
            if !self.selector.matches(item) {
                continue;
            }

            let resource = item.display_id();
            let mut working = item.clone();

            let removed = self.cleaner.clear(&mut working).map_err(|source| {
                FunctionError::ClearAnnotations {
                    resource: resource.clone(),
                    source,
                }
            })?;

            let resolved = self
                .resolver
                .resolve(&mut working)
                .await
                .map_err(|source| FunctionError::ResolveSecrets {
                    resource: resource.clone(),
                    source,
                })?;

            debug!(
                "{}: removed {} annotation(s), resolved {} value(s)",
                resource, removed, resolved
            );

            *item = working;
            summary.secrets += 1;
            summary.annotations_removed += removed;
            summary.values_resolved += resolved;
        }

        info!(
            "Processed {} resource(s): {} secret(s), {} value(s) resolved",
            summary.resources, summary.secrets, summary.values_resolved
        );

        Ok(summary)
    }
}
