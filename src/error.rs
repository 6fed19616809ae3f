use crate::document::NodeKind;
use crate::provider::ProviderError;
use thiserror::Error;

/// Failures while resolving placeholders in a Secret.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A governed field is present but is not a mapping.
    #[error("field `{field}` must be a mapping, found {found}")]
    MalformedField { field: String, found: NodeKind },

    /// The secret provider failed for one entry.
    #[error("getting gopass secret from {value} for {key} in `{field}`")]
    SecretLookup {
        field: String,
        key: String,
        /// The original placeholder, marker included.
        value: String,
        #[source]
        source: ProviderError,
    },
}

/// The annotation subtree cannot be edited.
#[derive(Debug, Error)]
#[error("failed to remove annotation {key:?}: `{path}` is a {found}, not a mapping")]
pub struct AnnotationEditError {
    pub key: String,
    pub path: &'static str,
    pub found: NodeKind,
}

/// A stage of the function failed on one resource.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("clearing annotations on {resource}")]
    ClearAnnotations {
        resource: String,
        #[source]
        source: AnnotationEditError,
    },

    #[error("transforming gopass keys on {resource}")]
    ResolveSecrets {
        resource: String,
        #[source]
        source: ResolveError,
    },
}
