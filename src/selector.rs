//! Selection of the resources this function edits.

use crate::document::Document;

pub const SECRET_KIND: &str = "Secret";
pub const SECRET_API_VERSION: &str = "v1";

/// Matches core `v1` Secrets. Comparison is exact and case-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretSelector;

impl SecretSelector {
    pub fn matches(&self, document: &Document) -> bool {
        document.kind() == Some(SECRET_KIND) && document.api_version() == Some(SECRET_API_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(yaml: &str) -> bool {
        SecretSelector.matches(&Document::from_yaml(yaml).unwrap())
    }

    #[test]
    fn core_v1_secret_matches() {
        assert!(matches("apiVersion: v1\nkind: Secret\n"));
    }

    #[test]
    fn other_resources_do_not_match() {
        assert!(!matches("apiVersion: v1\nkind: ConfigMap\n"));
        assert!(!matches("apiVersion: v1\nkind: secret\n"));
        assert!(!matches("apiVersion: V1\nkind: Secret\n"));
        assert!(!matches("apiVersion: external-secrets.io/v1beta1\nkind: Secret\n"));
        assert!(!matches("kind: Secret\n"));
        assert!(!matches("apiVersion: v1\n"));
        assert!(!matches("- apiVersion: v1\n  kind: Secret\n"));
    }
}
