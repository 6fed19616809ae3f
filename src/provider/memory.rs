//! In-memory secret provider.

use super::{ProviderError, SecretProvider};
use async_trait::async_trait;
use std::collections::HashMap;

/// Serves secrets from a fixed path -> value map.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    secrets: HashMap<String, String>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.secrets.insert(path.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryProvider
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            secrets: iter
                .into_iter()
                .map(|(path, value)| (path.into(), value.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl SecretProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn lookup(&self, path: &str) -> Result<String, ProviderError> {
        self.secrets
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }
}
