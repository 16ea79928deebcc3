//! Provider registry.

use dashmap::DashMap;
use std::sync::Arc;

use thiserror::Error;
use ugt_protocols::{ProviderKind, TranslationError, TranslationProvider};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Provider already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Provider not found: {0}")]
    NotFound(String),
}

/// Registry for translation providers, keyed by provider id.
pub struct ProviderRegistry {
    providers: DashMap<String, Arc<dyn TranslationProvider>>,
}

impl ProviderRegistry {
    /// Create a new provider registry.
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Register a provider.
    pub fn register(&self, provider: Arc<dyn TranslationProvider>) -> Result<(), RegistryError> {
        let id = provider.id().to_string();

        if self.providers.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        self.providers.insert(id, provider);
        Ok(())
    }

    /// Unregister a provider.
    pub fn unregister(&self, id: &str) -> Result<(), RegistryError> {
        self.providers
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        Ok(())
    }

    /// Get a provider by ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn TranslationProvider>> {
        self.providers.get(id).map(|p| p.clone())
    }

    /// The provider serving `kind`.
    pub fn resolve(&self, kind: ProviderKind) -> Result<Arc<dyn TranslationProvider>, TranslationError> {
        self.get(kind.as_str())
            .ok_or_else(|| TranslationError::UnknownProvider(kind.as_str().to_string()))
    }

    /// List all provider IDs.
    pub fn list_ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.id().to_string()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
