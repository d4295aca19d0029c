//! Backends that supply vault metadata and secret values.
//!
//! The navigator only talks to the [`MetadataProvider`] and
//! [`SecretResolver`] traits; [`AzureCli`] is the production implementation.

mod azure;
#[cfg(test)]
pub mod fixture;
mod inventory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use azure::AzureCli;
pub use inventory::Inventory;

/// A vault as reported by the metadata backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub name: String,
    pub region: String,
    pub resource_group: String,
    pub subscription: String,
    pub url: String,
}

/// Secret metadata as listed from a vault. An empty version means latest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSummary {
    pub name: String,
    pub version: String,
    pub enabled: bool,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not logged in, run `az login` first")]
    NotAuthenticated,
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Cli(String),
    #[error("unexpected CLI output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("secret has no value")]
    EmptyValue,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, ProviderError>;

    async fn list_secrets(
        &self,
        container: &ContainerInfo,
    ) -> Result<Vec<SecretSummary>, ProviderError>;
}

#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(
        &self,
        container_url: &str,
        name: &str,
        version: &str,
    ) -> Result<String, ProviderError>;
}
