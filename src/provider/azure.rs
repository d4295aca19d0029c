//! Azure Key Vault backend driven through the Azure CLI.
//!
//! Authentication is whatever `az login` established; every call shells out
//! to `az ... --output json` and parses the result.
//!
//! ## Requirements
//!
//! - `az` CLI installed and logged in
//! - `Microsoft.KeyVault/vaults/read` on the subscriptions to browse
//! - secret list/get permissions (access policy or RBAC) on each vault

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::provider::{
    ContainerInfo, MetadataProvider, ProviderError, SecretResolver, SecretSummary,
};

const DEFAULT_PROGRAM: &str = "az";

#[derive(Debug, Deserialize)]
struct Subscription {
    id: String,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Vault {
    id: String,
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    resource_group: Option<String>,
    #[serde(default)]
    properties: Option<VaultProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultProperties {
    vault_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecretItem {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    attributes: Option<SecretAttributes>,
}

#[derive(Debug, Deserialize)]
struct SecretAttributes {
    #[serde(default)]
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AzureCli {
    program: String,
    subscriptions: Vec<String>,
}

impl Default for AzureCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCli {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            subscriptions: Vec::new(),
        }
    }

    /// Only enumerate the given subscriptions instead of every enabled one.
    #[must_use]
    pub fn with_subscriptions(mut self, subscriptions: Vec<String>) -> Self {
        self.subscriptions = subscriptions;
        self
    }

    async fn run<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, ProviderError> {
        trace!(program = %self.program, ?args, "Running Azure CLI");
        let output = Command::new(&self.program)
            .args(args)
            .args(["--output", "json"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProviderError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn subscription_ids(&self) -> Result<Vec<String>, ProviderError> {
        if !self.subscriptions.is_empty() {
            return Ok(self.subscriptions.clone());
        }

        let subscriptions: Vec<Subscription> = self.run(&["account", "list"]).await?;
        Ok(subscriptions
            .into_iter()
            .filter(|s| s.state.as_deref().is_none_or(|state| state == "Enabled"))
            .map(|s| s.id)
            .collect())
    }
}

#[async_trait]
impl MetadataProvider for AzureCli {
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, ProviderError> {
        let mut containers = Vec::new();

        for subscription in self.subscription_ids().await? {
            let vaults: Vec<Vault> = match self
                .run(&["keyvault", "list", "--subscription", &subscription])
                .await
            {
                Ok(vaults) => vaults,
                Err(err @ (ProviderError::Launch { .. } | ProviderError::NotAuthenticated)) => {
                    return Err(err);
                }
                Err(err) => {
                    warn!(%subscription, %err, "Failed to list vaults");
                    continue;
                }
            };

            debug!(%subscription, count = vaults.len(), "Listed vaults");
            containers.extend(vaults.into_iter().map(|vault| to_container(&subscription, vault)));
        }

        Ok(containers)
    }

    async fn list_secrets(
        &self,
        container: &ContainerInfo,
    ) -> Result<Vec<SecretSummary>, ProviderError> {
        let items: Vec<SecretItem> = self
            .run(&["keyvault", "secret", "list", "--id", &container.url])
            .await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let (id_name, version) = parse_secret_id(&item.id);
                SecretSummary {
                    name: item.name.unwrap_or(id_name),
                    version,
                    enabled: item.attributes.and_then(|a| a.enabled).unwrap_or(true),
                }
            })
            .collect())
    }
}

#[async_trait]
impl SecretResolver for AzureCli {
    async fn resolve(
        &self,
        container_url: &str,
        name: &str,
        version: &str,
    ) -> Result<String, ProviderError> {
        let base = container_url.trim_end_matches('/');
        let id = if version.is_empty() {
            format!("{base}/secrets/{name}")
        } else {
            format!("{base}/secrets/{name}/{version}")
        };

        let bundle: SecretBundle = self.run(&["keyvault", "secret", "show", "--id", &id]).await?;
        bundle.value.ok_or(ProviderError::EmptyValue)
    }
}

fn to_container(subscription: &str, vault: Vault) -> ContainerInfo {
    let url = vault
        .properties
        .and_then(|p| p.vault_uri)
        .map_or_else(
            || format!("https://{}.vault.azure.net", vault.name),
            |uri| uri.trim_end_matches('/').to_string(),
        );
    let resource_group = vault
        .resource_group
        .unwrap_or_else(|| resource_group_from_id(&vault.id).to_string());

    ContainerInfo {
        name: vault.name,
        region: vault.location,
        resource_group,
        subscription: subscription.to_string(),
        url,
    }
}

/// `/subscriptions/<sub>/resourceGroups/<rg>/providers/...` -> `<rg>`
fn resource_group_from_id(id: &str) -> &str {
    id.split('/').nth(4).unwrap_or_default()
}

/// `https://<vault>.vault.azure.net/secrets/<name>[/<version>]` -> (name, version)
fn parse_secret_id(id: &str) -> (String, String) {
    let mut segments = id
        .split_once("/secrets/")
        .map_or("", |(_, rest)| rest)
        .split('/');
    let name = segments.next().unwrap_or_default().to_string();
    let version = segments.next().unwrap_or_default().to_string();
    (name, version)
}

fn classify_failure(stderr: &str) -> ProviderError {
    let message = stderr.trim();
    if message.contains("az login") {
        ProviderError::NotAuthenticated
    } else if message.contains("Forbidden")
        || message.contains("AuthorizationFailed")
        || message.contains("does not have secrets list permission")
    {
        ProviderError::PermissionDenied(message.to_string())
    } else {
        ProviderError::Cli(message.to_string())
    }
}
