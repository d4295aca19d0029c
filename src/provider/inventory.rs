use futures::{StreamExt, stream};
use tracing::{info, warn};

use crate::navigator::cache::SecretRecord;
use crate::provider::{ContainerInfo, MetadataProvider, ProviderError};

/// Everything one refresh learned about the vaults and their secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub containers: Vec<ContainerInfo>,
    pub secrets: Vec<SecretRecord>,
    /// Vaults whose secrets could not be listed.
    pub skipped: Vec<String>,
}

impl Inventory {
    /// Enumerate all vaults, then list each vault's secrets.
    ///
    /// Up to `concurrency` vaults are listed at once; results keep vault
    /// order. A vault that fails to list is skipped rather than failing the
    /// whole refresh.
    pub async fn collect(
        provider: &dyn MetadataProvider,
        concurrency: usize,
    ) -> Result<Self, ProviderError> {
        let containers = provider.list_containers().await?;

        let listings: Vec<_> = stream::iter(containers.iter().cloned())
            .map(|container| async move {
                let listing = provider.list_secrets(&container).await;
                (container, listing)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut secrets = Vec::new();
        let mut skipped = Vec::new();
        for (container, listing) in listings {
            match listing {
                Ok(summaries) => secrets.extend(summaries.into_iter().map(|summary| {
                    SecretRecord::new(
                        &container.name,
                        &container.url,
                        summary.name,
                        summary.version,
                        summary.enabled,
                    )
                })),
                Err(ProviderError::PermissionDenied(reason)) => {
                    info!(vault = %container.name, %reason, "No permission to list secrets");
                    skipped.push(container.name.clone());
                }
                Err(err) => {
                    warn!(vault = %container.name, %err, "Failed to list secrets");
                    skipped.push(container.name.clone());
                }
            }
        }

        info!(
            vaults = containers.len(),
            secrets = secrets.len(),
            skipped = skipped.len(),
            "Inventory collected"
        );

        Ok(Self {
            containers,
            secrets,
            skipped,
        })
    }
}
