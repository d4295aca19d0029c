use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::navigator::cache::SecretCache;
use crate::provider::SecretResolver;

/// Resolve one secret's value through the cache.
pub struct ResolveSecretCmd {
    cache: SecretCache,
    resolver: Arc<dyn SecretResolver>,
    identifier: String,
    label: String,
}

impl ResolveSecretCmd {
    pub fn new(
        cache: SecretCache,
        resolver: Arc<dyn SecretResolver>,
        identifier: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            resolver,
            identifier: identifier.into(),
            label: label.into(),
        }
    }
}

#[async_trait]
impl Command for ResolveSecretCmd {
    fn name(&self) -> String {
        format!("Resolving {}", self.label)
    }

    async fn execute(self: Box<Self>, tx: UnboundedSender<AppMessage>) -> Result<()> {
        let resolution = self
            .cache
            .resolve(&self.identifier, self.resolver.as_ref())
            .await;
        tx.send(AppMessage::SecretResolved(resolution))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::cache::{Resolution, SecretRecord};
    use crate::provider::fixture::FakeResolver;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_posts_resolution() {
        let cache = SecretCache::default();
        let record = SecretRecord::new("kv", "https://kv.vault.azure.net", "token", "", true);
        cache.replace_all([record.clone()]);
        let resolver = FakeResolver::default().with_value("token", "abc");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let cmd = ResolveSecretCmd::new(cache, Arc::new(resolver), &record.identifier, "kv/token");
        Box::new(cmd).execute(tx).await.expect("execute");

        match rx.recv().await {
            Some(AppMessage::SecretResolved(Resolution::Resolved(resolved))) => {
                assert_eq!(resolved.value.as_deref(), Some("abc"));
            }
            _ => panic!("expected a resolved secret"),
        }
    }
}
