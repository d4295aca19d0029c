use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::provider::{Inventory, MetadataProvider};

/// Enumerate vaults and secrets for one refresh.
pub struct FetchInventoryCmd {
    provider: Arc<dyn MetadataProvider>,
    concurrency: usize,
    generation: u64,
}

impl FetchInventoryCmd {
    pub fn new(provider: Arc<dyn MetadataProvider>, concurrency: usize, generation: u64) -> Self {
        Self {
            provider,
            concurrency,
            generation,
        }
    }
}

#[async_trait]
impl Command for FetchInventoryCmd {
    fn name(&self) -> String {
        format!("Refreshing inventory (#{})", self.generation)
    }

    async fn execute(self: Box<Self>, tx: UnboundedSender<AppMessage>) -> Result<()> {
        let message = match Inventory::collect(self.provider.as_ref(), self.concurrency).await {
            Ok(inventory) => AppMessage::InventoryLoaded {
                generation: self.generation,
                inventory,
            },
            Err(err) => AppMessage::InventoryFailed {
                generation: self.generation,
                error: err.to_string(),
            },
        };
        tx.send(message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fixture::FakeProvider;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_reports_loaded_inventory() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = FetchInventoryCmd::new(Arc::new(FakeProvider::sample()), 2, 7);

        Box::new(cmd).execute(tx).await.expect("execute");

        match rx.recv().await {
            Some(AppMessage::InventoryLoaded {
                generation,
                inventory,
            }) => {
                assert_eq!(generation, 7);
                assert_eq!(inventory.containers.len(), 3);
            }
            _ => panic!("expected InventoryLoaded"),
        }
    }

    #[tokio::test]
    async fn test_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = FetchInventoryCmd::new(Arc::new(FakeProvider::failing()), 2, 1);

        Box::new(cmd).execute(tx).await.expect("execute");

        assert!(matches!(
            rx.recv().await,
            Some(AppMessage::InventoryFailed { generation: 1, .. })
        ));
    }
}
