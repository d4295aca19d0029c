//! Async commands pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! The navigator returns commands, the App spawns them, and each one reports
//! back by posting an [`AppMessage`] into the main loop.

mod clipboard;
mod inventory;
mod resolve;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;

pub use clipboard::{ClipboardSink, CopyToClipboardCmd, SystemClipboard};
pub use inventory::FetchInventoryCmd;
pub use resolve::ResolveSecretCmd;

#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logging.
    /// Include context like secret names.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>, tx: UnboundedSender<AppMessage>) -> Result<()>;
}
