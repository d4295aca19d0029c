use std::sync::Arc;

use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::commands::Command;

/// Destination for resolved secret values.
pub trait ClipboardSink: Send + Sync {
    fn write(&self, text: &str) -> Result<()>;
}

/// The system clipboard.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Writes a value to the clipboard and reports the outcome.
pub struct CopyToClipboardCmd {
    sink: Arc<dyn ClipboardSink>,
    text: String,
    label: String,
}

impl CopyToClipboardCmd {
    pub fn new(
        sink: Arc<dyn ClipboardSink>,
        text: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            text: text.into(),
            label: label.into(),
        }
    }
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.label)
    }

    async fn execute(self: Box<Self>, tx: UnboundedSender<AppMessage>) -> Result<()> {
        let message = match self.sink.write(&self.text) {
            Ok(()) => AppMessage::Copied { label: self.label },
            Err(err) => AppMessage::CopyFailed {
                label: self.label,
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
    use crate::provider::fixture::FakeClipboard;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_copy_writes_and_reports() {
        let clipboard = FakeClipboard::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = CopyToClipboardCmd::new(Arc::new(clipboard.clone()), "s3cret", "kv/db");

        assert_eq!(cmd.name(), "Copying kv/db");
        Box::new(cmd).execute(tx).await.expect("execute");

        assert_eq!(clipboard.writes(), ["s3cret"]);
        assert!(matches!(rx.recv().await, Some(AppMessage::Copied { label }) if label == "kv/db"));
    }

    #[tokio::test]
    async fn test_copy_failure_is_reported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = CopyToClipboardCmd::new(Arc::new(FakeClipboard::broken()), "x", "kv/db");

        Box::new(cmd).execute(tx).await.expect("execute");

        assert!(matches!(rx.recv().await, Some(AppMessage::CopyFailed { .. })));
    }
}
