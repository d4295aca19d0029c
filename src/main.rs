use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::commands::SystemClipboard;
use crate::config::KeyResolver;
use crate::navigator::cache::SecretCache;
use crate::navigator::{Backends, Navigator, NavigatorOptions};
use crate::provider::AzureCli;
use crate::ui::Screen;

mod app;
mod cli;
pub mod commands;
mod config;
pub mod navigator;
pub mod provider;
mod theme;
pub mod tui;
mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting discretion");

    let args = cli::Args::parse();

    let config = config::load(args.config.as_deref())?;
    let keys = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let azure = Arc::new(AzureCli::new().with_subscriptions(args.subscriptions));
    let backends = Backends {
        provider: azure.clone(),
        resolver: azure,
        clipboard: Arc::new(SystemClipboard),
    };

    let mut options = NavigatorOptions::from(&config.table);
    options.initial_view = args.view.into();
    options.include_disabled |= args.include_disabled;

    let navigator = Navigator::new(
        Arc::clone(&keys),
        backends,
        SecretCache::new(config.resolver.timeout()),
        options,
    );
    let screen = Screen::new(theme, keys);

    let mut app = App::new(navigator, screen);
    app.run().await?;

    info!("Exiting discretion");
    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("discretion").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "discretion.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
