use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::navigator::model::ViewSelector;

#[derive(Parser, Debug)]
#[command(
    name = "discretion",
    version,
    about = "Browse Azure Key Vaults and copy secret values from the terminal"
)]
pub struct Args {
    /// Table to show first
    #[arg(long, value_enum, default_value_t = View::Vaults)]
    pub view: View,

    /// Only enumerate these subscriptions (repeatable)
    #[arg(short, long = "subscription", value_name = "ID")]
    pub subscriptions: Vec<String>,

    /// Also list disabled secrets
    #[arg(long)]
    pub include_disabled: bool,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Vaults,
    Secrets,
}

impl From<View> for ViewSelector {
    fn from(view: View) -> Self {
        match view {
            View::Vaults => Self::Vaults,
            View::Secrets => Self::Secrets,
        }
    }
}
