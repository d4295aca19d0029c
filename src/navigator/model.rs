//! Table data backing the two navigator views.

use std::fmt;

use crate::provider::Inventory;

/// A fixed-width table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u16,
}

impl Column {
    pub const fn new(title: &'static str, width: u16) -> Self {
        Self { title, width }
    }
}

pub const VAULT_COLUMNS: &[Column] = &[
    Column::new("Name", 24),
    Column::new("Region", 16),
    Column::new("Resource Group", 24),
    Column::new("Subscription", 36),
];

pub const SECRET_COLUMNS: &[Column] = &[
    Column::new("Vault", 24),
    Column::new("Name", 36),
    Column::new("Version", 32),
];

/// One table row: display cells plus the key of the record it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
    key: Option<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells, key: None }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Identifier of the backing secret record, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// All cells joined by a single space, in column order.
    pub fn haystack(&self) -> String {
        self.cells.join(" ")
    }
}

/// Ordered rows plus the column schema they are displayed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: &'static [Column],
    rows: Vec<Row>,
}

impl Dataset {
    pub const fn new(columns: &'static [Column], rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub const fn empty(columns: &'static [Column]) -> Self {
        Self::new(columns, Vec::new())
    }

    pub const fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewSelector {
    #[default]
    Vaults,
    Secrets,
}

impl ViewSelector {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Vaults => Self::Secrets,
            Self::Secrets => Self::Vaults,
        }
    }

    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Vaults => VAULT_COLUMNS,
            Self::Secrets => SECRET_COLUMNS,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Vaults => "vaults",
            Self::Secrets => "secrets",
        }
    }
}

impl fmt::Display for ViewSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Both datasets, rebuilt wholesale from an [`Inventory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub vaults: Dataset,
    pub secrets: Dataset,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            vaults: Dataset::empty(ViewSelector::Vaults.columns()),
            secrets: Dataset::empty(ViewSelector::Secrets.columns()),
        }
    }
}

impl ViewModel {
    /// Build both datasets. Disabled secrets are left out unless
    /// `include_disabled` is set.
    pub fn from_inventory(inventory: &Inventory, include_disabled: bool) -> Self {
        let vaults = inventory
            .containers
            .iter()
            .map(|vault| {
                Row::new(vec![
                    vault.name.clone(),
                    vault.region.clone(),
                    vault.resource_group.clone(),
                    vault.subscription.clone(),
                ])
            })
            .collect();

        let secrets = inventory
            .secrets
            .iter()
            .filter(|secret| include_disabled || secret.enabled)
            .map(|secret| {
                Row::new(vec![
                    secret.vault_name.clone(),
                    secret.name.clone(),
                    secret.version_label().to_string(),
                ])
                .with_key(secret.identifier.clone())
            })
            .collect();

        Self {
            vaults: Dataset::new(VAULT_COLUMNS, vaults),
            secrets: Dataset::new(SECRET_COLUMNS, secrets),
        }
    }

    pub const fn dataset(&self, view: ViewSelector) -> &Dataset {
        match view {
            ViewSelector::Vaults => &self.vaults,
            ViewSelector::Secrets => &self.secrets,
        }
    }

    pub const fn dataset_mut(&mut self, view: ViewSelector) -> &mut Dataset {
        match view {
            ViewSelector::Vaults => &mut self.vaults,
            ViewSelector::Secrets => &mut self.secrets,
        }
    }
}
