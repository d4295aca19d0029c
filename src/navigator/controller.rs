//! Navigator state machine.
//!
//! Two axes of state: the active [`ViewSelector`] and the [`SearchMode`].
//! Key events and background messages are applied one at a time on the main
//! loop; anything slow is returned as an [`Effect::Run`] for the App to spawn.
//! Every transition ends with a cursor sync against the dataset lengths.

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::app::AppMessage;
use crate::commands::{
    ClipboardSink, Command, CopyToClipboardCmd, FetchInventoryCmd, ResolveSecretCmd,
};
use crate::config::{GlobalAction, KeyResolver, NavAction, SearchAction, TableConfig};
use crate::navigator::cache::{Resolution, SecretCache};
use crate::navigator::cursor::WindowedCursor;
use crate::navigator::filter;
use crate::navigator::model::{Column, Dataset, Row, ViewModel, ViewSelector};
use crate::provider::{Inventory, MetadataProvider, SecretResolver};

/// Backends the navigator hands to its commands.
#[derive(Clone)]
pub struct Backends {
    pub provider: Arc<dyn MetadataProvider>,
    pub resolver: Arc<dyn SecretResolver>,
    pub clipboard: Arc<dyn ClipboardSink>,
}

#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    pub window_height: usize,
    pub include_disabled: bool,
    pub concurrency: usize,
    pub initial_view: ViewSelector,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self::from(&TableConfig::default())
    }
}

impl From<&TableConfig> for NavigatorOptions {
    fn from(table: &TableConfig) -> Self {
        Self {
            window_height: table.window_height,
            include_disabled: table.include_disabled,
            concurrency: table.concurrency,
            initial_view: ViewSelector::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Idle,
    Composing { query: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub message: String,
    pub level: StatusLevel,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Info,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Error,
        }
    }
}

/// What the App should do after a transition.
pub enum Effect {
    None,
    Run(Vec<Box<dyn Command>>),
    Quit,
}

impl Effect {
    fn run(command: impl Command) -> Self {
        let command: Box<dyn Command> = Box::new(command);
        Self::Run(vec![command])
    }
}

/// Per-view cursor and filter state.
#[derive(Debug)]
struct Pane {
    cursor: WindowedCursor,
    /// Dataset as it was before the first applied filter.
    snapshot: Option<Dataset>,
    filters: Vec<String>,
}

impl Pane {
    const fn new(capacity: usize) -> Self {
        Self {
            cursor: WindowedCursor::new(capacity),
            snapshot: None,
            filters: Vec::new(),
        }
    }

    fn clear_filters(&mut self) {
        self.snapshot = None;
        self.filters.clear();
    }
}

#[derive(Debug)]
struct Panes {
    vaults: Pane,
    secrets: Pane,
}

impl Panes {
    const fn get(&self, view: ViewSelector) -> &Pane {
        match view {
            ViewSelector::Vaults => &self.vaults,
            ViewSelector::Secrets => &self.secrets,
        }
    }

    const fn get_mut(&mut self, view: ViewSelector) -> &mut Pane {
        match view {
            ViewSelector::Vaults => &mut self.vaults,
            ViewSelector::Secrets => &mut self.secrets,
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct TableFrame<'a> {
    pub view: ViewSelector,
    pub columns: &'static [Column],
    /// Only the rows inside the visible window.
    pub rows: &'a [Row],
    /// Cursor offset within `rows`.
    pub highlight: Option<usize>,
    pub cursor: usize,
    pub total: usize,
    pub status: &'a Status,
    /// The query being typed, while composing.
    pub query: Option<&'a str>,
    pub filters: &'a [String],
    pub refreshed_at: Option<DateTime<Local>>,
    pub busy: bool,
}

pub struct Navigator {
    keys: Arc<KeyResolver>,
    backends: Backends,
    cache: SecretCache,
    options: NavigatorOptions,
    model: ViewModel,
    panes: Panes,
    view: ViewSelector,
    search: SearchMode,
    status: Status,
    generation: u64,
    loading: bool,
    pending: usize,
    refreshed_at: Option<DateTime<Local>>,
}

impl Navigator {
    pub fn new(
        keys: Arc<KeyResolver>,
        backends: Backends,
        cache: SecretCache,
        options: NavigatorOptions,
    ) -> Self {
        let capacity = options.window_height;
        Self {
            keys,
            backends,
            cache,
            view: options.initial_view,
            options,
            model: ViewModel::default(),
            panes: Panes {
                vaults: Pane::new(capacity),
                secrets: Pane::new(capacity),
            },
            search: SearchMode::Idle,
            status: Status::default(),
            generation: 0,
            loading: false,
            pending: 0,
            refreshed_at: None,
        }
    }

    pub const fn view(&self) -> ViewSelector {
        self.view
    }

    pub const fn search(&self) -> &SearchMode {
        &self.search
    }

    pub const fn status(&self) -> &Status {
        &self.status
    }

    pub const fn busy(&self) -> bool {
        self.loading || self.pending > 0
    }

    pub const fn dataset(&self) -> &Dataset {
        self.model.dataset(self.view)
    }

    pub const fn cursor(&self) -> &WindowedCursor {
        &self.panes.get(self.view).cursor
    }

    pub fn filters(&self) -> &[String] {
        &self.panes.get(self.view).filters
    }

    /// Initial load.
    pub fn init(&mut self) -> Effect {
        self.refresh()
    }

    /// Start a background refresh. Results of earlier refreshes still in
    /// flight are dropped when they arrive.
    pub fn refresh(&mut self) -> Effect {
        self.generation += 1;
        self.loading = true;
        self.status = Status::info("Loading vaults…");
        info!(generation = self.generation, "Refreshing inventory");
        Effect::run(FetchInventoryCmd::new(
            Arc::clone(&self.backends.provider),
            self.options.concurrency,
            self.generation,
        ))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if self.keys.matches_global(&key, GlobalAction::ForceQuit) {
            return Effect::Quit;
        }

        let effect = if matches!(self.search, SearchMode::Composing { .. }) {
            self.handle_composing(key);
            Effect::None
        } else {
            self.handle_idle(key)
        };
        self.sync();
        effect
    }

    fn handle_idle(&mut self, key: KeyEvent) -> Effect {
        let keys = Arc::clone(&self.keys);
        let len = self.dataset().len();

        if keys.matches_global(&key, GlobalAction::Quit) {
            return Effect::Quit;
        }
        if keys.matches_global(&key, GlobalAction::Refresh) {
            return self.refresh();
        }
        if keys.matches_global(&key, GlobalAction::ToggleView) {
            self.view = self.view.toggled();
            debug!(view = %self.view, "Switched view");
            return Effect::None;
        }
        if keys.matches_search(&key, SearchAction::Start) {
            self.search = SearchMode::Composing {
                query: String::new(),
            };
            return Effect::None;
        }
        if keys.matches_search(&key, SearchAction::ClearFilter) {
            self.clear_filter();
            return Effect::None;
        }

        let cursor = &mut self.panes.get_mut(self.view).cursor;
        if keys.matches_nav(&key, NavAction::Up) {
            cursor.move_by(-1, len);
        } else if keys.matches_nav(&key, NavAction::Down) {
            cursor.move_by(1, len);
        } else if keys.matches_nav(&key, NavAction::Home) {
            cursor.move_to(0, len);
        } else if keys.matches_nav(&key, NavAction::End) {
            cursor.move_to(len.saturating_sub(1), len);
        } else if keys.matches_nav(&key, NavAction::Select) {
            return self.select();
        }
        Effect::None
    }

    fn handle_composing(&mut self, key: KeyEvent) {
        if self.keys.matches_search(&key, SearchAction::Cancel) {
            self.search = SearchMode::Idle;
            return;
        }
        let submit = self.keys.matches_search(&key, SearchAction::Submit);

        let SearchMode::Composing { query } = &mut self.search else {
            return;
        };

        if submit {
            let query = std::mem::take(query);
            self.search = SearchMode::Idle;
            self.apply_filter(&query);
            return;
        }

        match key.code {
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                query.push(c);
            }
            _ => {}
        }
    }

    /// Filter the active dataset in place. Filters stack: each one narrows
    /// the result of the previous. A blank query changes nothing.
    fn apply_filter(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let view = self.view;
        let dataset = self.model.dataset_mut(view);
        let filtered = filter::filter(query, dataset);
        debug!(%view, query, before = dataset.len(), after = filtered.len(), "Applied filter");

        let pane = self.panes.get_mut(view);
        let previous = std::mem::replace(dataset, filtered);
        pane.snapshot.get_or_insert(previous);
        pane.filters.push(query.to_string());
    }

    fn clear_filter(&mut self) {
        let view = self.view;
        let pane = self.panes.get_mut(view);
        if let Some(snapshot) = pane.snapshot.take() {
            pane.filters.clear();
            *self.model.dataset_mut(view) = snapshot;
            self.status = Status::info("Filter cleared");
        }
    }

    fn select(&mut self) -> Effect {
        if self.view != ViewSelector::Secrets {
            return Effect::None;
        }

        let index = self.cursor().cursor();
        let Some(identifier) = self.dataset().row(index).and_then(Row::key) else {
            return Effect::None;
        };
        let identifier = identifier.to_string();
        let label = self
            .cache
            .get(&identifier)
            .map_or_else(|| identifier.clone(), |record| record.to_string());

        self.status = Status::info(format!("Copying {label}…"));
        self.pending += 1;
        Effect::run(ResolveSecretCmd::new(
            self.cache.clone(),
            Arc::clone(&self.backends.resolver),
            identifier,
            label,
        ))
    }

    /// Apply the result of a background command.
    pub fn apply(&mut self, message: AppMessage) -> Effect {
        let effect = match message {
            AppMessage::InventoryLoaded {
                generation,
                inventory,
            } => {
                if generation == self.generation {
                    self.loading = false;
                    self.apply_inventory(&inventory);
                } else {
                    debug!(generation, latest = self.generation, "Dropping stale inventory");
                }
                Effect::None
            }
            AppMessage::InventoryFailed { generation, error } => {
                if generation == self.generation {
                    self.loading = false;
                    warn!(%error, "Refresh failed");
                    self.status = Status::error(format!("Refresh failed: {error}"));
                }
                Effect::None
            }
            AppMessage::SecretResolved(resolution) => {
                self.pending = self.pending.saturating_sub(1);
                self.apply_resolution(resolution)
            }
            AppMessage::Copied { label } => {
                self.pending = self.pending.saturating_sub(1);
                self.status = Status::info(format!("Copied {label} to clipboard"));
                Effect::None
            }
            AppMessage::CopyFailed { label, error } => {
                self.pending = self.pending.saturating_sub(1);
                warn!(%label, %error, "Clipboard write failed");
                self.status = Status::error(format!("Could not copy {label}: {error}"));
                Effect::None
            }
        };
        self.sync();
        effect
    }

    fn apply_resolution(&mut self, resolution: Resolution) -> Effect {
        debug!(found = resolution.found(), "Secret resolution finished");
        match &resolution {
            Resolution::Resolved(record) => {
                self.pending += 1;
                Effect::run(CopyToClipboardCmd::new(
                    Arc::clone(&self.backends.clipboard),
                    resolution.value(),
                    record.to_string(),
                ))
            }
            Resolution::Failed { record, reason } => {
                self.status = Status::error(format!("Failed to resolve {record}: {reason}"));
                Effect::None
            }
            Resolution::NotFound { identifier } => {
                debug!(%identifier, "Selected secret is not cached");
                self.status = Status::info("No secret value found");
                Effect::None
            }
        }
    }

    /// Rebuild both datasets and the cache. Cursors survive while still in
    /// range; applied filters are dropped.
    fn apply_inventory(&mut self, inventory: &Inventory) {
        self.model = ViewModel::from_inventory(inventory, self.options.include_disabled);
        self.cache.replace_all(inventory.secrets.iter().cloned());
        debug!(cached = self.cache.len(), "Secret cache rebuilt");
        self.panes.vaults.clear_filters();
        self.panes.secrets.clear_filters();
        self.refreshed_at = Some(Local::now());

        let message = format!(
            "Loaded {} vaults, {} secrets",
            self.model.vaults.len(),
            self.model.secrets.len()
        );
        self.status = if inventory.skipped.is_empty() {
            Status::info(message)
        } else {
            Status::info(format!(
                "{message} ({} vaults skipped)",
                inventory.skipped.len()
            ))
        };
    }

    /// A cursor left past the end of its dataset (after a refresh or a
    /// filter shrank it) goes back to the top; otherwise it stays put.
    fn sync(&mut self) {
        Self::sync_pane(&mut self.panes.vaults, self.model.vaults.len());
        Self::sync_pane(&mut self.panes.secrets, self.model.secrets.len());
    }

    fn sync_pane(pane: &mut Pane, len: usize) {
        if pane.cursor.cursor() >= len {
            pane.cursor.reset();
        }
        pane.cursor.sync(len);
    }

    pub fn frame(&self) -> TableFrame<'_> {
        let dataset = self.dataset();
        let pane = self.panes.get(self.view);
        let rows = dataset.rows().get(pane.cursor.window()).unwrap_or_default();

        TableFrame {
            view: self.view,
            columns: dataset.columns(),
            rows,
            highlight: pane.cursor.highlight(),
            cursor: pane.cursor.cursor(),
            total: dataset.len(),
            status: &self.status,
            query: match &self.search {
                SearchMode::Composing { query } => Some(query.as_str()),
                SearchMode::Idle => None,
            },
            filters: &pane.filters,
            refreshed_at: self.refreshed_at,
            busy: self.busy(),
        }
    }
}
