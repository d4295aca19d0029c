//! In-memory backends for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::commands::ClipboardSink;
use crate::navigator::cache::SecretRecord;
use crate::provider::{
    ContainerInfo, Inventory, MetadataProvider, ProviderError, SecretResolver, SecretSummary,
};

pub fn container(name: &str, region: &str) -> ContainerInfo {
    ContainerInfo {
        name: name.to_string(),
        region: region.to_string(),
        resource_group: format!("rg-{name}"),
        subscription: "00000000-0000-0000-0000-000000000000".to_string(),
        url: format!("https://{name}.vault.azure.net"),
    }
}

pub fn summary(name: &str, enabled: bool) -> SecretSummary {
    SecretSummary {
        name: name.to_string(),
        version: String::new(),
        enabled,
    }
}

/// Two vaults, four secrets, one of them disabled (`legacy-token`).
pub fn inventory() -> Inventory {
    let prod = container("kv-prod", "westeurope");
    let dev = container("kv-dev", "northeurope");
    let secrets = vec![
        SecretRecord::new(&prod.name, &prod.url, "db-password", "", true),
        SecretRecord::new(&prod.name, &prod.url, "api-key", "", true),
        SecretRecord::new(&prod.name, &prod.url, "legacy-token", "", false),
        SecretRecord::new(&dev.name, &dev.url, "db-password", "", true),
    ];
    Inventory {
        containers: vec![prod, dev],
        secrets,
        skipped: Vec::new(),
    }
}

/// An inventory with `count` enabled secrets in a single vault.
pub fn large_inventory(count: usize) -> Inventory {
    let vault = container("kv-bulk", "westeurope");
    let secrets = (0..count)
        .map(|i| SecretRecord::new(&vault.name, &vault.url, format!("secret-{i:03}"), "", true))
        .collect();
    Inventory {
        containers: vec![vault],
        secrets,
        skipped: Vec::new(),
    }
}

#[derive(Default)]
pub struct FakeProvider {
    containers: Vec<ContainerInfo>,
    secrets: HashMap<String, Vec<SecretSummary>>,
    denied: HashSet<String>,
    fail_containers: bool,
}

impl FakeProvider {
    pub fn sample() -> Self {
        let mut secrets = HashMap::new();
        secrets.insert(
            "kv-prod".to_string(),
            vec![
                summary("db-password", true),
                summary("api-key", true),
                summary("legacy-token", false),
            ],
        );
        secrets.insert("kv-dev".to_string(), vec![summary("db-password", true)]);
        Self {
            containers: vec![
                container("kv-prod", "westeurope"),
                container("kv-dev", "northeurope"),
                container("kv-locked", "eastus"),
            ],
            secrets,
            denied: HashSet::from(["kv-locked".to_string()]),
            fail_containers: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_containers: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, ProviderError> {
        if self.fail_containers {
            return Err(ProviderError::NotAuthenticated);
        }
        Ok(self.containers.clone())
    }

    async fn list_secrets(
        &self,
        container: &ContainerInfo,
    ) -> Result<Vec<SecretSummary>, ProviderError> {
        if self.denied.contains(&container.name) {
            return Err(ProviderError::PermissionDenied("Forbidden".to_string()));
        }
        Ok(self.secrets.get(&container.name).cloned().unwrap_or_default())
    }
}

/// Resolves secrets by name and counts backend calls.
///
/// Scripted responses are handed out one per call, in call order, before
/// falling back to the per-name values.
#[derive(Clone, Default)]
pub struct FakeResolver {
    values: HashMap<String, String>,
    delay: Option<Duration>,
    script: Arc<Mutex<VecDeque<(String, Duration)>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeResolver {
    #[must_use]
    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response for the next unscripted call, returned after `delay`.
    #[must_use]
    pub fn with_response(self, value: &str, delay: Duration) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back((value.to_string(), delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretResolver for FakeResolver {
    async fn resolve(
        &self,
        _container_url: &str,
        name: &str,
        _version: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some((value, delay)) = scripted {
            tokio::time::sleep(delay).await;
            return Ok(value);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::Cli(format!("SecretNotFound: {name}")))
    }
}

/// Records every write instead of touching the system clipboard.
#[derive(Clone, Default)]
pub struct FakeClipboard {
    writes: Arc<Mutex<Vec<String>>>,
    broken: bool,
}

impl FakeClipboard {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ClipboardSink for FakeClipboard {
    fn write(&self, text: &str) -> color_eyre::Result<()> {
        if self.broken {
            return Err(color_eyre::eyre::eyre!("clipboard unavailable"));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}
