//! Shared secret records and on-demand value resolution.
//!
//! The cache is a cheap-to-clone handle. The main loop replaces its
//! contents on refresh and background commands resolve values through it.
//! Records are immutable: a resolution builds a new record and swaps the
//! `Arc` in, so readers only ever see a complete record.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, warn};

use crate::provider::{ProviderError, SecretResolver};

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Metadata for one secret plus its value once resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub vault_name: String,
    pub vault_url: String,
    pub name: String,
    /// Empty means the latest version.
    pub version: String,
    pub identifier: String,
    pub enabled: bool,
    pub value: Option<String>,
}

impl SecretRecord {
    /// Build an unresolved record; the identifier is the secret's resource id.
    pub fn new(
        vault_name: impl Into<String>,
        vault_url: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        enabled: bool,
    ) -> Self {
        let vault_url = vault_url.into().trim_end_matches('/').to_string();
        let name = name.into();
        let version = version.into();
        let identifier = if version.is_empty() {
            format!("{vault_url}/secrets/{name}")
        } else {
            format!("{vault_url}/secrets/{name}/{version}")
        };
        Self {
            vault_name: vault_name.into(),
            vault_url,
            name,
            version,
            identifier,
            enabled,
            value: None,
        }
    }

    pub fn version_label(&self) -> &str {
        if self.version.is_empty() {
            "latest"
        } else {
            &self.version
        }
    }

    #[must_use]
    fn with_value(&self, value: String) -> Self {
        Self {
            value: Some(value),
            ..self.clone()
        }
    }
}

impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("vault_name", &self.vault_name)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("identifier", &self.identifier)
            .field("enabled", &self.enabled)
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vault_name, self.name)
    }
}

/// Outcome of [`SecretCache::resolve`].
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The identifier is not (or no longer) in the cache.
    NotFound { identifier: String },
    Resolved(Arc<SecretRecord>),
    /// The record exists but the backend call failed; its value is now empty.
    Failed {
        record: Arc<SecretRecord>,
        reason: String,
    },
}

impl Resolution {
    pub const fn found(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }

    /// The resolved value, empty when resolution failed or nothing was found.
    pub fn value(&self) -> &str {
        match self {
            Self::Resolved(record) => record.value.as_deref().unwrap_or_default(),
            Self::NotFound { .. } | Self::Failed { .. } => "",
        }
    }
}

#[derive(Clone)]
pub struct SecretCache {
    records: Arc<RwLock<HashMap<String, Arc<SecretRecord>>>>,
    timeout: Duration,
}

impl Default for SecretCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_TIMEOUT)
    }
}

impl SecretCache {
    pub fn new(timeout: Duration) -> Self {
        Self {
            records: Arc::default(),
            timeout,
        }
    }

    /// Discard every record and install `records` in one step.
    pub fn replace_all(&self, records: impl IntoIterator<Item = SecretRecord>) {
        let fresh: HashMap<_, _> = records
            .into_iter()
            .map(|record| (record.identifier.clone(), Arc::new(record)))
            .collect();
        debug!(count = fresh.len(), "Replacing secret cache");
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<SecretRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the value for `identifier` from the backend and store it.
    ///
    /// Unknown identifiers return [`Resolution::NotFound`] without touching
    /// the backend. The lock is not held while the backend call is in flight.
    pub async fn resolve(&self, identifier: &str, resolver: &dyn SecretResolver) -> Resolution {
        let Some(record) = self.get(identifier) else {
            debug!(identifier, "Secret not in cache");
            return Resolution::NotFound {
                identifier: identifier.to_string(),
            };
        };

        let fetched = tokio::time::timeout(
            self.timeout,
            resolver.resolve(&record.vault_url, &record.name, &record.version),
        )
        .await
        .unwrap_or(Err(ProviderError::Timeout(self.timeout)));

        match fetched {
            Ok(value) => Resolution::Resolved(self.store(&record, value)),
            Err(err) => {
                warn!(secret = %record, %err, "Failed to resolve secret");
                Resolution::Failed {
                    record: self.store(&record, String::new()),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Swap in a copy of the current record carrying `value`.
    ///
    /// If a refresh dropped the identifier meanwhile, nothing is stored and
    /// the caller still gets the value it asked for.
    fn store(&self, fetched_from: &SecretRecord, value: String) -> Arc<SecretRecord> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(&fetched_from.identifier) {
            Some(slot) => {
                let updated = Arc::new(slot.with_value(value));
                *slot = Arc::clone(&updated);
                updated
            }
            None => Arc::new(fetched_from.with_value(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fixture::FakeResolver;

    fn record(name: &str) -> SecretRecord {
        SecretRecord::new("kv-prod", "https://kv-prod.vault.azure.net/", name, "", true)
    }

    #[test]
    fn test_identifier_is_resource_id() {
        let latest = record("db-password");
        assert_eq!(
            latest.identifier,
            "https://kv-prod.vault.azure.net/secrets/db-password"
        );
        assert_eq!(latest.version_label(), "latest");

        let pinned = SecretRecord::new("kv", "https://kv.vault.azure.net", "a", "abc123", true);
        assert_eq!(pinned.identifier, "https://kv.vault.azure.net/secrets/a/abc123");
    }

    #[test]
    fn test_debug_redacts_value() {
        let resolved = record("api-key").with_value("hunter2".into());
        let printed = format!("{resolved:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let cache = SecretCache::default();
        cache.replace_all([record("a"), record("b")]);
        assert_eq!(cache.len(), 2);

        cache.replace_all([record("c")]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&record("a").identifier).is_none());
        assert!(cache.get(&record("c").identifier).is_some());
    }

    #[tokio::test]
    async fn test_unknown_identifier_skips_backend() {
        let cache = SecretCache::default();
        cache.replace_all([record("a")]);
        let resolver = FakeResolver::default();

        let resolution = cache.resolve("https://nowhere/secrets/x", &resolver).await;

        assert!(!resolution.found());
        assert_eq!(resolution.value(), "");
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_stores_value() {
        let cache = SecretCache::default();
        let secret = record("db-password");
        cache.replace_all([secret.clone()]);
        let resolver = FakeResolver::default().with_value("db-password", "s3cret");

        let resolution = cache.resolve(&secret.identifier, &resolver).await;

        assert!(resolution.found());
        assert_eq!(resolution.value(), "s3cret");
        let stored = cache.get(&secret.identifier).expect("record present");
        assert_eq!(stored.value.as_deref(), Some("s3cret"));
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_resolution_is_found_with_empty_value() {
        let cache = SecretCache::default();
        let secret = record("missing");
        cache.replace_all([secret.clone()]);
        let resolver = FakeResolver::default();

        let resolution = cache.resolve(&secret.identifier, &resolver).await;

        assert!(resolution.found());
        assert!(matches!(resolution, Resolution::Failed { .. }));
        assert_eq!(resolution.value(), "");
        let stored = cache.get(&secret.identifier).expect("record present");
        assert_eq!(stored.value.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_resolve_times_out() {
        let cache = SecretCache::new(Duration::from_millis(10));
        let secret = record("slow");
        cache.replace_all([secret.clone()]);
        let resolver = FakeResolver::default()
            .with_value("slow", "eventually")
            .with_delay(Duration::from_secs(5));

        let resolution = cache.resolve(&secret.identifier, &resolver).await;

        match resolution {
            Resolution::Failed { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_last_completed_wins() {
        let cache = SecretCache::default();
        let secret = record("api-key");
        cache.replace_all([secret.clone()]);
        // The first call is slow and finishes after the second one.
        let resolver = FakeResolver::default()
            .with_response("v1", Duration::from_millis(60))
            .with_response("v2", Duration::from_millis(10));

        let (first, second) = tokio::join!(
            cache.resolve(&secret.identifier, &resolver),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                let resolution = cache.resolve(&secret.identifier, &resolver).await;
                let stored = cache.get(&secret.identifier).expect("record present");
                assert_eq!(stored.value.as_deref(), Some("v2"));
                resolution
            },
        );

        assert_eq!(resolver.calls(), 2);
        assert_eq!(first.value(), "v1");
        assert_eq!(second.value(), "v2");

        let stored = cache.get(&secret.identifier).expect("record present");
        let expected = SecretRecord {
            value: Some("v1".to_string()),
            ..secret
        };
        assert_eq!(*stored, expected);
    }

    #[tokio::test]
    async fn test_resolution_after_refresh_drop_is_not_stored() {
        let cache = SecretCache::default();
        let secret = record("gone");
        cache.replace_all([secret.clone()]);
        let resolver = FakeResolver::default()
            .with_value("gone", "v")
            .with_delay(Duration::from_millis(20));

        let pending = cache.resolve(&secret.identifier, &resolver);
        let refresh = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            cache.replace_all([record("other")]);
        };
        let (resolution, ()) = tokio::join!(pending, refresh);

        assert_eq!(resolution.value(), "v");
        assert!(cache.get(&secret.identifier).is_none());
    }
}
