//! Short-lived read-through cache for backend payloads
//!
//! Entries are keyed by endpoint plus query string and carry their own
//! expiry. Transaction queries use `transactions_ttl`; accounts, monthly
//! spend, and budget status use `aggregates_ttl`. Only successful payloads
//! are stored. The cache is owned by a `Dashboard` and never reaches the
//! metrics engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::api::Endpoint;
use crate::config::CacheConfig;

/// Identity of a logical query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub endpoint: Endpoint,
    /// URL-style `k=v&k=v`, in the order the parameters were given
    pub params: String,
}

impl QueryKey {
    pub fn new(endpoint: Endpoint, params: &[(&str, String)]) -> Self {
        let params = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        Self { endpoint, params }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.endpoint)
        } else {
            write!(f, "{}?{}", self.endpoint, self.params)
        }
    }
}

struct CacheEntry {
    rows: Arc<Vec<Value>>,
    expires_at: Instant,
}

pub struct QueryCache {
    config: CacheConfig,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// How long a payload from `endpoint` stays fresh
    pub fn ttl_for(&self, endpoint: Endpoint) -> Duration {
        match endpoint {
            Endpoint::Transactions => self.config.transactions_ttl,
            Endpoint::Accounts | Endpoint::SpendMonthly | Endpoint::BudgetStatus => {
                self.config.aggregates_ttl
            }
        }
    }

    /// Fresh rows for `key`, dropping the entry if it has expired
    pub fn get(&self, key: &QueryKey) -> Option<Arc<Vec<Value>>> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.rows.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store rows for `key` and hand back the shared copy
    pub fn insert(&self, key: QueryKey, rows: Vec<Value>) -> Arc<Vec<Value>> {
        let rows = Arc::new(rows);
        let expires_at = Instant::now() + self.ttl_for(key.endpoint);
        self.lock().insert(
            key,
            CacheEntry {
                rows: rows.clone(),
                expires_at,
            },
        );
        rows
    }

    /// Drop every entry for one endpoint
    pub fn invalidate(&self, endpoint: Endpoint) {
        self.lock().retain(|key, _| key.endpoint != endpoint);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Each critical section is a single map operation; poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
