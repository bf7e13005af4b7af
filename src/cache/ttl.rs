use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Tuning knobs for a [`TtlCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime stamped onto every inserted entry. `None` means entries
    /// never expire by time.
    pub ttl: Option<Duration>,
    /// How often the background sweeper wakes to drop expired entries.
    pub sweep_interval: Duration,
    /// Soft capacity bound. `None` means unbounded.
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(300)),
            sweep_interval: Duration::from_secs(60),
            max_entries: Some(5000),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

type Entries<V> = Arc<RwLock<HashMap<String, Entry<V>>>>;

/// Concurrent string-keyed store with per-entry expiry and a soft capacity
/// bound.
///
/// Reads take the shared lock and check expiry lazily, so a stale entry is
/// never returned even before the sweeper has had a chance to remove it.
/// Writes take the exclusive lock; when the map is at capacity and the key
/// is new, one arbitrary resident entry is evicted first. The victim is
/// whichever key the map yields first, not the least recently used.
///
/// Construction spawns the sweeper onto the ambient Tokio runtime, so a
/// `TtlCache` must be created from within one. The sweeper keeps running
/// until the process exits; there is no stop handle.
pub struct TtlCache<V> {
    entries: Entries<V>,
    ttl: Option<Duration>,
    max_entries: Option<usize>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: CacheConfig) -> Self {
        let entries: Entries<V> = Arc::new(RwLock::new(HashMap::new()));
        tokio::spawn(Self::sweep_loop(
            Arc::clone(&entries),
            config.sweep_interval,
        ));
        Self {
            entries,
            ttl: config.ttl,
            max_entries: config.max_entries,
        }
    }

    /// Looks up `key`, treating an entry whose deadline has been reached as
    /// absent.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if let Some(expires_at) = entry.expires_at {
            if expires_at <= Instant::now() {
                return None;
            }
        }
        Some(entry.value.clone())
    }

    /// Inserts or replaces `key`, stamping it with the configured lifetime.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        let mut entries = self.entries.write().await;
        if let Some(max) = self.max_entries {
            if entries.len() >= max && !entries.contains_key(&key) {
                if let Some(victim) = entries.keys().next().cloned() {
                    entries.remove(&victim);
                }
            }
        }
        entries.insert(key, Entry { value, expires_at });
    }

    /// Number of resident entries, expired-but-unswept ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn sweep_loop(entries: Entries<V>, interval: Duration) {
        let mut tick = time::interval_at(Instant::now() + interval, interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let now = Instant::now();
            let mut entries = entries.write().await;
            let before = entries.len();
            entries.retain(|_, entry| entry.expires_at.is_none_or(|at| at > now));
            let removed = before - entries.len();
            if removed > 0 {
                debug!("Swept {} expired cache entries", removed);
            }
        }
    }
}
