use crate::config::Config;
use crate::types::track::TrackSource;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Uploaded tracks keyed by id. Only raw points are kept; every derived
/// series is rebuilt on read.
#[derive(Clone)]
pub struct AppState {
    cache: Arc<DashMap<String, CachedTrack>>,
    config: Arc<Config>,
}

struct CachedTrack {
    source: TrackSource,
    inserted_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn insert(&self, track_id: String, source: TrackSource) {
        self.cache.insert(
            track_id,
            CachedTrack {
                source,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, track_id: &str) -> Option<TrackSource> {
        self.cache.get(track_id).map(|entry| entry.source.clone())
    }

    /// Replaces the raw points of an existing track. Returns false if the id is unknown.
    pub fn replace(&self, track_id: &str, source: TrackSource) -> bool {
        match self.cache.get_mut(track_id) {
            Some(mut entry) => {
                entry.source = source;
                entry.inserted_at = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.cache.retain(|_, cached| {
            now.duration_since(cached.inserted_at) < ttl
        });
        tracing::info!("Cache eviction complete. Current size: {}", self.cache.len());
    }
}
