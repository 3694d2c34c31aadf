use std::time::Duration;

use crate::types::replay::{ReplaySettings, VizMode};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    pub cache_ttl: Duration,
    /// Settings applied when a request does not override them.
    pub replay_defaults: ReplaySettings,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_or("PORT", 3000);
        let max_file_size_mb: usize = env_or("MAX_FILE_SIZE_MB", 25);
        let cache_ttl_seconds = env_or("CACHE_TTL_SECONDS", 3600);

        let defaults = ReplaySettings::default();
        let replay_defaults = ReplaySettings {
            remove_stops: env_or("REMOVE_STOPS", defaults.remove_stops),
            mark_long_pauses: env_or("MARK_LONG_PAUSES", defaults.mark_long_pauses),
            pause_threshold_secs: env_or::<f64>("PAUSE_THRESHOLD_SECONDS", defaults.pause_threshold_secs)
                .max(1.0),
            desired_duration_secs: env_or("REPLAY_DURATION_SECONDS", defaults.desired_duration_secs),
            mode: std::env::var("REPLAY_MODE")
                .ok()
                .and_then(|s| VizMode::from_str(&s))
                .unwrap_or(defaults.mode),
            ..defaults
        };

        Self {
            port,
            max_file_size: max_file_size_mb * 1024 * 1024,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
            replay_defaults,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
