//! Time boxed cache of the widget configuration.
use crate::{
    error::StorageError,
    model::{CachedConfig, ChatbotConfig},
    storage::{KeyValueStore, StoreRead, read_json, write_json},
};

pub const CONFIG_CACHE_KEY: &str = "askmysite_config";

/// Cached configs older than this are ignored.
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

impl CachedConfig {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis.saturating_sub(self.timestamp) > CACHE_TTL_MS
    }
}

/// Reads the cached config. An expired entry reads as absent but is left in
/// place.
pub fn read_cached_config(store: &dyn KeyValueStore, now_millis: i64) -> StoreRead<ChatbotConfig> {
    match read_json::<CachedConfig>(store, CONFIG_CACHE_KEY) {
        StoreRead::Present(cached) if cached.is_expired(now_millis) => StoreRead::Absent,
        StoreRead::Present(cached) => StoreRead::Present(cached.data),
        StoreRead::Absent => StoreRead::Absent,
        StoreRead::Failed(reason) => StoreRead::Failed(reason),
    }
}

pub fn write_cached_config(
    store: &dyn KeyValueStore,
    config: &ChatbotConfig,
    now_millis: i64,
) -> Result<(), StorageError> {
    let cached = CachedConfig {
        data: config.clone(),
        timestamp: now_millis,
    };
    write_json(store, CONFIG_CACHE_KEY, &cached)
}
