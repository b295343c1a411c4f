use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

/// Key-value cache contract expected by the cache invoker. Writes are
/// last-writer-wins and expire after the implementation's TTL.
#[async_trait]
pub trait Cacher: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn add(&self, key: String, value: String);
}

/// In-process TTL cache backing the read-path invoker chain.
pub struct MokaCacher {
    cache: Cache<String, String>,
}

impl MokaCacher {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl Cacher for MokaCacher {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await
    }

    async fn add(&self, key: String, value: String) {
        self.cache.insert(key, value).await;
    }
}
