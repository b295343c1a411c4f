use std::sync::Arc;

use async_trait::async_trait;

use super::{Command, Fault, Invoker};
use crate::cache::Cacher;

/// Read-path layer: keys on the command name plus the serialized request,
/// serves hits without executing, and writes back misses. Concurrent misses
/// for the same key race; writes are idempotent last-writer-wins. Never put
/// this around a mutating command.
pub struct CacheInvoker<I> {
    cache: Arc<dyn Cacher>,
    inner: I,
}

impl<I> CacheInvoker<I> {
    pub fn new(cache: Arc<dyn Cacher>, inner: I) -> Self {
        Self { cache, inner }
    }
}

#[async_trait]
impl<I: Invoker> Invoker for CacheInvoker<I> {
    async fn invoke<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        let key = format!("{}:{}", C::NAME, serde_json::to_string(command.request())?);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(serde_json::from_str(&cached)?);
        }
        let response = self.inner.invoke(command).await?;
        match serde_json::to_string(&response) {
            Ok(value) => self.cache.add(key, value).await,
            Err(err) => {
                tracing::warn!(command = C::NAME, error = %err, "response not cached");
            }
        }
        Ok(response)
    }
}
