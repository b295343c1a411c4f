use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::{Command, Fault, Invoker};
use crate::metrics::Metrics;

/// Measures wall-clock latency and counts outcomes per command name.
/// Recording is detached so it never adds latency to the response path.
pub struct MetricInvoker<I> {
    metrics: Arc<dyn Metrics>,
    inner: I,
}

impl<I> MetricInvoker<I> {
    pub fn new(metrics: Arc<dyn Metrics>, inner: I) -> Self {
        Self { metrics, inner }
    }
}

#[async_trait]
impl<I: Invoker> Invoker for MetricInvoker<I> {
    async fn invoke<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        let start = Instant::now();
        let result = self.inner.invoke(command).await;
        let elapsed = start.elapsed();
        let success = result.is_ok();
        let name = C::NAME;
        let metrics = Arc::clone(&self.metrics);
        tokio::spawn(async move {
            metrics.record(name, elapsed, success);
        });
        result
    }
}
