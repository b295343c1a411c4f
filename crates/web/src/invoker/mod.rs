//! Command dispatch pipeline. A [`Command`] is a stateless value object
//! wrapping one business operation; an [`Invoker`] chain decorates its
//! execution with logging, transport fault mapping, metrics and caching.
//! Each layer owns the next, so chains are composed at construction time.

mod cache;
mod log;
mod metric;
mod transport;

pub use cache::CacheInvoker;
pub use log::LogInvoker;
pub use metric::MetricInvoker;
pub use transport::TransportInvoker;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use storage::error::StorageError;
use thiserror::Error;

/// One business operation, constructed from a service handle and an
/// immutable request. Expected business outcomes (validation failures,
/// not-found, conflicts) are encoded in the response value; `Err` is
/// reserved for infrastructure failures.
#[async_trait]
pub trait Command: Send + Sync {
    /// Stable name used for logs, metrics and cache keys.
    const NAME: &'static str;

    type Request: Serialize + Send + Sync;
    type Response: Serialize + DeserializeOwned + Send;

    fn request(&self) -> &Self::Request;

    async fn execute(&self) -> Result<Self::Response, StorageError>;
}

/// Infrastructure-level failure, distinct from any business error enum.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("command timed out")]
    Timeout,
}

#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke<C: Command>(&self, command: &C) -> Result<C::Response, Fault>;
}

/// Executes the command directly; the innermost link of every chain.
pub struct BasicInvoker;

#[async_trait]
impl Invoker for BasicInvoker {
    async fn invoke<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        Ok(command.execute().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde::{Deserialize, Serialize};
    use tokio::sync::mpsc;

    use super::*;
    use crate::cache::MokaCacher;
    use crate::metrics::Metrics;

    #[derive(Debug, Clone, Serialize)]
    struct TestRequest {
        value: i64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestResponse {
        value: i64,
    }

    struct EchoCommand {
        request: TestRequest,
        executions: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl EchoCommand {
        fn new(value: i64) -> Self {
            Self {
                request: TestRequest { value },
                executions: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            }
        }

        fn failing(value: i64) -> Self {
            Self {
                fail: true,
                ..Self::new(value)
            }
        }

        fn slow(value: i64, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(value)
            }
        }
    }

    #[async_trait]
    impl Command for EchoCommand {
        const NAME: &'static str = "Echo";

        type Request = TestRequest;
        type Response = TestResponse;

        fn request(&self) -> &TestRequest {
            &self.request
        }

        async fn execute(&self) -> Result<TestResponse, StorageError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(StorageError::NotFound);
            }
            Ok(TestResponse {
                value: self.request.value,
            })
        }
    }

    struct ChannelMetrics {
        tx: mpsc::UnboundedSender<(&'static str, bool)>,
    }

    impl Metrics for ChannelMetrics {
        fn record(&self, command: &'static str, _duration: Duration, success: bool) {
            let _ = self.tx.send((command, success));
        }
    }

    #[tokio::test]
    async fn basic_invoker_executes_command() {
        let command = EchoCommand::new(5);
        let response = BasicInvoker.invoke(&command).await.unwrap();
        assert_eq!(response, TestResponse { value: 5 });
        assert_eq!(command.executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_invoker_passes_through_both_outcomes() {
        let invoker = LogInvoker::new(BasicInvoker);
        let ok = invoker.invoke(&EchoCommand::new(1)).await;
        assert!(ok.is_ok());
        let err = invoker.invoke(&EchoCommand::failing(1)).await;
        assert!(matches!(err, Err(Fault::Storage(_))));
    }

    #[tokio::test]
    async fn transport_invoker_maps_storage_errors_to_faults() {
        let invoker = TransportInvoker::new(Duration::from_secs(1), BasicInvoker);
        let result = invoker.invoke(&EchoCommand::failing(1)).await;
        assert!(matches!(result, Err(Fault::Storage(_))));
    }

    #[tokio::test]
    async fn transport_invoker_times_out_slow_commands() {
        let invoker = TransportInvoker::new(Duration::from_millis(5), BasicInvoker);
        let command = EchoCommand::slow(1, Duration::from_secs(5));
        let result = invoker.invoke(&command).await;
        assert!(matches!(result, Err(Fault::Timeout)));
    }

    #[tokio::test]
    async fn metric_invoker_records_success_and_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let invoker = MetricInvoker::new(Arc::new(ChannelMetrics { tx }), BasicInvoker);

        invoker.invoke(&EchoCommand::new(1)).await.unwrap();
        assert_eq!(rx.recv().await, Some(("Echo", true)));

        let _ = invoker.invoke(&EchoCommand::failing(1)).await;
        assert_eq!(rx.recv().await, Some(("Echo", false)));
    }

    #[tokio::test]
    async fn cache_invoker_serves_repeat_reads_from_cache() {
        let cache = Arc::new(MokaCacher::new(Duration::from_secs(60), 100));
        let invoker = CacheInvoker::new(cache, BasicInvoker);
        let command = EchoCommand::new(9);

        let first = invoker.invoke(&command).await.unwrap();
        let second = invoker.invoke(&command).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(command.executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_invoker_keys_on_request_fields() {
        let cache = Arc::new(MokaCacher::new(Duration::from_secs(60), 100));
        let invoker = CacheInvoker::new(cache, BasicInvoker);

        let a = invoker.invoke(&EchoCommand::new(1)).await.unwrap();
        let b = invoker.invoke(&EchoCommand::new(2)).await.unwrap();

        assert_eq!(a, TestResponse { value: 1 });
        assert_eq!(b, TestResponse { value: 2 });
    }

    #[tokio::test]
    async fn cache_invoker_does_not_cache_faults() {
        let cache = Arc::new(MokaCacher::new(Duration::from_secs(60), 100));
        let invoker = CacheInvoker::new(cache, BasicInvoker);
        let command = EchoCommand::failing(3);

        assert!(invoker.invoke(&command).await.is_err());
        assert!(invoker.invoke(&command).await.is_err());
        assert_eq!(command.executions.load(Ordering::SeqCst), 2);
    }
}
