use std::time::Duration;

use async_trait::async_trait;

use super::{Command, Fault, Invoker};

/// Transport boundary: bounds each invocation with a timeout and is the
/// point past which only protocol-level [`Fault`]s travel, so callers can
/// always distinguish "request was invalid" (a business enum in the
/// response body) from "server is broken" (a fault).
pub struct TransportInvoker<I> {
    timeout: Duration,
    inner: I,
}

impl<I> TransportInvoker<I> {
    pub fn new(timeout: Duration, inner: I) -> Self {
        Self { timeout, inner }
    }
}

#[async_trait]
impl<I: Invoker> Invoker for TransportInvoker<I> {
    async fn invoke<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        match tokio::time::timeout(self.timeout, self.inner.invoke(command)).await {
            Ok(result) => result,
            Err(_) => Err(Fault::Timeout),
        }
    }
}
