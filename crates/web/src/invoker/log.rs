use async_trait::async_trait;
use uuid::Uuid;

use super::{Command, Fault, Invoker};

/// Outermost layer: tags every invocation with a correlation id and logs
/// start, success and failure with the command's name, so it observes every
/// outcome including faults produced further down the chain.
pub struct LogInvoker<I> {
    inner: I,
}

impl<I> LogInvoker<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<I: Invoker> Invoker for LogInvoker<I> {
    async fn invoke<C: Command>(&self, command: &C) -> Result<C::Response, Fault> {
        let request_id = Uuid::new_v4();
        let input = serde_json::to_string(command.request())?;
        tracing::info!(
            request_id = %request_id,
            command = C::NAME,
            input = %input,
            "command started"
        );
        match self.inner.invoke(command).await {
            Ok(response) => {
                tracing::info!(request_id = %request_id, command = C::NAME, "command executed");
                Ok(response)
            }
            Err(fault) => {
                tracing::error!(
                    request_id = %request_id,
                    command = C::NAME,
                    error = %fault,
                    "command failed"
                );
                Err(fault)
            }
        }
    }
}
