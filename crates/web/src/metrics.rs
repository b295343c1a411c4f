use std::time::Duration;

/// Per-command telemetry sink. Implementations must be cheap; recording is
/// already off the response path by the time this is called.
pub trait Metrics: Send + Sync {
    fn record(&self, command: &'static str, duration: Duration, success: bool);
}

/// Discards all recordings.
#[allow(dead_code)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn record(&self, _command: &'static str, _duration: Duration, _success: bool) {}
}

/// Forwards to the `metrics` facade; whatever recorder is installed (the
/// Prometheus exporter started in main) receives the series.
pub struct FacadeMetrics;

impl Metrics for FacadeMetrics {
    fn record(&self, command: &'static str, duration: Duration, success: bool) {
        let status = if success { "ok" } else { "error" };
        metrics::counter!("event_command_total", "command" => command, "status" => status)
            .increment(1);
        metrics::histogram!("event_command_duration_seconds", "command" => command)
            .record(duration.as_secs_f64());
    }
}
