use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Once, OnceLock};

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static LEDGER_OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Register all collectors. Safe to call more than once; later calls are no-ops.
pub fn init_metrics() {
    static INIT: Once = Once::new();
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    let registry = Registry::new();

    let requests_total = match IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!("Failed to create http_requests_total metric: {}", e);
            return;
        }
    };

    let request_duration = match HistogramVec::new(
        prometheus::HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!(
                "Failed to create http_request_duration_seconds metric: {}",
                e
            );
            return;
        }
    };

    let ledger_operations = match IntCounterVec::new(
        Opts::new(
            "ledger_operations_total",
            "Ledger operations by operation and outcome",
        ),
        &["operation", "outcome"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!("Failed to create ledger_operations_total metric: {}", e);
            return;
        }
    };

    for collector in [
        Box::new(requests_total.clone()) as Box<dyn prometheus::core::Collector>,
        Box::new(request_duration.clone()),
        Box::new(ledger_operations.clone()),
    ] {
        if let Err(e) = registry.register(collector) {
            tracing::error!("Failed to register metrics collector: {}", e);
            return;
        }
    }

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = LEDGER_OPERATIONS_TOTAL.set(ledger_operations);
}

/// Count one ledger operation; a no-op until [`init_metrics`] has run.
pub fn record_ledger_operation(operation: &str, outcome: &str) {
    if let Some(counter) = LEDGER_OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
}

pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to convert metrics to UTF-8: {}", e);
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_operations_exported() {
        init_metrics();
        init_metrics();
        record_ledger_operation("deposit", "ok");

        let text = get_metrics();
        assert!(text.contains("ledger_operations_total"));
        assert!(text.contains("operation=\"deposit\""));
    }
}
