use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::store::StoreStats;

/// Install the Prometheus recorder as the global metrics recorder
///
/// Fails if a recorder is already installed (e.g. a second call in tests).
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "blackhole_requests_captured_total",
        "Total number of captured requests"
    );
    describe_counter!(
        "blackhole_requests_evicted_total",
        "Total number of captured requests evicted to stay within capacity"
    );
    describe_gauge!(
        "blackhole_store_retained",
        "Number of captured requests currently retained"
    );
    describe_gauge!("blackhole_store_capacity", "Configured store capacity");
    describe_gauge!("blackhole_info", "Build information");

    gauge!("blackhole_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a captured request
pub fn record_capture(method: &str) {
    counter!(
        "blackhole_requests_captured_total",
        "method" => method.to_string(),
    )
    .increment(1);
}

/// Record an eviction
pub fn record_eviction() {
    counter!("blackhole_requests_evicted_total").increment(1);
}

/// Publish the store occupancy gauges
pub fn update_store_gauges(stats: &StoreStats) {
    gauge!("blackhole_store_retained").set(stats.retained as f64);
    gauge!("blackhole_store_capacity").set(stats.capacity as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        init_metric_descriptions();

        record_capture("POST");
        record_eviction();
        update_store_gauges(&StoreStats {
            retained: 3,
            capacity: 10,
            total_captured: 4,
            total_evicted: 1,
            next_id: 4,
        });

        // No recorder installed: calls must be no-ops rather than panics
    }

    #[test]
    fn test_local_recorder_renders_capture_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_capture("GET");
            record_capture("GET");
        });

        let rendered = handle.render();
        assert!(rendered.contains("blackhole_requests_captured_total"));
        assert!(rendered.contains("method=\"GET\""));
    }
}
