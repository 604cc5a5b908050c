//! Registry request metrics, recorded through the `metrics` facade.
//! Nothing is exported unless the host installs a recorder.

use crate::types::Registry;

pub struct RegistryMetrics;

impl RegistryMetrics {
    pub fn record_request_success(registry: Registry, duration_secs: f64, records: usize) {
        ::metrics::counter!("award_finder_requests_success_total", "registry" => registry.label())
            .increment(1);
        ::metrics::histogram!("award_finder_request_duration_seconds", "registry" => registry.label())
            .record(duration_secs);
        ::metrics::histogram!("award_finder_records_returned", "registry" => registry.label())
            .record(records as f64);
    }

    /// `kind` is one of `transport`, `http` or `parse`
    pub fn record_request_error(registry: Registry, kind: &'static str) {
        ::metrics::counter!(
            "award_finder_requests_error_total",
            "registry" => registry.label(),
            "kind" => kind
        )
        .increment(1);
    }

    pub fn record_duplicates_dropped(count: usize) {
        ::metrics::counter!("award_finder_duplicates_dropped_total").increment(count as u64);
    }
}
