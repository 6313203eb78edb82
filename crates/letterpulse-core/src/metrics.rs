//! Prometheus metrics for the tracking pipeline

use letterpulse_common::{Error, Result};
use prometheus::{IntCounterVec, Opts, Registry};

/// Tracking pipeline metrics
///
/// Holds its own registry so the server can expose it on `/metrics`
/// without any global state.
#[derive(Clone)]
pub struct TrackingMetrics {
    registry: Registry,
    events_recorded: IntCounterVec,
    events_dropped: IntCounterVec,
    tokens_rejected: IntCounterVec,
}

impl TrackingMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let events_recorded = IntCounterVec::new(
            Opts::new(
                "tracking_events_recorded_total",
                "Tracking events written to storage",
            ),
            &["event_type"],
        )
        .map_err(|e| Error::Internal(e.to_string()))?;

        let events_dropped = IntCounterVec::new(
            Opts::new(
                "tracking_events_dropped_total",
                "Best-effort tracking events lost to storage failures",
            ),
            &["event_type"],
        )
        .map_err(|e| Error::Internal(e.to_string()))?;

        let tokens_rejected = IntCounterVec::new(
            Opts::new(
                "tracking_tokens_rejected_total",
                "Tracking tokens that failed to decode",
            ),
            &["endpoint"],
        )
        .map_err(|e| Error::Internal(e.to_string()))?;

        registry
            .register(Box::new(events_recorded.clone()))
            .map_err(|e| Error::Internal(e.to_string()))?;
        registry
            .register(Box::new(events_dropped.clone()))
            .map_err(|e| Error::Internal(e.to_string()))?;
        registry
            .register(Box::new(tokens_rejected.clone()))
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            registry,
            events_recorded,
            events_dropped,
            tokens_rejected,
        })
    }

    /// Registry for the /metrics endpoint
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn event_recorded(&self, event_type: &str) {
        self.events_recorded.with_label_values(&[event_type]).inc();
    }

    pub fn event_dropped(&self, event_type: &str) {
        self.events_dropped.with_label_values(&[event_type]).inc();
    }

    pub fn token_rejected(&self, endpoint: &str) {
        self.tokens_rejected.with_label_values(&[endpoint]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_register_and_increment() {
        let metrics = TrackingMetrics::new().unwrap();
        metrics.event_recorded("open");
        metrics.event_recorded("open");
        metrics.event_dropped("click");

        let families = metrics.registry().gather();
        let recorded = families
            .iter()
            .find(|f| f.get_name() == "tracking_events_recorded_total")
            .unwrap();
        assert_eq!(recorded.get_metric()[0].get_counter().get_value(), 2.0);
    }
}
