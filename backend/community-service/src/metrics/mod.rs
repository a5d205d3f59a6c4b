//! Prometheus metrics for community-service.
//!
//! Exposes HTTP and domain-event collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use prometheus::{Encoder, TextEncoder};

pub mod http;

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Domain events (feed_created, comment_created, follow, ...)
    pub static ref COMMUNITY_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "community_events_total",
        "Community domain events segmented by event name",
        &["event"]
    )
    .expect("failed to register community_events_total");
}

pub fn record_event(event: &str) {
    COMMUNITY_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_event_increments_counter() {
        let before = COMMUNITY_EVENTS_TOTAL
            .with_label_values(&["metrics_test_event"])
            .get();
        record_event("metrics_test_event");
        assert_eq!(
            COMMUNITY_EVENTS_TOTAL
                .with_label_values(&["metrics_test_event"])
                .get(),
            before + 1
        );
    }
}
