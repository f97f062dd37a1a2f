//! Prometheus metrics for the catalog RPC surface

use actix_web::{HttpResponse, Responder};
use prometheus::{register_histogram_vec, register_int_counter_vec};
use prometheus::{Encoder, HistogramVec, IntCounterVec, TextEncoder};
use std::time::Instant;

lazy_static::lazy_static! {
    static ref GRPC_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "video_catalog_grpc_requests_total",
        "Catalog RPCs handled, by method and result code",
        &["method", "code"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref GRPC_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "video_catalog_grpc_request_duration_seconds",
        "Catalog RPC latency",
        &["method"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Times one RPC; call [`RequestTimer::finish`] with the outcome code.
pub struct RequestTimer {
    method: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn start(method: &'static str) -> Self {
        Self {
            method,
            start: Instant::now(),
        }
    }

    pub fn finish(self, code: &str) {
        GRPC_REQUEST_DURATION
            .with_label_values(&[self.method])
            .observe(self.start.elapsed().as_secs_f64());
        GRPC_REQUESTS_TOTAL
            .with_label_values(&[self.method, code])
            .inc();
    }
}

/// Handler that serialises Prometheus metrics in text format.
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}
