//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_crawl, record_document_load,
    record_http_request, LoadOutcomeLabel, PrometheusMetrics,
};
