use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Gauge, HistogramVec,
};

lazy_static! {
    // ── Upstream backend calls ──────────────────────────────────────────────
    pub static ref BACKEND_REQUESTS_COUNTER: CounterVec = register_counter_vec!(
        "gateway_backend_requests_total",
        "Appels au backend par endpoint et résultat",
        &["endpoint", "outcome"]
    ).unwrap();

    pub static ref BACKEND_LATENCY: HistogramVec = register_histogram_vec!(
        "gateway_backend_request_seconds",
        "Durée des appels au backend par endpoint",
        &["endpoint"]
    ).unwrap();

    // ── Menu drafts ─────────────────────────────────────────────────────────
    pub static ref DRAFT_OPERATIONS_COUNTER: CounterVec = register_counter_vec!(
        "gateway_menu_draft_operations_total",
        "Opérations sur les brouillons de menu par type et résultat",
        &["operation", "result"]
    ).unwrap();

    pub static ref DRAFTS_GAUGE: Gauge = register_gauge!(
        "gateway_menu_drafts_open",
        "Brouillons de menu ouverts"
    ).unwrap();
}

pub fn record_backend_call(endpoint: &str, outcome: &str, seconds: f64) {
    BACKEND_REQUESTS_COUNTER
        .with_label_values(&[endpoint, outcome])
        .inc();
    BACKEND_LATENCY.with_label_values(&[endpoint]).observe(seconds);
}

pub fn record_draft_operation(operation: &str, result: &str) {
    DRAFT_OPERATIONS_COUNTER
        .with_label_values(&[operation, result])
        .inc();
}
