use std::sync::LazyLock;

use prometheus::{Encoder, IntCounterVec, Opts, TextEncoder};
use tracing::error;

static CHAT_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec(
        "chat_requests_total",
        "Chat requests answered, by classified intent",
        "intent",
    )
});

static QA_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec(
        "qa_requests_total",
        "Workspace Q&A requests, by outcome",
        "outcome",
    )
});

fn counter_vec(name: &str, help: &str, label: &str) -> IntCounterVec {
    // Name and label are compile-time constants, so construction cannot fail.
    let counter = IntCounterVec::new(Opts::new(name, help), &[label])
        .expect("metric definition is valid");
    if let Err(e) = prometheus::register(Box::new(counter.clone())) {
        error!("could not register metric {}: {}", name, e);
    }
    counter
}

pub fn record_chat(intent: &str) {
    CHAT_REQUESTS.with_label_values(&[intent]).inc();
}

pub fn record_qa(answered: bool) {
    let outcome = if answered { "answered" } else { "not_found" };
    QA_REQUESTS.with_label_values(&[outcome]).inc();
}

/// Default registry in the Prometheus text exposition format.
pub fn encode() -> (Vec<u8>, String) {
    // Touch the counters so they are registered even before the first request.
    LazyLock::force(&CHAT_REQUESTS);
    LazyLock::force(&QA_REQUESTS);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!("could not encode metrics: {}", e);
    }
    (buffer, encoder.format_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        record_chat("largest");
        record_qa(false);
        let (body, content_type) = encode();
        let text = String::from_utf8(body).unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(text.contains("chat_requests_total{intent=\"largest\"}"));
        assert!(text.contains("qa_requests_total{outcome=\"not_found\"}"));
    }
}
