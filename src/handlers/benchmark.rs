use std::hint::black_box;

use axum::{http::StatusCode, Json};
use chrono::Utc;
use serde_json::json;

use crate::metrics::timed;

// ── GET/POST /benchmark ───────────────────────────────────────────────────────

/// Fixed pure computation for comparing plugin runtimes: Σ i² for
/// i in 0..1000 (= 332 833 500). `black_box` keeps the compiler from
/// folding the loop into a constant.
pub async fn run() -> (StatusCode, Json<serde_json::Value>) {
    let (result, elapsed) = timed(|| black_box((0..1_000u64).map(|i| i * i).sum::<u64>()));

    let ms = elapsed.as_secs_f64() * 1000.0;
    (
        StatusCode::OK,
        Json(json!({
            "benchmark_result": result,
            "processing_time_ms": (ms * 1000.0).round() / 1000.0,
            "timestamp": Utc::now().to_rfc3339(),
            "computation": "sum of squares for i in 0..1000",
        })),
    )
}
