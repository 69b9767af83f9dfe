use authex_primitives::codes::{APP_NAME, SERVICE_NAME};
use axum::Json;
use serde_json::{json, Value};

/// Service identification for operators.
pub async fn about() -> Json<Value> {
    Json(json!({
        "service-name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "appname": APP_NAME,
    }))
}
