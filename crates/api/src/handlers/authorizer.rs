use authex_core::protocol::envelope::Envelope;
use authex_core::protocol::response::{
    render_single_int, DO_NOT_HONOR_BODY, INCORRECT_PIN_BODY, RESPONSE_CONTENT_TYPE,
    RESPONSE_USER_AGENT, ZERO_BALANCE_BODY,
};
use authex_core::services::{DeductService, LoadService, StopService};
use authex_primitives::models::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use http::{header, StatusCode};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Bodies shorter than this cannot hold a methodCall envelope.
const REQUEST_BODY_MINIMUM_LENGTH: usize = 50;

/// XML-RPC dispatcher. Protocol failure is always expressed inside the XML
/// body; the HTTP status is 200 no matter what.
pub async fn authorize(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let headers = [
        (header::CONTENT_TYPE, RESPONSE_CONTENT_TYPE),
        (header::USER_AGENT, RESPONSE_USER_AGENT),
    ];

    if body.len() < REQUEST_BODY_MINIMUM_LENGTH {
        error!("invalid request body content");
        return (StatusCode::OK, headers, DO_NOT_HONOR_BODY.to_string());
    }

    debug!(body = %String::from_utf8_lossy(&body), "authorizer request");

    let envelope = match Envelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "parsing body error");
            return (StatusCode::OK, headers, DO_NOT_HONOR_BODY.to_string());
        }
    };

    let result = match envelope.method_name.as_str() {
        "Deduct" => DeductService::deduct(&state, &envelope),
        "DeductReversal" => DeductService::reversal(&state, &envelope),
        "DeductAdjustment" => DeductService::adjustment(&state, &envelope),
        "LoadAuth" => LoadService::auth(&state, &envelope),
        "LoadAdjustment" => LoadService::adjustment(&state, &envelope),
        "LoadReversal" => LoadService::reversal(&state, &envelope),
        "LoadAuthReversal" => LoadService::auth_reversal(&state, &envelope),
        "Stop" => StopService::stop(&state, &envelope),
        "Balance" => {
            info!(method = "Balance", "fixed response");
            return (StatusCode::OK, headers, ZERO_BALANCE_BODY.to_string());
        }
        "ValidatePIN" => {
            info!(method = "ValidatePIN", "fixed response");
            return (StatusCode::OK, headers, INCORRECT_PIN_BODY.to_string());
        }
        "AdministrativeMessage" => {
            info!(method = "AdministrativeMessage", "fixed response");
            return (StatusCode::OK, headers, DO_NOT_HONOR_BODY.to_string());
        }
        other => {
            error!(method = %other, "unknown method");
            return (StatusCode::OK, headers, DO_NOT_HONOR_BODY.to_string());
        }
    };

    let response = match result {
        Ok(code) => render_single_int(code),
        Err(e) => {
            error!(method = %envelope.method_name, error = %e, "handler error");
            DO_NOT_HONOR_BODY.to_string()
        }
    };

    debug!(response = %response, "authorizer response");
    (StatusCode::OK, headers, response)
}
