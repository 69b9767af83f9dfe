use crate::handlers::{about::about, authorizer::authorize, health::health};
use authex_primitives::models::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/authorizer/api/v1/admin/about", get(about))
        .route("/authorizer/api/v1/pmtol/xmlrpc", post(authorize))
        .with_state(state)
}
