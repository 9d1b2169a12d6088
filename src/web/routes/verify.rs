use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::academy::Verification;
use crate::web::{AppState, WebResult};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{cert_no}", get(verify_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/verify/{cert_no}",
    description = "Public certificate verification. Unknown numbers are reported as INVALID, not as an error",
    params(
        ("cert_no" = String, Path, description = "Certificate number, matched exactly")
    ),
    responses(
        (status = 200, description = "Verification result", body = Verification),
    ),
    tag = "verify"
)]
async fn verify_handler(
    State(state): State<AppState>,
    Path(cert_no): Path<String>,
) -> WebResult<impl IntoResponse> {
    let res = state.academy().verify(&cert_no).await;
    tracing::debug!("verification of {cert_no}: valid = {}", res.is_valid());

    Ok((StatusCode::OK, Json(res)))
}
