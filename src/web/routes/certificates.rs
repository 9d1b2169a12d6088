use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::model::{ResourceTyped, check_access, entity::Certificate};
use crate::web::{
    AppState, RequestContext, WebError, WebResult,
    dto::certificates::CertificateRenderResponse,
    error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(certificates_list_handler))
        .route("/{cert_no}", get(certificates_get_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates",
    description = "Certificates of the current user, ordered by certificate number",
    responses(
        (status = 200, description = "Certificates", body = Vec<Certificate>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
    ),
    tag = "certificates",
    security(
        ("cookie" = [])
    )
)]
async fn certificates_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let certs = state.academy().certificates_for(user.user_id()).await;

    Ok((StatusCode::OK, Json(certs)))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{cert_no}",
    description = "Render record for the certificate PDF. Visible to its owner and to admins",
    params(
        ("cert_no" = String, Path, description = "Certificate number, e.g. EMC-2026-000001")
    ),
    responses(
        (status = 200, description = "Certificate found", body = CertificateRenderResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Certificate belongs to another user", body = ErrorResponse),
        (status = 404, description = "Certificate not found", body = ErrorResponse),
    ),
    tag = "certificates",
    security(
        ("cookie" = [])
    )
)]
async fn certificates_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(cert_no): Path<String>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let academy = state.academy();
    let cert = academy.certificate(&cert_no).await?;

    check_access(user, &cert)
        .map_err(|e| WebError::resource_access(Certificate::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(CertificateRenderResponse::new(cert, academy.public_origin())),
    ))
}
