use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};

use crate::academy::AcademyStats;
use crate::model::{Page, entity::Certificate};
use crate::web::{
    AppState, RequestContext, WebResult, error::ErrorResponse, middlewares,
    routes::PaginationQuery,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/stats", get(admin_stats_handler))
        .route("/certificates", get(admin_certificates_handler))
        .route("/reset", post(admin_reset_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    description = "Catalog size, learner count and issued certificates",
    responses(
        (status = 200, description = "Statistics", body = AcademyStats),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("cookie" = [])
    )
)]
async fn admin_stats_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    ctx.admin()?;
    let stats = state.academy().stats().await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/certificates",
    description = "All issued certificates, ordered by certificate number",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = Page<Certificate>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("cookie" = [])
    )
)]
async fn admin_certificates_handler(
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    ctx.admin()?;
    let certs = state
        .academy()
        .all_certificates(page.limit(), page.offset())
        .await;

    Ok((StatusCode::OK, Json(certs)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/reset",
    description = "Wipe all progress and certificates. Certificate numbers are not reused afterwards",
    responses(
        (status = 200, description = "Progress reset"),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "You're not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("cookie" = [])
    )
)]
async fn admin_reset_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin()?;
    tracing::warn!("progress reset requested by {}", admin.user_id());
    state.academy().reset().await?;

    Ok(StatusCode::OK)
}
