use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::academy::CourseProgress;
use crate::web::{AppState, RequestContext, WebResult, error::ErrorResponse, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{course_id}", get(progress_get_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/progress/{course_id}",
    description = "Current user's completion, last quiz attempt and certificate eligibility for a course",
    params(
        ("course_id" = String, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Progress found", body = CourseProgress),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
async fn progress_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let res = state
        .academy()
        .course_progress(user.user_id(), &course_id)
        .await?;

    Ok((StatusCode::OK, Json(res)))
}
