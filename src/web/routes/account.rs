use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::web::{
    AppState, RequestContext, WebResult,
    dto::account::{AccountResponse, EnrollmentResponse},
    error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/me", get(account_me_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/account/me",
    description = "Current user with their enrollments and certificates",
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
    ),
    tag = "account",
    security(
        ("cookie" = [])
    )
)]
async fn account_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let academy = state.academy();
    let snapshot = academy.snapshot().await;

    let enrollments = snapshot
        .list_enrollments(user.user_id(), academy.catalog())
        .into_iter()
        .filter_map(|(course_id, enrollment)| {
            let enrollment = enrollment?;
            let course = academy.catalog().course(course_id)?;
            Some(EnrollmentResponse {
                course_id: course_id.to_string(),
                course_title: course.title().to_string(),
                status: enrollment.status(),
                started_at: enrollment.started_at(),
            })
        })
        .collect();

    let certificates = academy.certificates_for(user.user_id()).await;
    let res = AccountResponse::new(user, enrollments, certificates);

    Ok((StatusCode::OK, Json(res)))
}
