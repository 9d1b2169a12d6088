use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use crate::academy::quiz::unanswered;
use crate::model::ResourceType;
use crate::web::{
    AppState, RequestContext, WebError, WebResult,
    dto::quiz::{QuizResponse, QuizResultResponse, QuizSubmitRequest},
    error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{course_id}", get(quiz_get_handler))
        .route("/{course_id}/submit", post(quiz_submit_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/quiz/{course_id}",
    description = "Quiz questions in random order, without answers. `locked` is set until every lesson is done",
    params(
        ("course_id" = String, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Quiz found", body = QuizResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    ),
    tag = "quiz",
    security(
        ("cookie" = [])
    )
)]
async fn quiz_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let academy = state.academy();
    let quiz = academy.quiz(user.user_id(), &course_id).await?;

    Ok((
        StatusCode::OK,
        Json(QuizResponse::new(quiz, academy.passing_score())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz/{course_id}/submit",
    description = "Score a quiz submission. Every question must be answered. A certificate is issued when the user becomes eligible",
    params(
        ("course_id" = String, Path, description = "ID of the course")
    ),
    request_body = QuizSubmitRequest,
    responses(
        (status = 200, description = "Attempt recorded", body = QuizResultResponse),
        (status = 400, description = "Some questions are unanswered", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Quiz is locked or has no questions", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quiz",
    security(
        ("cookie" = [])
    )
)]
async fn quiz_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(payload): Json<QuizSubmitRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let academy = state.academy();
    let course = academy.course(&course_id)?;

    let missing = unanswered(course.questions(), &payload.answers);
    if !missing.is_empty() {
        return Err(WebError::resource_bad_request(
            ResourceType::Quiz,
            format!("unanswered questions: {}", missing.join(", ")),
        ));
    }

    let outcome = academy
        .submit_quiz(&user.to_user(), &course_id, &payload.answers, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(QuizResultResponse::from(outcome))))
}
