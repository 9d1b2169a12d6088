use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use crate::academy::{Completion, eligibility::get_course_completion};
use crate::model::entity::Enrollment;
use crate::web::{
    AppState, RequestContext, WebResult,
    dto::courses::{CourseDetailResponse, CourseSummaryResponse, LessonResponse},
    error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(courses_list_handler))
        .route("/{course_id}", get(courses_get_handler))
        .route("/{course_id}/enroll", post(courses_enroll_handler))
        .route("/{course_id}/lessons/{lesson_id}", get(lessons_get_handler))
        .route(
            "/{course_id}/lessons/{lesson_id}/done",
            post(lessons_mark_done_handler),
        )
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    description = "Course catalog. Enrollment and completion are filled in for signed-in users",
    responses(
        (status = 200, description = "Catalog", body = Vec<CourseSummaryResponse>),
    ),
    tag = "courses"
)]
async fn courses_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let academy = state.academy();
    let snapshot = academy.snapshot().await;
    let user_id = ctx.maybe_user().map(|u| u.user_id()).unwrap_or_default();

    let courses: Vec<CourseSummaryResponse> = academy
        .catalog()
        .courses()
        .iter()
        .map(|c| {
            CourseSummaryResponse::new(
                c,
                snapshot.is_enrolled(user_id, c.id()),
                get_course_completion(&snapshot, user_id, c.id(), c.lessons()),
            )
        })
        .collect();

    Ok((StatusCode::OK, Json(courses)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    description = "Course with its lesson list",
    params(
        ("course_id" = String, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let academy = state.academy();
    let course = academy.course(&course_id)?;
    let snapshot = academy.snapshot().await;
    let user_id = ctx.maybe_user().map(|u| u.user_id()).unwrap_or_default();

    let summary = CourseSummaryResponse::new(
        course,
        snapshot.is_enrolled(user_id, course.id()),
        get_course_completion(&snapshot, user_id, course.id(), course.lessons()),
    );
    let res = CourseDetailResponse::new(summary, course, |l| {
        snapshot.is_lesson_done(user_id, course.id(), l.id())
    });

    Ok((StatusCode::OK, Json(res)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{course_id}/enroll",
    description = "Enroll the current user. Enrolling again keeps the original start time",
    params(
        ("course_id" = String, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Enrolled", body = Enrollment),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
async fn courses_enroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let enrollment = state
        .academy()
        .enroll(&user.to_user(), &course_id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(enrollment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/lessons/{lesson_id}",
    description = "Lesson content and whether the current user has finished it",
    params(
        ("course_id" = String, Path, description = "ID of the course"),
        ("lesson_id" = String, Path, description = "ID of the lesson within the course")
    ),
    responses(
        (status = 200, description = "Lesson found", body = LessonResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course or lesson not found", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let academy = state.academy();
    let (course, lesson) = academy.lesson(&course_id, &lesson_id)?;
    let done = academy
        .snapshot()
        .await
        .is_lesson_done(user.user_id(), course.id(), lesson.id());

    Ok((StatusCode::OK, Json(LessonResponse::new(course, lesson, done))))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{course_id}/lessons/{lesson_id}/done",
    description = "Mark lesson as done and return the updated course completion",
    params(
        ("course_id" = String, Path, description = "ID of the course"),
        ("lesson_id" = String, Path, description = "ID of the lesson to mark")
    ),
    responses(
        (status = 200, description = "Lesson marked", body = Completion),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Course or lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(
        ("cookie" = [])
    )
)]
async fn lessons_mark_done_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let completion = state
        .academy()
        .mark_lesson_done(&user.to_user(), &course_id, &lesson_id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(completion)))
}
