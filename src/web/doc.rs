use utoipa::{Modify, OpenApi};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

use crate::web::middlewares::AUTH_TOKEN;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme("cookie", SecurityScheme::ApiKey(
                    ApiKey::Cookie(ApiKeyValue::with_description(AUTH_TOKEN, "Identity token of the current user"))
            ));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::account_me_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_enroll_handler,
        crate::web::routes::courses::lessons_get_handler,
        crate::web::routes::courses::lessons_mark_done_handler,
        crate::web::routes::progress::progress_get_handler,
        crate::web::routes::quiz::quiz_get_handler,
        crate::web::routes::quiz::quiz_submit_handler,
        crate::web::routes::certificates::certificates_list_handler,
        crate::web::routes::certificates::certificates_get_handler,
        crate::web::routes::verify::verify_handler,
        crate::web::routes::admin::admin_stats_handler,
        crate::web::routes::admin::admin_certificates_handler,
        crate::web::routes::admin::admin_reset_handler,
    ),
    modifiers(&CookieAuthModifier),
    tags(
        (name = "account", description = "Current user"),
        (name = "courses", description = "Course catalog and enrollment"),
        (name = "lessons", description = "Lesson content and completion"),
        (name = "progress", description = "Completion and certificate eligibility"),
        (name = "quiz", description = "Course quizzes"),
        (name = "certificates", description = "Issued certificates"),
        (name = "verify", description = "Public certificate verification"),
        (name = "admin", description = "Administration"),
    )
)]
pub struct ApiDoc;
