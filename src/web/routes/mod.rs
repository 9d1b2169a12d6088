use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::{Router, http::StatusCode};
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod admin;
pub mod certificates;
pub mod courses;
pub mod progress;
pub mod quiz;
pub mod verify;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(0, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState, config: &Config) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/v1/account", account::routes(state.clone()))
        .nest("/api/v1/courses", courses::routes(state.clone()))
        .nest("/api/v1/progress", progress::routes(state.clone()))
        .nest("/api/v1/quiz", quiz::routes(state.clone()))
        .nest("/api/v1/certificates", certificates::routes(state.clone()))
        .nest("/api/v1/verify", verify::routes(state.clone()))
        .nest("/api/v1/admin", admin::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.app().request_timeout(),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router
            .merge(
                SwaggerUi::new("/api/v1/docs")
                    .url("/api-doc/openapi.json", openapi),
            );
    }

    router
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((query.limit(), query.offset()), (20, 0));

        let query: PaginationQuery =
            serde_json::from_str(r#"{"limit": 5000, "offset": -3}"#).unwrap();
        assert_eq!((query.limit(), query.offset()), (MAX_PAGE_SIZE, 0));
    }
}
