use axum::{extract::Request, middleware::Next, response::Response};
use tower_cookies::Cookies;

use crate::{
    Config, auth,
    web::{RequestContext, UserRole, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

/// Resolves the identity token in the `SID` cookie into a [`RequestContext`].
/// Requests without the cookie continue anonymously; a present but invalid
/// token is rejected.
pub async fn extract_context_fn(
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) => token,
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let claims = auth::process_token(token.value(), config.app().jwt())
        .map_err(|e| WebError::auth_cookie_invalid(AUTH_TOKEN, e))?
        .claims;

    let role = if config.app().is_admin_email(&claims.email) {
        UserRole::Admin
    } else {
        UserRole::User
    };

    tracing::trace!("request by {} ({role})", claims.sub);
    let user = AuthenticatedUser::new(claims.sub, claims.name, claims.email, role);
    req.extensions_mut()
        .insert(RequestContext::new(Some(user)));

    Ok(next.run(req).await)
}
