use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use crate::config::RunEnvironment;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::principal::Principal;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiResponseBody;
use crate::inbound::http::handlers::InternalErrorDetail;
use crate::inbound::http::router::AppState;

/// Verify the bearer access token and store the resulting [`Principal`] in
/// the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        ApiError::Unauthorized("Missing or malformed Authorization header".to_string())
    })?;

    let principal = state
        .auth_service
        .authenticate(bearer.token())
        .inspect_err(|e| tracing::warn!(error = %e, "Access token rejected"))?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Only lets SuperAdmin principals through. Must run after [`authenticate`].
pub async fn require_super_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<Principal>() {
        Some(principal) if principal.is_super_admin() => Ok(next.run(req).await),
        Some(principal) => {
            tracing::warn!(user_id = %principal.user_id, uri = %req.uri(), "Role check failed");
            Err(ApiError::forbidden())
        }
        None => Err(ApiError::forbidden()),
    }
}

/// Put the detail of 500 responses back into the body in development.
pub async fn expose_internal_errors(
    State(environment): State<RunEnvironment>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if !environment.exposes_internal_errors() {
        return response;
    }

    let detail = response
        .extensions()
        .get::<InternalErrorDetail>()
        .map(|InternalErrorDetail(detail)| detail.clone());

    match detail {
        Some(detail) => (
            response.status(),
            Json(ApiResponseBody::new_internal_error(detail)),
        )
            .into_response(),
        None => response,
    }
}
