use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::articles;
use super::handlers::authentications;
use super::handlers::categories;
use super::handlers::demos;
use super::handlers::ping::ping;
use super::handlers::public;
use super::handlers::tags;
use super::handlers::users;
use super::handlers::ApiError;
use super::middleware::authenticate;
use super::middleware::expose_internal_errors;
use super::middleware::require_super_admin;
use crate::config::RunEnvironment;
use crate::domain::article::ports::ArticleServicePort;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::category::ports::CategoryServicePort;
use crate::domain::demo::ports::DemoServicePort;
use crate::domain::tag::ports::TagServicePort;
use crate::domain::user::ports::UserServicePort;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<dyn ArticleServicePort>,
    pub category_service: Arc<dyn CategoryServicePort>,
    pub tag_service: Arc<dyn TagServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub demo_service: Arc<dyn DemoServicePort>,
    pub environment: RunEnvironment,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/authentications/register", post(authentications::register))
        .route("/v1/authentications/login", post(authentications::login))
        .route(
            "/v1/authentications/refresh-token",
            post(authentications::refresh_token),
        )
        .route("/v1/public/blog", get(public::list_public_articles))
        .route("/v1/public/blog/featured", get(public::featured_articles))
        .route("/v1/public/blog/:slug", get(public::get_public_article))
        .route("/v1/public/demo", post(demos::create_demo));

    let user_routes = Router::new()
        .route("/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/v1/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_super_admin));

    let protected_routes = Router::new()
        .route("/v1/authentications/logout", post(authentications::logout))
        .route("/v1/users/profile", get(users::profile))
        .route(
            "/v1/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/v1/articles/stats", get(articles::article_stats))
        .route("/v1/articles/external", post(articles::create_article_from_url))
        .route(
            "/v1/articles/by-slug/:slug",
            get(articles::get_article_by_slug),
        )
        .route(
            "/v1/articles/:id",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/v1/articles/:id/status", put(articles::update_article_status))
        .route("/v1/articles/:id/tags", put(articles::update_article_tags))
        .route(
            "/v1/articles/:id/featured",
            put(articles::set_featured_position).delete(articles::remove_featured_position),
        )
        .route("/v1/articles/:id/hard", delete(articles::hard_delete_article))
        .route(
            "/v1/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/v1/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/v1/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/v1/tags/:id",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route("/v1/demo", get(demos::list_demos).post(demos::create_demo))
        .route(
            "/v1/demo/:id",
            get(demos::get_demo)
                .put(demos::update_demo)
                .delete(demos::delete_demo),
        )
        .merge(user_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.environment,
            expose_internal_errors,
        ))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic".to_string()
    };

    ApiError::InternalServerError(format!("Handler panicked: {}", detail)).into_response()
}
