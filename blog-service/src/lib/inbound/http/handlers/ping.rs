use axum::http::StatusCode;

use super::ApiSuccess;

pub async fn ping() -> ApiSuccess<&'static str> {
    ApiSuccess::new(StatusCode::OK, "pong")
}
