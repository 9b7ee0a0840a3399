use axum::response::Response;

use crate::Error;

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_api_response("Route not found")
}
