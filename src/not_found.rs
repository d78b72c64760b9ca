//! Defines the 404 page and the fallback route handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::view_templates::error_view;

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Build the 404 response directly, for use outside of routing.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Sorry, we couldn't find that page.",
            "Check the address, or head back to your transactions.",
        ),
    )
        .into_response()
}
