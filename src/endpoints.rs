//! The application route URIs.
//!
//! For routes that take a parameter, e.g., '/transactions/{transaction_id}',
//! use [format_endpoint].

/// The root route which redirects to the transactions listing.
pub const ROOT: &str = "/";
/// The page for displaying the recorded transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for viewing a single transaction and its attachments.
pub const TRANSACTION_DETAIL_VIEW: &str = "/transactions/{transaction_id}";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The route for downloading an attachment's file contents.
pub const ATTACHMENT_DOWNLOAD: &str = "/attachments/{attachment_id}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to upload attachments to an existing transaction.
pub const POST_ATTACHMENTS: &str = "/api/transactions/{transaction_id}/attachments";
/// The route to delete an attachment.
pub const DELETE_ATTACHMENT: &str = "/api/attachments/{attachment_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the path '/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::TRANSACTIONS_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn parameterised_endpoints_are_valid_uris_after_formatting() {
        for endpoint in [
            endpoints::TRANSACTION_DETAIL_VIEW,
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::ATTACHMENT_DOWNLOAD,
            endpoints::PUT_TRANSACTION,
            endpoints::DELETE_TRANSACTION,
            endpoints::POST_ATTACHMENTS,
            endpoints::DELETE_ATTACHMENT,
        ] {
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 42));
        }
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        let got = format_endpoint("/api/transactions/{transaction_id}", 7);

        assert_eq!(got, "/api/transactions/7");
    }

    #[test]
    fn format_endpoint_returns_path_without_parameter_unchanged() {
        let got = format_endpoint("/transactions", 7);

        assert_eq!(got, "/transactions");
    }
}
