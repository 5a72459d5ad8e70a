//! Transport helpers shared by the reqwest identity adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::domain::ports::IdentityProviderError;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Build the reqwest client used by an adapter, bounded by `timeout`.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

pub(crate) fn map_transport_error(error: &reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

/// Fallback classification for statuses that carry no provider error code.
pub(crate) fn classify_status(status: StatusCode, message: String) -> IdentityProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => IdentityProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(message)
        }
        _ if status.is_client_error() => {
            IdentityProviderError::rejected(format!("HTTP{}", status.as_u16()), message)
        }
        _ => IdentityProviderError::transport(message),
    }
}

/// Whitespace-collapsed, length-capped rendering of a response body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// `status N[: preview]` message for errors without a decodable body.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn classifies_bare_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        assert_eq!(classify_status(status, "boom".to_owned()).kind(), expected);
    }

    #[test]
    fn previews_are_compacted_and_capped() {
        let body = format!("  line one\n\n line two {}", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("line one line two x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }

    #[test]
    fn status_message_omits_empty_bodies() {
        assert_eq!(status_message(StatusCode::BAD_GATEWAY, b"  "), "status 502");
        assert_eq!(
            status_message(StatusCode::BAD_GATEWAY, b"upstream down"),
            "status 502: upstream down"
        );
    }
}
