// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP error mapping for PowerDNS API responses.
//!
//! This module converts HTTP status codes and error bodies returned by the
//! PowerDNS API into [`PowerDnsError`] values and Kubernetes condition reasons.
//!
//! # Usage
//!
//! ```rust
//! use powerdns_operator::http_errors::map_http_error_to_reason;
//!
//! let (reason, _message) = map_http_error_to_reason(401);
//! assert_eq!(reason, "PowerDnsAuthFailed");
//!
//! let (reason, _message) = map_http_error_to_reason(503);
//! assert_eq!(reason, "PowerDnsInternalError");
//! ```

use crate::dns_errors::PowerDnsError;
use crate::status_reasons::{
    REASON_POWERDNS_AUTH_FAILED, REASON_POWERDNS_BAD_REQUEST, REASON_POWERDNS_INTERNAL_ERROR,
    REASON_POWERDNS_UNREACHABLE,
};
use serde::Deserialize;

/// Longest error body kept in error messages.
const MAX_ERROR_BODY_LEN: usize = 512;

/// Error document returned by PowerDNS for failed API calls.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Map HTTP status code to condition reason and message.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason | Meaning |
/// |-----------|--------|---------|
/// | 400, 404, 409, 422 | `PowerDnsBadRequest` | Request refused as invalid |
/// | 401, 403 | `PowerDnsAuthFailed` | API key rejected |
/// | 5xx | `PowerDnsInternalError` | Server side failure |
/// | Other | `PowerDnsUnreachable` | Unexpected response |
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        401 => (
            REASON_POWERDNS_AUTH_FAILED,
            "PowerDNS authentication required (401)".into(),
        ),
        403 => (
            REASON_POWERDNS_AUTH_FAILED,
            "PowerDNS authorization failed (403)".into(),
        ),
        400 | 404 | 409 | 422 => (
            REASON_POWERDNS_BAD_REQUEST,
            format!("PowerDNS refused the request ({status_code})"),
        ),
        500..=599 => (
            REASON_POWERDNS_INTERNAL_ERROR,
            format!("PowerDNS server error ({status_code})"),
        ),
        _ => (
            REASON_POWERDNS_UNREACHABLE,
            format!("Unexpected HTTP response from PowerDNS ({status_code})"),
        ),
    }
}

/// Extract the human readable message from a PowerDNS error body.
///
/// PowerDNS answers with `{"error": "..."}`; anything else is returned verbatim,
/// truncated to a sane length.
#[must_use]
pub fn extract_error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error;
    }

    let trimmed = body.trim();
    if trimmed.len() <= MAX_ERROR_BODY_LEN {
        return trimmed.to_string();
    }

    let mut end = MAX_ERROR_BODY_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

/// Build the [`PowerDnsError`] for a non-success HTTP response.
///
/// An empty body is replaced by the generic message for the status code.
#[must_use]
pub fn classify_response(status_code: u16, body: &str) -> PowerDnsError {
    let mut message = extract_error_message(body);
    if message.is_empty() {
        message = map_http_error_to_reason(status_code).1;
    }
    match status_code {
        401 | 403 => PowerDnsError::Auth {
            status: status_code,
            message,
        },
        500..=599 => PowerDnsError::Server {
            status: status_code,
            message,
        },
        _ => PowerDnsError::Rejected {
            status: status_code,
            message,
        },
    }
}

/// Map a reqwest failure that happened before a status code was received.
#[must_use]
pub fn map_transport_error(endpoint: &str, err: &reqwest::Error) -> PowerDnsError {
    let reason = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };

    PowerDnsError::Transport {
        endpoint: endpoint.to_string(),
        reason,
    }
}
