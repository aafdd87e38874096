// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for credential handling, PowerDNS API calls and record reconciliation.
//!
//! This module provides specialized error types for:
//! - Credential secrets (missing or malformed fields)
//! - Secret store access
//! - PowerDNS HTTP API operations (transport, authentication, server errors)
//! - Hosted zone resolution
//!
//! [`ReconcileError`] is the composite returned by the record actuator. It wraps
//! the lower level errors with the zone/name/type being processed and classifies
//! them for status reporting and requeue decisions.

use crate::context::CancellationError;
use crate::status_reasons::{
    REASON_CREDENTIALS_INVALID, REASON_INVALID_RECORD, REASON_OPERATION_CANCELLED,
    REASON_POWERDNS_AUTH_FAILED, REASON_POWERDNS_BAD_REQUEST, REASON_POWERDNS_INTERNAL_ERROR,
    REASON_POWERDNS_INVALID_RESPONSE, REASON_POWERDNS_UNREACHABLE, REASON_SECRET_NOT_FOUND,
    REASON_SECRET_UNAVAILABLE, REASON_TLS_CONFIGURATION_INVALID, REASON_ZONE_NOT_FOUND,
};
use thiserror::Error;

/// Errors raised while turning secret data into connection credentials.
///
/// None of these are retryable without an operator fixing the secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The secret exists but carries no data at all.
    #[error("secret does not contain any data")]
    EmptySecret,

    /// A required field is absent (or empty).
    #[error("missing {field:?} field in secret")]
    MissingField {
        /// The secret key that was expected
        field: &'static str,
    },

    /// A field is present but its value cannot be used.
    #[error("cannot parse {field:?} field in secret: {reason}")]
    InvalidValue {
        /// The secret key holding the bad value
        field: &'static str,
        /// Explanation of what is invalid
        reason: String,
    },
}

/// Errors raised by a [`SecretStore`](crate::credentials::SecretStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreError {
    /// The referenced secret does not exist.
    #[error("secret '{namespace}/{name}' not found")]
    NotFound {
        /// Namespace that was searched
        namespace: String,
        /// Secret name
        name: String,
    },

    /// The backend could not be queried.
    #[error("could not read secret '{namespace}/{name}': {reason}")]
    Unavailable {
        /// Namespace of the secret
        namespace: String,
        /// Secret name
        name: String,
        /// Backend error message
        reason: String,
    },

    /// The read was aborted by the caller.
    #[error("reading secret aborted: {0}")]
    Cancelled(#[from] CancellationError),
}

/// Errors returned by the PowerDNS client adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowerDnsError {
    /// The server URL from the credentials cannot be used to build request URLs.
    #[error("invalid PowerDNS server URL '{server}': {reason}")]
    InvalidServerUrl {
        /// The configured server
        server: String,
        /// Parse failure
        reason: String,
    },

    /// The TLS trust configuration could not be applied.
    #[error("invalid TLS configuration: {reason}")]
    TlsConfiguration {
        /// Why the configuration was rejected
        reason: String,
    },

    /// Network level failure (connection refused, DNS failure, timeout, broken body).
    #[error("PowerDNS request to {endpoint} failed: {reason}")]
    Transport {
        /// Request URL
        endpoint: String,
        /// Underlying error
        reason: String,
    },

    /// The API key was rejected (HTTP 401/403).
    #[error("PowerDNS rejected the API key (HTTP {status}): {message}")]
    Auth {
        /// HTTP status code
        status: u16,
        /// Error message returned by the server
        message: String,
    },

    /// The request was refused as invalid (HTTP 4xx other than 401/403).
    #[error("PowerDNS rejected the request (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message returned by the server
        message: String,
    },

    /// The server failed to process the request (HTTP 5xx).
    #[error("PowerDNS server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message returned by the server
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response from PowerDNS: {reason}")]
    InvalidResponse {
        /// Decoding failure
        reason: String,
    },

    /// The call was aborted by cancellation or deadline.
    #[error("PowerDNS request aborted: {0}")]
    Cancelled(#[from] CancellationError),
}

impl PowerDnsError {
    /// Returns true if retrying the same call later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Server { .. } | Self::Cancelled(_)
        )
    }

    /// Returns true if the failure can only be fixed by changing configuration.
    #[must_use]
    pub fn is_configuration_problem(&self) -> bool {
        matches!(
            self,
            Self::InvalidServerUrl { .. } | Self::TlsConfiguration { .. } | Self::Rejected { .. }
        )
    }

    /// Returns the status condition reason for this error.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::InvalidServerUrl { .. } => REASON_CREDENTIALS_INVALID,
            Self::TlsConfiguration { .. } => REASON_TLS_CONFIGURATION_INVALID,
            Self::Transport { .. } => REASON_POWERDNS_UNREACHABLE,
            Self::Auth { .. } => REASON_POWERDNS_AUTH_FAILED,
            Self::Rejected { .. } => REASON_POWERDNS_BAD_REQUEST,
            Self::Server { .. } => REASON_POWERDNS_INTERNAL_ERROR,
            Self::InvalidResponse { .. } => REASON_POWERDNS_INVALID_RESPONSE,
            Self::Cancelled(_) => REASON_OPERATION_CANCELLED,
        }
    }
}

/// Errors raised while determining the hosted zone of a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// No hosted zone name is a suffix of the record name.
    #[error("could not find DNS hosted zone for name {name}")]
    ZoneNotFound {
        /// The record name that could not be placed
        name: String,
    },
}

/// Machine readable error classification written to `status.lastError.codes`.
///
/// External tooling uses the code to decide whether to surface the problem to
/// users or to keep retrying silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The user has to fix the resource or its secret.
    ConfigurationProblem,
    /// PowerDNS refused the API key.
    Unauthorized,
    /// PowerDNS or the secret backend is temporarily unavailable.
    InfrastructureUnavailable,
    /// The operation was aborted.
    Cancelled,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationProblem => "ERR_CONFIGURATION_PROBLEM",
            Self::Unauthorized => "ERR_INFRA_UNAUTHORIZED",
            Self::InfrastructureUnavailable => "ERR_INFRA_DEPENDENCIES",
            Self::Cancelled => "ERR_CANCELLED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite error returned by the record actuator.
#[derive(Error, Debug, Clone)]
pub enum ReconcileError {
    /// The credentials secret could not be fetched.
    #[error(transparent)]
    SecretStore(#[from] SecretStoreError),

    /// The credentials secret is malformed.
    #[error("could not create PowerDNS client: {0}")]
    Credentials(#[from] CredentialError),

    /// The HTTP client could not be built from the credentials.
    #[error("could not create PowerDNS client: {0}")]
    ClientSetup(#[source] PowerDnsError),

    /// Listing the hosted zones failed.
    #[error("could not get DNS hosted zones: {0}")]
    ListZones(#[source] PowerDnsError),

    /// No hosted zone matches the record name.
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// The TTL does not fit the PowerDNS wire format.
    #[error("invalid TTL {ttl} for DNS record {name}: must be between 0 and {max}", max = u32::MAX)]
    InvalidTtl {
        /// Record name
        name: String,
        /// Offending TTL
        ttl: i64,
    },

    /// Writing the record set failed.
    #[error("could not create or update DNS recordset in zone {zone} with name {name}, type {record_type}, and values {values:?}: {source}")]
    UpsertRecordSet {
        zone: String,
        name: String,
        record_type: String,
        values: Vec<String>,
        #[source]
        source: PowerDnsError,
    },

    /// Deleting the record set failed.
    #[error("could not delete DNS recordset in zone {zone} with name {name}, type {record_type}, and values {values:?}: {source}")]
    DeleteRecordSet {
        zone: String,
        name: String,
        record_type: String,
        values: Vec<String>,
        #[source]
        source: PowerDnsError,
    },

    /// Deleting the legacy meta TXT record set failed.
    #[error("could not delete meta DNS recordset in zone {zone} with name {name} and type TXT: {source}")]
    DeleteMetaRecordSet {
        zone: String,
        name: String,
        #[source]
        source: PowerDnsError,
    },
}

impl ReconcileError {
    /// The PowerDNS error wrapped by this error, if any.
    #[must_use]
    pub fn powerdns_error(&self) -> Option<&PowerDnsError> {
        match self {
            Self::ClientSetup(e) | Self::ListZones(e) => Some(e),
            Self::UpsertRecordSet { source, .. }
            | Self::DeleteRecordSet { source, .. }
            | Self::DeleteMetaRecordSet { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns true if the operation was aborted by cancellation or deadline.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::SecretStore(SecretStoreError::Cancelled(_)))
            || matches!(self.powerdns_error(), Some(PowerDnsError::Cancelled(_)))
    }

    /// Returns true if this error is transient and the operation should be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::SecretStore(SecretStoreError::Unavailable { .. } | SecretStoreError::Cancelled(_)) => {
                true
            }
            Self::SecretStore(SecretStoreError::NotFound { .. })
            | Self::Credentials(_)
            | Self::Zone(_)
            | Self::InvalidTtl { .. } => false,
            _ => self
                .powerdns_error()
                .is_some_and(PowerDnsError::is_transient),
        }
    }

    /// Returns true if the user has to fix the resource or its secret.
    ///
    /// Zone resolution failures fall in this category so that they are reported
    /// to the user instead of being retried at a high rate forever.
    #[must_use]
    pub fn is_configuration_problem(&self) -> bool {
        match self {
            Self::SecretStore(SecretStoreError::NotFound { .. })
            | Self::Credentials(_)
            | Self::Zone(_)
            | Self::InvalidTtl { .. } => true,
            Self::SecretStore(_) => false,
            _ => self
                .powerdns_error()
                .is_some_and(PowerDnsError::is_configuration_problem),
        }
    }

    /// Returns the error code for `status.lastError.codes`.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        if self.is_cancelled() {
            ErrorCode::Cancelled
        } else if self.is_configuration_problem() {
            ErrorCode::ConfigurationProblem
        } else if matches!(self.powerdns_error(), Some(PowerDnsError::Auth { .. })) {
            ErrorCode::Unauthorized
        } else {
            ErrorCode::InfrastructureUnavailable
        }
    }

    /// Returns the Kubernetes status reason code for this error.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::SecretStore(SecretStoreError::NotFound { .. }) => REASON_SECRET_NOT_FOUND,
            Self::SecretStore(SecretStoreError::Unavailable { .. }) => REASON_SECRET_UNAVAILABLE,
            Self::SecretStore(SecretStoreError::Cancelled(_)) => REASON_OPERATION_CANCELLED,
            Self::Credentials(_) => REASON_CREDENTIALS_INVALID,
            Self::Zone(_) => REASON_ZONE_NOT_FOUND,
            Self::InvalidTtl { .. } => REASON_INVALID_RECORD,
            Self::ClientSetup(e)
            | Self::ListZones(e)
            | Self::UpsertRecordSet { source: e, .. }
            | Self::DeleteRecordSet { source: e, .. }
            | Self::DeleteMetaRecordSet { source: e, .. } => e.status_reason(),
        }
    }
}
