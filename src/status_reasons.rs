// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard Kubernetes status condition reasons for `DNSRecord` resources.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why a condition has
//! a particular status. Every `DNSRecord` carries a single `type: Ready` condition.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   zone: example.com.
//!   conditions:
//!     - type: Ready
//!       status: "False"
//!       reason: ZoneNotFound
//!       message: "could not find DNS hosted zone for name www.example.org"
//!   lastError:
//!     description: "could not find DNS hosted zone for name www.example.org"
//!     codes:
//!       - ERR_CONFIGURATION_PROBLEM
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// The encompassing condition type of every `DNSRecord`.
pub const CONDITION_TYPE_READY: &str = "Ready";

/// Condition status values.
pub const CONDITION_STATUS_TRUE: &str = "True";
pub const CONDITION_STATUS_FALSE: &str = "False";

// ============================================================================
// Success Reasons
// ============================================================================

/// The record set exists in PowerDNS with the desired values.
pub const REASON_RECORD_READY: &str = "RecordReady";

/// The record was handed over to another controller instance.
pub const REASON_RECORD_MIGRATED: &str = "RecordMigrated";

// ============================================================================
// Configuration Problems
// ============================================================================

/// No hosted zone matches the record name.
///
/// **Remediation:** set `spec.zone` or create the zone in PowerDNS.
pub const REASON_ZONE_NOT_FOUND: &str = "ZoneNotFound";

/// The referenced credentials secret does not exist.
pub const REASON_SECRET_NOT_FOUND: &str = "SecretNotFound";

/// The credentials secret is missing a field or contains an unparsable value.
pub const REASON_CREDENTIALS_INVALID: &str = "CredentialsInvalid";

/// The trusted CA bundle could not be loaded.
pub const REASON_TLS_CONFIGURATION_INVALID: &str = "TlsConfigurationInvalid";

/// The record itself is invalid (e.g. TTL out of range).
pub const REASON_INVALID_RECORD: &str = "InvalidRecord";

/// PowerDNS refused the request as malformed (HTTP 400, 404, 422).
pub const REASON_POWERDNS_BAD_REQUEST: &str = "PowerDnsBadRequest";

// ============================================================================
// Authentication
// ============================================================================

/// PowerDNS rejected the API key (HTTP 401/403).
pub const REASON_POWERDNS_AUTH_FAILED: &str = "PowerDnsAuthFailed";

// ============================================================================
// Transient Failures
// ============================================================================

/// The secret backend could not be queried.
pub const REASON_SECRET_UNAVAILABLE: &str = "SecretUnavailable";

/// PowerDNS could not be reached (connection refused, DNS failure, timeout).
pub const REASON_POWERDNS_UNREACHABLE: &str = "PowerDnsUnreachable";

/// PowerDNS answered with HTTP 5xx.
pub const REASON_POWERDNS_INTERNAL_ERROR: &str = "PowerDnsInternalError";

/// PowerDNS answered with a body that could not be decoded.
pub const REASON_POWERDNS_INVALID_RESPONSE: &str = "PowerDnsInvalidResponse";

/// The operation was cancelled or exceeded its deadline.
pub const REASON_OPERATION_CANCELLED: &str = "OperationCancelled";
