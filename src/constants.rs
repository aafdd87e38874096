// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the PowerDNS operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the operator CRDs
pub const API_GROUP: &str = "powerdns.firestoned.io";

/// API version for the operator CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "powerdns.firestoned.io/v1alpha1";

/// Kind name for `DNSRecord` resource
pub const KIND_DNS_RECORD: &str = "DNSRecord";

// ============================================================================
// Credential Secret Keys
// ============================================================================

/// Secret key holding the PowerDNS API key (required)
pub const SECRET_KEY_API_KEY: &str = "apiKey";

/// Secret key holding the PowerDNS server URL (required)
pub const SECRET_KEY_SERVER: &str = "server";

/// Secret key holding the PowerDNS virtual host / server id (optional)
pub const SECRET_KEY_VIRTUAL_HOST: &str = "virtualHost";

/// Secret key holding the stringified boolean to disable TLS verification (optional)
pub const SECRET_KEY_INSECURE_SKIP_VERIFY: &str = "insecureSkipVerify";

/// Secret key holding a PEM encoded CA bundle to trust (optional)
pub const SECRET_KEY_TRUSTED_CA_CERT: &str = "trustedCaCert";

// ============================================================================
// PowerDNS Protocol Constants
// ============================================================================

/// Virtual host used when the secret does not name one
pub const DEFAULT_VIRTUAL_HOST: &str = "localhost";

/// Path prefix of the PowerDNS HTTP API
pub const POWERDNS_API_PATH: &str = "api/v1";

/// Header carrying the static API key
pub const POWERDNS_API_KEY_HEADER: &str = "X-API-Key";

/// Escaped wildcard label as returned by PowerDNS in zone names
pub const ESCAPED_WILDCARD_PREFIX: &str = "\\052.";

/// Default TTL for DNS records when the resource does not set one (2 minutes)
pub const DEFAULT_DNS_RECORD_TTL_SECS: i64 = 120;

/// Label prefix used to derive the legacy ownership marker record name
pub const META_RECORD_PREFIX: &str = "comment-";

// ============================================================================
// HTTP Client Constants
// ============================================================================

/// Per-request timeout for PowerDNS API calls
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Upper bound for a complete reconcile/delete operation
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Controller Requeue Constants
// ============================================================================

/// Requeue interval after a successful reconciliation (5 minutes)
pub const DEFAULT_REQUEUE_INTERVAL_SECS: u64 = 300;

/// Requeue interval after a transient failure (30 seconds)
pub const DEFAULT_ERROR_REQUEUE_SECS: u64 = 30;

/// Requeue interval after a configuration problem (5 minutes)
pub const DEFAULT_CONFIG_ERROR_REQUEUE_SECS: u64 = 300;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Bind address of the metrics and health endpoint
pub const DEFAULT_METRICS_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Path of the Prometheus scrape endpoint
pub const METRICS_PATH: &str = "/metrics";

/// Path of the liveness endpoint
pub const HEALTHZ_PATH: &str = "/healthz";
