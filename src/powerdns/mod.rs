// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS HTTP API client adapter.
//!
//! The reconciler talks to PowerDNS through the [`PowerDnsApi`] trait, which
//! exposes exactly three operations:
//!
//! - list hosted zones as a `name -> id` map
//! - replace (create or update) one record set
//! - delete one record set
//!
//! [`PowerDnsClient`] implements the trait over the PowerDNS REST API
//! (`/api/v1/servers/{virtual_host}/zones`). Clients are built per operation from
//! the credentials stored in a secret, through a [`PowerDnsClientFactory`].
//!
//! # Example
//!
//! ```rust,no_run
//! use powerdns_operator::context::OperationContext;
//! use powerdns_operator::credentials::ConnectionCredentials;
//! use powerdns_operator::powerdns::{PowerDnsApi, PowerDnsClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ConnectionCredentials {
//!     api_key: "secret".to_string(),
//!     server: "https://pdns.example.com:8081".to_string(),
//!     virtual_host: "localhost".to_string(),
//!     insecure_skip_verify: false,
//!     trusted_ca_cert: None,
//! };
//! let client = PowerDnsClient::new(&credentials, Duration::from_secs(30))?;
//! let zones = client.list_hosted_zones(&OperationContext::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod transport;
pub mod types;


pub use client::{canonical_name, format_record_content, normalize_zone_name, PowerDnsClient};

use crate::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::context::OperationContext;
use crate::credentials::ConnectionCredentials;
use crate::crd::RecordType;
use crate::dns_errors::PowerDnsError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Operations the reconciler needs from a PowerDNS server.
///
/// Every call honors `ctx`: a cancelled context or an elapsed deadline aborts
/// the call with [`PowerDnsError::Cancelled`].
#[async_trait]
pub trait PowerDnsApi: Send + Sync {
    /// List hosted zones as `normalized zone name -> zone id`.
    ///
    /// Zone names carry no trailing dot and a leading escaped wildcard (`\052.`)
    /// is rendered as `*.`.
    async fn list_hosted_zones(
        &self,
        ctx: &OperationContext,
    ) -> Result<HashMap<String, String>, PowerDnsError>;

    /// Replace the record set `name`/`record_type` in `zone_id` with `values`.
    ///
    /// Creates the record set if absent. Calling twice with the same input is
    /// a no-op on the server.
    async fn upsert_record_set(
        &self,
        ctx: &OperationContext,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
        values: &[String],
        ttl: u32,
    ) -> Result<(), PowerDnsError>;

    /// Delete the record set `name`/`record_type` from `zone_id`.
    ///
    /// Deleting an absent record set succeeds.
    async fn delete_record_set(
        &self,
        ctx: &OperationContext,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<(), PowerDnsError>;
}

/// Builds a [`PowerDnsApi`] for a set of credentials.
pub trait PowerDnsClientFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be turned into a client
    /// (bad server URL, unusable CA bundle).
    fn create(
        &self,
        credentials: &ConnectionCredentials,
    ) -> Result<Arc<dyn PowerDnsApi>, PowerDnsError>;
}

/// Factory producing [`PowerDnsClient`]s with a fixed request timeout.
#[derive(Debug, Clone, Copy)]
pub struct HttpClientFactory {
    timeout: Duration,
}

impl HttpClientFactory {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }
}

impl PowerDnsClientFactory for HttpClientFactory {
    fn create(
        &self,
        credentials: &ConnectionCredentials,
    ) -> Result<Arc<dyn PowerDnsApi>, PowerDnsError> {
        Ok(Arc::new(PowerDnsClient::new(credentials, self.timeout)?))
    }
}
