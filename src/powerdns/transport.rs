// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP transport configuration for the PowerDNS client.
//!
//! The TLS setup follows the credentials, evaluated in order:
//!
//! 1. `insecureSkipVerify` set: certificate verification is disabled
//! 2. `trustedCaCert` present: the PEM bundle is trusted and TLS 1.2 is the minimum
//! 3. otherwise: platform default trust
//!
//! The options are mutually exclusive; a CA bundle is ignored when verification is
//! disabled.

use crate::credentials::ConnectionCredentials;
use crate::dns_errors::PowerDnsError;
use reqwest::{tls, Certificate, Client};
use std::time::Duration;
use tracing::warn;

/// TLS mode derived from the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    InsecureSkipVerify,
    TrustedCa,
    PlatformDefault,
}

/// Decide which TLS mode applies to `credentials`.
#[must_use]
pub fn tls_mode(credentials: &ConnectionCredentials) -> TlsMode {
    if credentials.insecure_skip_verify {
        TlsMode::InsecureSkipVerify
    } else if credentials.trusted_ca_cert.is_some() {
        TlsMode::TrustedCa
    } else {
        TlsMode::PlatformDefault
    }
}

/// Build the reqwest client used for all calls made with `credentials`.
///
/// # Errors
///
/// Returns [`PowerDnsError::TlsConfiguration`] if the CA bundle holds no usable
/// certificate or the client cannot be built.
pub fn build_http_client(
    credentials: &ConnectionCredentials,
    timeout: Duration,
) -> Result<Client, PowerDnsError> {
    let builder = Client::builder().timeout(timeout);

    let builder = match tls_mode(credentials) {
        TlsMode::InsecureSkipVerify => {
            warn!(
                server = %credentials.server,
                "TLS certificate verification disabled for PowerDNS server"
            );
            builder.danger_accept_invalid_certs(true)
        }
        TlsMode::TrustedCa => {
            let pem = credentials.trusted_ca_cert.as_deref().unwrap_or_default();
            let certificates = Certificate::from_pem_bundle(pem).map_err(|e| {
                PowerDnsError::TlsConfiguration {
                    reason: format!("cannot parse trusted CA certificate: {e}"),
                }
            })?;
            if certificates.is_empty() {
                return Err(PowerDnsError::TlsConfiguration {
                    reason: "trusted CA certificate contains no PEM certificate".to_string(),
                });
            }
            certificates
                .into_iter()
                .fold(builder, reqwest::ClientBuilder::add_root_certificate)
                .min_tls_version(tls::Version::TLS_1_2)
        }
        TlsMode::PlatformDefault => builder,
    };

    builder
        .build()
        .map_err(|e| PowerDnsError::TlsConfiguration {
            reason: format!("cannot build HTTP client: {e}"),
        })
}
