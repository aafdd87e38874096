// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! reqwest based implementation of [`PowerDnsApi`].

use super::transport::build_http_client;
use super::types::{ChangeType, RRSetChange, Record, ZonePatch, ZoneSummary};
use super::PowerDnsApi;
use crate::constants::{ESCAPED_WILDCARD_PREFIX, POWERDNS_API_KEY_HEADER, POWERDNS_API_PATH};
use crate::context::OperationContext;
use crate::credentials::ConnectionCredentials;
use crate::crd::RecordType;
use crate::dns_errors::PowerDnsError;
use crate::http_errors::{classify_response, map_transport_error};
use crate::metrics;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

/// Normalize a zone name returned by PowerDNS.
///
/// A leading escaped wildcard label (`\052.`) is rewritten to `*.` and the
/// trailing dot is stripped.
#[must_use]
pub fn normalize_zone_name(name: &str) -> String {
    let name = match name.strip_prefix(ESCAPED_WILDCARD_PREFIX) {
        Some(rest) => format!("*.{rest}"),
        None => name.to_string(),
    };
    match name.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Append the root label to `name` unless it is already fully qualified.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Format a record value the way PowerDNS expects it for `record_type`.
///
/// - `TXT` contents are wrapped in double quotes unless already quoted
/// - contents of `CNAME`, `MX`, `NS`, `PTR` and `SRV` end with the root label
/// - everything else is passed through
#[must_use]
pub fn format_record_content(record_type: RecordType, value: &str) -> String {
    if record_type == RecordType::TXT {
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            return value.to_string();
        }
        return format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""));
    }
    if record_type.has_domain_name_content() {
        return canonical_name(value);
    }
    value.to_string()
}

/// Build the API base URL from a server address.
///
/// `"pdns.example.com:8081"` becomes `http://pdns.example.com:8081`; URLs that
/// carry a scheme are kept, minus trailing slashes.
pub(crate) fn build_api_url(server: &str) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", server.trim_end_matches('/'))
    }
}

/// Client for one PowerDNS server and virtual host.
#[derive(Debug, Clone)]
pub struct PowerDnsClient {
    http: HttpClient,
    base_url: Url,
    virtual_host: String,
    api_key: String,
}

impl PowerDnsClient {
    /// Create a client from resolved credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid or the TLS configuration
    /// cannot be applied.
    pub fn new(
        credentials: &ConnectionCredentials,
        timeout: Duration,
    ) -> Result<Self, PowerDnsError> {
        let http = build_http_client(credentials, timeout)?;
        Self::with_http_client(credentials, http)
    }

    /// Create a client reusing an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid.
    pub fn with_http_client(
        credentials: &ConnectionCredentials,
        http: HttpClient,
    ) -> Result<Self, PowerDnsError> {
        let raw = build_api_url(&credentials.server);
        let base_url = Url::parse(&raw).map_err(|e| PowerDnsError::InvalidServerUrl {
            server: credentials.server.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PowerDnsError::InvalidServerUrl {
                server: credentials.server.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            http,
            base_url,
            virtual_host: credentials.virtual_host.clone(),
            api_key: credentials.api_key.clone(),
        })
    }

    /// `{server}/api/v1/servers/{virtual_host}/zones[/{zone_id}]`
    fn zones_url(&self, zone_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(POWERDNS_API_PATH.split('/'));
            segments.push("servers");
            segments.push(&self.virtual_host);
            segments.push("zones");
            if let Some(zone_id) = zone_id {
                segments.push(zone_id.trim_end_matches('.'));
            }
        }
        url
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.http
            .request(method, url.clone())
            .header(POWERDNS_API_KEY_HEADER, &self.api_key)
    }

    /// Send a request and return the response body of a successful call.
    async fn execute(
        &self,
        ctx: &OperationContext,
        operation: &'static str,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<(StatusCode, String), PowerDnsError> {
        let started = Instant::now();
        let endpoint = url.as_str();

        debug!(operation, url = %endpoint, "PowerDNS API request");

        let result = ctx
            .run(async {
                let response = request
                    .send()
                    .await
                    .map_err(|e| map_transport_error(endpoint, &e))?;
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| map_transport_error(endpoint, &e))?;
                Ok::<_, PowerDnsError>((status, body))
            })
            .await;

        let outcome = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                metrics::record_powerdns_request(operation, "transport_error", started.elapsed());
                error!(operation, url = %endpoint, error = %e, "PowerDNS API request failed");
                return Err(e);
            }
            Err(cancelled) => {
                metrics::record_powerdns_request(operation, "cancelled", started.elapsed());
                return Err(cancelled.into());
            }
        };

        let (status, body) = outcome;
        metrics::record_powerdns_request(operation, status.as_str(), started.elapsed());
        debug!(operation, url = %endpoint, status = %status, "PowerDNS API response");
        Ok((status, body))
    }
}

#[async_trait]
impl PowerDnsApi for PowerDnsClient {
    async fn list_hosted_zones(
        &self,
        ctx: &OperationContext,
    ) -> Result<HashMap<String, String>, PowerDnsError> {
        let url = self.zones_url(None);
        let request = self.request(Method::GET, &url);
        let (status, body) = self.execute(ctx, "list_zones", request, &url).await?;

        if !status.is_success() {
            return Err(classify_response(status.as_u16(), &body));
        }

        let zones: Vec<ZoneSummary> =
            serde_json::from_str(&body).map_err(|e| PowerDnsError::InvalidResponse {
                reason: format!("cannot decode zone list: {e}"),
            })?;

        Ok(zones
            .into_iter()
            .map(|zone| {
                (
                    normalize_zone_name(zone.name.as_deref().unwrap_or_default()),
                    zone.id.unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn upsert_record_set(
        &self,
        ctx: &OperationContext,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
        values: &[String],
        ttl: u32,
    ) -> Result<(), PowerDnsError> {
        let url = self.zones_url(Some(zone_id));
        let patch = ZonePatch {
            rrsets: vec![RRSetChange {
                name: canonical_name(name),
                record_type: record_type.to_string(),
                ttl: Some(ttl),
                changetype: ChangeType::Replace,
                records: Some(
                    values
                        .iter()
                        .map(|value| Record {
                            content: format_record_content(record_type, value),
                            disabled: false,
                        })
                        .collect(),
                ),
            }],
        };

        let request = self.request(Method::PATCH, &url).json(&patch);
        let (status, body) = self.execute(ctx, "replace_rrset", request, &url).await?;

        if !status.is_success() {
            return Err(classify_response(status.as_u16(), &body));
        }

        info!(zone = %zone_id, name = %name, record_type = %record_type, ttl, "Replaced PowerDNS record set");
        Ok(())
    }

    async fn delete_record_set(
        &self,
        ctx: &OperationContext,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<(), PowerDnsError> {
        let url = self.zones_url(Some(zone_id));
        let patch = ZonePatch {
            rrsets: vec![RRSetChange {
                name: canonical_name(name),
                record_type: record_type.to_string(),
                ttl: None,
                changetype: ChangeType::Delete,
                records: None,
            }],
        };

        let request = self.request(Method::PATCH, &url).json(&patch);
        let (status, body) = self.execute(ctx, "delete_rrset", request, &url).await?;

        // A vanished zone holds no record sets either
        if status == StatusCode::NOT_FOUND {
            debug!(zone = %zone_id, name = %name, record_type = %record_type, "Zone not found, record set already absent");
            return Ok(());
        }
        if !status.is_success() {
            return Err(classify_response(status.as_u16(), &body));
        }

        info!(zone = %zone_id, name = %name, record_type = %record_type, "Deleted PowerDNS record set");
        Ok(())
    }
}
