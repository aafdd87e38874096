// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

#![allow(dead_code)]

use powerdns_operator::credentials::{SecretData, StaticSecretStore};
use powerdns_operator::crd::{RecordType, SecretReference};
use powerdns_operator::powerdns::HttpClientFactory;
use powerdns_operator::reconcilers::{RecordActuator, RecordRequest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_NAMESPACE: &str = "dns-system";
pub const TEST_SECRET: &str = "powerdns-credentials";
pub const TEST_API_KEY: &str = "integration-key";
pub const ZONES_PATH: &str = "/api/v1/servers/localhost/zones";

/// Credentials secret pointing at `server`.
pub fn secret_data(server: &str) -> SecretData {
    [
        ("apiKey".to_string(), TEST_API_KEY.as_bytes().to_vec()),
        ("server".to_string(), server.as_bytes().to_vec()),
    ]
    .into_iter()
    .collect()
}

/// Actuator talking HTTP to the mock PowerDNS server.
pub fn actuator_for(server: &MockServer) -> RecordActuator {
    let secrets = StaticSecretStore::new().with_secret(
        TEST_NAMESPACE,
        TEST_SECRET,
        secret_data(&server.uri()),
    );
    RecordActuator::new(
        Arc::new(secrets),
        Arc::new(HttpClientFactory::new(Duration::from_secs(5))),
    )
}

pub fn request(name: &str, record_type: RecordType, values: &[&str]) -> RecordRequest {
    RecordRequest {
        name: name.to_string(),
        record_type,
        values: values.iter().map(|v| (*v).to_string()).collect(),
        ttl: None,
        zone: None,
        resolved_zone: None,
        last_operation: None,
        last_operation_state: None,
        secret_ref: SecretReference {
            name: TEST_SECRET.to_string(),
            namespace: Some(TEST_NAMESPACE.to_string()),
        },
    }
}

/// Serve a zone listing with the given `(name, id)` pairs.
pub async fn mount_zones(server: &MockServer, zones: &[(&str, &str)]) {
    let body: Vec<_> = zones
        .iter()
        .map(|(name, id)| json!({"id": id, "name": name, "kind": "Native"}))
        .collect();
    Mock::given(method("GET"))
        .and(path(ZONES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
