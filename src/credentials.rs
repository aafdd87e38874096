// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS connection credentials and the secret store they are read from.
//!
//! Credentials live in an opaque key/value secret:
//!
//! | Key | Required | Default |
//! |-----|----------|---------|
//! | `apiKey` | yes | |
//! | `server` | yes | |
//! | `virtualHost` | no | `localhost` |
//! | `insecureSkipVerify` | no | `false` |
//! | `trustedCaCert` | no | none (platform trust) |
//!
//! [`resolve_credentials`] turns the raw secret data into [`ConnectionCredentials`].
//! The data itself comes from a [`SecretStore`]; [`KubeSecretStore`] reads
//! Kubernetes `Secret` objects.

use crate::constants::{
    DEFAULT_VIRTUAL_HOST, SECRET_KEY_API_KEY, SECRET_KEY_INSECURE_SKIP_VERIFY, SECRET_KEY_SERVER,
    SECRET_KEY_TRUSTED_CA_CERT, SECRET_KEY_VIRTUAL_HOST,
};
use crate::context::OperationContext;
use crate::crd::SecretReference;
use crate::dns_errors::{CredentialError, SecretStoreError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Raw secret data, key to bytes.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Connection parameters for one PowerDNS server.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionCredentials {
    pub api_key: String,
    pub server: String,
    pub virtual_host: String,
    pub insecure_skip_verify: bool,
    pub trusted_ca_cert: Option<Vec<u8>>,
}

impl fmt::Debug for ConnectionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCredentials")
            .field("api_key", &"<redacted>")
            .field("server", &self.server)
            .field("virtual_host", &self.virtual_host)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field(
                "trusted_ca_cert",
                &self.trusted_ca_cert.as_ref().map(Vec::len),
            )
            .finish()
    }
}

/// Build [`ConnectionCredentials`] from raw secret data.
///
/// Every present field is validated: values must be UTF-8 and `insecureSkipVerify`
/// must be a boolean. Empty required fields count as missing, an empty
/// `virtualHost` falls back to `localhost`.
///
/// # Errors
///
/// - [`CredentialError::EmptySecret`] if the secret has no data at all
/// - [`CredentialError::MissingField`] if `apiKey` or `server` is absent
/// - [`CredentialError::InvalidValue`] if a value cannot be parsed
pub fn resolve_credentials(data: &SecretData) -> Result<ConnectionCredentials, CredentialError> {
    if data.is_empty() {
        return Err(CredentialError::EmptySecret);
    }

    let api_key = required_string(data, SECRET_KEY_API_KEY)?;
    let server = required_string(data, SECRET_KEY_SERVER)?;
    let virtual_host = optional_string(data, SECRET_KEY_VIRTUAL_HOST)?
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_VIRTUAL_HOST.to_string());
    let insecure_skip_verify = optional_bool(data, SECRET_KEY_INSECURE_SKIP_VERIFY)?.unwrap_or(false);
    let trusted_ca_cert = data
        .get(SECRET_KEY_TRUSTED_CA_CERT)
        .filter(|value| !value.is_empty())
        .cloned();

    Ok(ConnectionCredentials {
        api_key,
        server,
        virtual_host,
        insecure_skip_verify,
        trusted_ca_cert,
    })
}

fn optional_string(data: &SecretData, field: &'static str) -> Result<Option<String>, CredentialError> {
    data.get(field)
        .map(|raw| {
            String::from_utf8(raw.clone()).map_err(|e| CredentialError::InvalidValue {
                field,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn required_string(data: &SecretData, field: &'static str) -> Result<String, CredentialError> {
    optional_string(data, field)?
        .filter(|value| !value.is_empty())
        .ok_or(CredentialError::MissingField { field })
}

fn optional_bool(data: &SecretData, field: &'static str) -> Result<Option<bool>, CredentialError> {
    let Some(raw) = optional_string(data, field)? else {
        return Ok(None);
    };
    parse_bool(raw.trim())
        .map(Some)
        .ok_or_else(|| CredentialError::InvalidValue {
            field,
            reason: format!("invalid boolean {raw:?}"),
        })
}

/// Parse the boolean spellings accepted in credential secrets.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Read access to opaque key/value secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the data of the referenced secret.
    ///
    /// `secret_ref.namespace` is always set by the caller.
    async fn get(
        &self,
        ctx: &OperationContext,
        secret_ref: &SecretReference,
    ) -> Result<SecretData, SecretStoreError>;
}

/// [`SecretStore`] backed by Kubernetes `core/v1` secrets.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(
        &self,
        ctx: &OperationContext,
        secret_ref: &SecretReference,
    ) -> Result<SecretData, SecretStoreError> {
        let namespace = secret_ref.namespace.clone().unwrap_or_default();
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &namespace);

        debug!(secret = %secret_ref.name, namespace = %namespace, "Reading credentials secret");

        let secret = match ctx.run(api.get(&secret_ref.name)).await? {
            Ok(secret) => secret,
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                return Err(SecretStoreError::NotFound {
                    namespace,
                    name: secret_ref.name.clone(),
                });
            }
            Err(e) => {
                return Err(SecretStoreError::Unavailable {
                    namespace,
                    name: secret_ref.name.clone(),
                    reason: e.to_string(),
                });
            }
        };

        Ok(secret_data(&secret))
    }
}

/// Extract the decoded data of a Kubernetes secret.
#[must_use]
pub fn secret_data(secret: &Secret) -> SecretData {
    secret
        .data
        .as_ref()
        .map(|data| {
            data.iter()
                .map(|(key, value)| (key.clone(), value.0.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// In-memory [`SecretStore`] keyed by `namespace/name`.
#[derive(Clone, Debug, Default)]
pub struct StaticSecretStore {
    secrets: BTreeMap<String, SecretData>,
}

impl StaticSecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a secret.
    #[must_use]
    pub fn with_secret(mut self, namespace: &str, name: &str, data: SecretData) -> Self {
        self.secrets.insert(format!("{namespace}/{name}"), data);
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get(
        &self,
        ctx: &OperationContext,
        secret_ref: &SecretReference,
    ) -> Result<SecretData, SecretStoreError> {
        if ctx.is_cancelled() {
            return Err(SecretStoreError::Cancelled(
                crate::context::CancellationError::Cancelled,
            ));
        }

        let namespace = secret_ref.namespace.clone().unwrap_or_default();
        self.secrets
            .get(&format!("{namespace}/{}", secret_ref.name))
            .cloned()
            .ok_or_else(|| SecretStoreError::NotFound {
                namespace,
                name: secret_ref.name.clone(),
            })
    }
}
