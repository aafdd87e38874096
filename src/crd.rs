// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for PowerDNS record management.
//!
//! # Resource Types
//!
//! - [`DNSRecord`] - A single resource record set (name + type) kept in sync with
//!   a PowerDNS authoritative server
//!
//! # Example: Creating a DNS Record
//!
//! ```rust,no_run
//! use powerdns_operator::crd::{DNSRecordSpec, RecordType, SecretReference};
//!
//! let spec = DNSRecordSpec {
//!     secret_ref: SecretReference {
//!         name: "powerdns-credentials".to_string(),
//!         namespace: None,
//!     },
//!     name: "www.example.com".to_string(),
//!     record_type: RecordType::A,
//!     values: vec!["192.0.2.1".to_string()],
//!     ttl: Some(300),
//!     zone: None,
//! };
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record types that can be managed through the PowerDNS API.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    AAAA,
    /// Canonical name (alias)
    CNAME,
    /// Free-form text
    TXT,
    /// Mail exchange
    MX,
    /// Name server delegation
    NS,
    /// Service location
    SRV,
    /// Certificate authority authorization
    CAA,
    /// Reverse pointer
    PTR,
}

impl RecordType {
    /// Upper-case mnemonic as used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::TXT => "TXT",
            Self::MX => "MX",
            Self::NS => "NS",
            Self::SRV => "SRV",
            Self::CAA => "CAA",
            Self::PTR => "PTR",
        }
    }

    /// Whether record contents of this type embed a domain name that PowerDNS
    /// expects in canonical (fully qualified, trailing dot) form.
    #[must_use]
    pub fn has_domain_name_content(&self) -> bool {
        matches!(
            self,
            Self::CNAME | Self::MX | Self::NS | Self::PTR | Self::SRV
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::AAAA),
            "CNAME" => Ok(Self::CNAME),
            "TXT" => Ok(Self::TXT),
            "MX" => Ok(Self::MX),
            "NS" => Ok(Self::NS),
            "SRV" => Ok(Self::SRV),
            "CAA" => Ok(Self::CAA),
            "PTR" => Ok(Self::PTR),
            other => Err(format!("unsupported record type: {other}")),
        }
    }
}

/// Reference to a Kubernetes `Secret` holding PowerDNS credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretReference {
    /// Name of the secret.
    pub name: String,

    /// Namespace of the secret. Defaults to the namespace of the `DNSRecord`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Condition represents an observation of a resource's current state.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Condition {
    /// Type of condition. Common types include: Ready, Available, Progressing, Degraded, Failed.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// Kind of the last lifecycle operation performed on a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LastOperationType {
    Create,
    Reconcile,
    Delete,
    Migrate,
    Restore,
}

/// Outcome of the last lifecycle operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LastOperationState {
    Processing,
    Succeeded,
    Error,
}

/// Last lifecycle operation performed on a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastOperation {
    pub r#type: LastOperationType,
    pub state: LastOperationState,
    pub description: String,
    /// RFC3339 timestamp of the last update
    pub last_update_time: String,
}

/// Last error observed while operating on a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastError {
    pub description: String,
    /// Machine readable error codes (e.g. `ERR_CONFIGURATION_PROBLEM`)
    #[serde(default)]
    pub codes: Vec<String>,
    /// RFC3339 timestamp of the last update
    pub last_update_time: String,
}

/// `DNSRecord` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    /// Hosted zone id the record was written to. Once set, later reconciliations
    /// keep using it instead of searching the zone list again.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<LastOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,
}

/// `DNSRecord` keeps one resource record set in a PowerDNS hosted zone.
///
/// # Example
///
/// ```yaml
/// apiVersion: powerdns.firestoned.io/v1alpha1
/// kind: DNSRecord
/// metadata:
///   name: www-example-com
///   namespace: dns-system
/// spec:
///   secretRef:
///     name: powerdns-credentials
///   name: www.example.com
///   recordType: A
///   values:
///     - 192.0.2.1
///     - 192.0.2.2
///   ttl: 300
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "powerdns.firestoned.io",
    version = "v1alpha1",
    kind = "DNSRecord",
    namespaced,
    shortname = "pdnsrec",
    doc = "DNSRecord keeps a resource record set (name and type) in a PowerDNS hosted zone in sync with the desired values.",
    printcolumn = r#"{"name":"Name","type":"string","jsonPath":".spec.name"}"#,
    printcolumn = r#"{"name":"Type","type":"string","jsonPath":".spec.recordType"}"#,
    printcolumn = r#"{"name":"Zone","type":"string","jsonPath":".status.zone"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#
)]
#[kube(status = "DNSRecordStatus")]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordSpec {
    /// Secret holding the PowerDNS connection parameters.
    pub secret_ref: SecretReference,

    /// Fully qualified record name (e.g., "www.example.com" or "*.apps.example.com").
    pub name: String,

    /// Record type.
    pub record_type: RecordType,

    /// Record contents. The whole set replaces whatever the server holds for
    /// this name and type.
    #[schemars(length(min = 1))]
    pub values: Vec<String>,

    /// Time To Live in seconds. The operator default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 4_294_967_295_i64))]
    pub ttl: Option<i64>,

    /// Hosted zone id to write to. When unset the zone is derived from the
    /// record name by longest suffix match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}
