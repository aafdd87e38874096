// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types of the PowerDNS HTTP API.

use serde::{Deserialize, Serialize};

/// Zone entry as returned by `GET /servers/{server_id}/zones`.
///
/// Only the fields the operator needs are decoded.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ZoneSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

/// How a record set in a PATCH request is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Replace all records of the name/type pair with the supplied ones.
    Replace,
    /// Remove all records of the name/type pair.
    Delete,
}

/// A single record inside an RRset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub content: String,
    pub disabled: bool,
}

/// Record set change sent in a zone PATCH.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RRSetChange {
    /// Canonical (trailing dot) record name
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub changetype: ChangeType,
    /// Always present for REPLACE, even when empty; omitted for DELETE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
}

/// Body of `PATCH /servers/{server_id}/zones/{zone_id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ZonePatch {
    pub rrsets: Vec<RRSetChange>,
}
