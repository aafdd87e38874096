// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # PowerDNS Operator - DNS records in PowerDNS for Kubernetes
//!
//! The operator keeps resource record sets in a PowerDNS authoritative server in
//! sync with `DNSRecord` custom resources.
//!
//! ## Overview
//!
//! For each `DNSRecord` the operator:
//!
//! - reads the PowerDNS connection parameters from a referenced secret
//! - determines the hosted zone (explicit, previously resolved, or longest
//!   suffix match against the zones PowerDNS serves)
//! - replaces the record set through the PowerDNS HTTP API
//! - deletes the record set when the resource is deleted
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types
//! - [`credentials`] - Credential parsing and the secret store abstraction
//! - [`powerdns`] - PowerDNS HTTP API client adapter
//! - [`reconcilers`] - Zone resolution, record actuator and controller glue
//! - [`context`] - Controller context and per-operation cancellation
//! - [`config`] - Command line and environment configuration
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use powerdns_operator::crd::{DNSRecordSpec, RecordType, SecretReference};
//!
//! let spec = DNSRecordSpec {
//!     secret_ref: SecretReference {
//!         name: "powerdns-credentials".to_string(),
//!         namespace: None,
//!     },
//!     name: "mail.example.com".to_string(),
//!     record_type: RecordType::MX,
//!     values: vec!["10 mx1.example.com".to_string()],
//!     ttl: None,
//!     zone: None,
//! };
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod crd;
pub mod credentials;
pub mod dns_errors;
pub mod http_errors;
pub mod labels;
pub mod metrics;
pub mod powerdns;
pub mod reconcilers;
pub mod status_reasons;

#[cfg(test)]
mod dns_errors_tests;
#[cfg(test)]
mod status_reasons_tests;
