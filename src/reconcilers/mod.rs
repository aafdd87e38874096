// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of `DNSRecord` resources against PowerDNS.
//!
//! # Reconciliation Architecture
//!
//! 1. **Watch** - `kube::runtime::Controller` delivers `DNSRecord` changes
//! 2. **Trigger** - [`dnsrecord::determine_trigger`] selects reconcile, delete,
//!    restore or migrate
//! 3. **Actuate** - [`RecordActuator`] reads the credentials, resolves the zone
//!    and writes or deletes the record set
//! 4. **Status** - the resolved zone and the outcome are written back
//!
//! The actuator and the zone resolver have no Kubernetes dependency and can be
//! driven directly:
//!
//! ```rust,no_run
//! use powerdns_operator::context::OperationContext;
//! use powerdns_operator::credentials::StaticSecretStore;
//! use powerdns_operator::crd::{RecordType, SecretReference};
//! use powerdns_operator::powerdns::HttpClientFactory;
//! use powerdns_operator::reconcilers::{RecordActuator, RecordRequest};
//! use std::sync::Arc;
//!
//! # async fn example(secrets: StaticSecretStore) -> anyhow::Result<()> {
//! let actuator = RecordActuator::new(Arc::new(secrets), Arc::new(HttpClientFactory::default()));
//! let request = RecordRequest {
//!     name: "www.example.com".to_string(),
//!     record_type: RecordType::A,
//!     values: vec!["192.0.2.1".to_string()],
//!     ttl: None,
//!     zone: None,
//!     resolved_zone: None,
//!     last_operation: None,
//!     last_operation_state: None,
//!     secret_ref: SecretReference {
//!         name: "powerdns-credentials".to_string(),
//!         namespace: Some("dns-system".to_string()),
//!     },
//! };
//! let result = actuator.reconcile(&OperationContext::new(), &request).await?;
//! println!("written to zone {}", result.zone);
//! # Ok(())
//! # }
//! ```

pub mod actuator;
pub mod dnsrecord;
pub mod finalizers;
pub mod meta_record;
pub mod status;
pub mod zones;

#[cfg(test)]
mod actuator_tests;
#[cfg(test)]
mod meta_record_tests;

pub use actuator::{RecordActuator, RecordRequest, ReconcileResult, Trigger};
pub use dnsrecord::{determine_trigger, reconcile_dnsrecord, requeue_after_error};
pub use meta_record::MetaRecordNaming;
pub use zones::{find_zone_for_name, pinned_zone, resolve_zone};
