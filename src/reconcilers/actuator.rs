// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record actuator: applies one record request to PowerDNS.
//!
//! The actuator is independent of Kubernetes. It receives a [`RecordRequest`],
//! reads the credentials through a [`SecretStore`], builds a PowerDNS client
//! through a [`PowerDnsClientFactory`] and performs the operation selected by
//! the [`Trigger`]:
//!
//! | Trigger | Effect |
//! |---------|--------|
//! | `Reconcile`, `Restore` | replace the record set, remove the legacy meta record on first reconciliation |
//! | `Delete` | delete the record set |
//! | `Migrate` | nothing, PowerDNS is not contacted |
//!
//! Every step is attempted once; the first failure aborts the operation and is
//! returned with the zone, name and type being processed.

use super::meta_record::MetaRecordNaming;
use super::zones::{pinned_zone, resolve_zone};
use crate::constants::DEFAULT_DNS_RECORD_TTL_SECS;
use crate::context::OperationContext;
use crate::crd::{DNSRecord, LastOperationState, LastOperationType, RecordType, SecretReference};
use crate::credentials::{resolve_credentials, SecretStore};
use crate::dns_errors::ReconcileError;
use crate::powerdns::{PowerDnsApi, PowerDnsClientFactory};
use kube::ResourceExt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle event driving an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Reconcile,
    Delete,
    Restore,
    Migrate,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reconcile => "reconcile",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::Migrate => "migrate",
        })
    }
}

/// Desired state of one record set plus what earlier operations recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordRequest {
    pub name: String,
    pub record_type: RecordType,
    pub values: Vec<String>,
    /// TTL in seconds; the actuator default applies when `None`
    pub ttl: Option<i64>,
    /// Zone id set explicitly by the user
    pub zone: Option<String>,
    /// Zone id recorded by a previous reconciliation
    pub resolved_zone: Option<String>,
    pub last_operation: Option<LastOperationType>,
    pub last_operation_state: Option<LastOperationState>,
    /// Credentials secret; `namespace` is always set
    pub secret_ref: SecretReference,
}

impl RecordRequest {
    /// Build a request from a `DNSRecord`.
    ///
    /// The secret namespace defaults to the namespace of the record.
    #[must_use]
    pub fn from_resource(record: &DNSRecord) -> Self {
        let status = record.status.as_ref();
        let secret_namespace = record
            .spec
            .secret_ref
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .or_else(|| record.namespace())
            .unwrap_or_default();

        Self {
            name: record.spec.name.clone(),
            record_type: record.spec.record_type,
            values: record.spec.values.clone(),
            ttl: record.spec.ttl,
            zone: record.spec.zone.clone(),
            resolved_zone: status.and_then(|s| s.zone.clone()),
            last_operation: status
                .and_then(|s| s.last_operation.as_ref())
                .map(|op| op.r#type),
            last_operation_state: status
                .and_then(|s| s.last_operation.as_ref())
                .map(|op| op.state),
            secret_ref: SecretReference {
                name: record.spec.secret_ref.name.clone(),
                namespace: Some(secret_namespace),
            },
        }
    }

    /// True until the first `Create` operation succeeded.
    #[must_use]
    pub fn is_first_reconciliation(&self) -> bool {
        match self.last_operation {
            None => true,
            Some(LastOperationType::Create) => {
                self.last_operation_state != Some(LastOperationState::Succeeded)
            }
            Some(_) => false,
        }
    }
}

/// Outcome of a successful reconcile or restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Zone id the record was written to
    pub zone: String,
}

/// Applies record requests to PowerDNS.
pub struct RecordActuator {
    secrets: Arc<dyn SecretStore>,
    clients: Arc<dyn PowerDnsClientFactory>,
    default_ttl: i64,
    meta_record_naming: MetaRecordNaming,
}

impl RecordActuator {
    #[must_use]
    pub fn new(secrets: Arc<dyn SecretStore>, clients: Arc<dyn PowerDnsClientFactory>) -> Self {
        Self {
            secrets,
            clients,
            default_ttl: DEFAULT_DNS_RECORD_TTL_SECS,
            meta_record_naming: MetaRecordNaming::default(),
        }
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: i64) -> Self {
        self.default_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_meta_record_naming(mut self, naming: MetaRecordNaming) -> Self {
        self.meta_record_naming = naming;
        self
    }

    /// Run the operation selected by `trigger`.
    ///
    /// Returns the reconcile result for `Reconcile` and `Restore`, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Propagates the error of the selected operation.
    pub async fn execute(
        &self,
        trigger: Trigger,
        ctx: &OperationContext,
        request: &RecordRequest,
    ) -> Result<Option<ReconcileResult>, ReconcileError> {
        match trigger {
            Trigger::Reconcile => self.reconcile(ctx, request).await.map(Some),
            Trigger::Restore => self.restore(ctx, request).await.map(Some),
            Trigger::Delete => self.delete(ctx, request).await.map(|()| None),
            Trigger::Migrate => self.migrate(ctx, request).await.map(|()| None),
        }
    }

    /// Create or update the record set.
    ///
    /// On the first reconciliation the legacy meta `TXT` record is deleted from
    /// the same zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the TTL is out of range, the credentials cannot be
    /// read, no zone matches, or a PowerDNS call fails.
    pub async fn reconcile(
        &self,
        ctx: &OperationContext,
        request: &RecordRequest,
    ) -> Result<ReconcileResult, ReconcileError> {
        let ttl = self.effective_ttl(request)?;
        let client = self.connect(ctx, request).await?;
        let zone = self.zone_for(ctx, client.as_ref(), request).await?;

        debug!(
            zone = %zone,
            name = %request.name,
            record_type = %request.record_type,
            ttl,
            "Upserting record set"
        );

        client
            .upsert_record_set(
                ctx,
                &zone,
                &request.name,
                request.record_type,
                &request.values,
                ttl,
            )
            .await
            .map_err(|source| ReconcileError::UpsertRecordSet {
                zone: zone.clone(),
                name: request.name.clone(),
                record_type: request.record_type.to_string(),
                values: request.values.clone(),
                source,
            })?;

        if request.is_first_reconciliation() {
            self.delete_meta_record(ctx, client.as_ref(), &zone, &request.name)
                .await?;
        }

        info!(zone = %zone, name = %request.name, record_type = %request.record_type, "Record set reconciled");
        Ok(ReconcileResult { zone })
    }

    /// Restore behaves exactly like [`Self::reconcile`].
    ///
    /// # Errors
    ///
    /// See [`Self::reconcile`].
    pub async fn restore(
        &self,
        ctx: &OperationContext,
        request: &RecordRequest,
    ) -> Result<ReconcileResult, ReconcileError> {
        self.reconcile(ctx, request).await
    }

    /// Delete the record set. Deleting an absent record set succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be read, no zone matches, or
    /// the PowerDNS call fails.
    pub async fn delete(
        &self,
        ctx: &OperationContext,
        request: &RecordRequest,
    ) -> Result<(), ReconcileError> {
        let client = self.connect(ctx, request).await?;
        let zone = self.zone_for(ctx, client.as_ref(), request).await?;

        client
            .delete_record_set(ctx, &zone, &request.name, request.record_type)
            .await
            .map_err(|source| ReconcileError::DeleteRecordSet {
                zone: zone.clone(),
                name: request.name.clone(),
                record_type: request.record_type.to_string(),
                values: request.values.clone(),
                source,
            })?;

        info!(zone = %zone, name = %request.name, record_type = %request.record_type, "Record set deleted");
        Ok(())
    }

    /// Hand the record over to another controller instance. PowerDNS is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other operations.
    #[allow(clippy::unused_async)]
    pub async fn migrate(
        &self,
        _ctx: &OperationContext,
        request: &RecordRequest,
    ) -> Result<(), ReconcileError> {
        info!(name = %request.name, record_type = %request.record_type, "Record migrated, PowerDNS not contacted");
        Ok(())
    }

    fn effective_ttl(&self, request: &RecordRequest) -> Result<u32, ReconcileError> {
        let ttl = request.ttl.unwrap_or(self.default_ttl);
        u32::try_from(ttl).map_err(|_| ReconcileError::InvalidTtl {
            name: request.name.clone(),
            ttl,
        })
    }

    async fn connect(
        &self,
        ctx: &OperationContext,
        request: &RecordRequest,
    ) -> Result<Arc<dyn PowerDnsApi>, ReconcileError> {
        let data = self.secrets.get(ctx, &request.secret_ref).await?;
        let credentials = resolve_credentials(&data)?;
        self.clients
            .create(&credentials)
            .map_err(ReconcileError::ClientSetup)
    }

    async fn zone_for(
        &self,
        ctx: &OperationContext,
        client: &dyn PowerDnsApi,
        request: &RecordRequest,
    ) -> Result<String, ReconcileError> {
        if let Some(zone) = pinned_zone(request) {
            return Ok(zone.to_string());
        }

        let zones = client
            .list_hosted_zones(ctx)
            .await
            .map_err(ReconcileError::ListZones)?;
        let zone = resolve_zone(request, &zones)?;
        debug!(name = %request.name, zone = %zone, "Resolved hosted zone");
        Ok(zone)
    }

    async fn delete_meta_record(
        &self,
        ctx: &OperationContext,
        client: &dyn PowerDnsApi,
        zone: &str,
        name: &str,
    ) -> Result<(), ReconcileError> {
        let Some(meta_name) = self.meta_record_naming.meta_record_name(name) else {
            return Ok(());
        };

        debug!(zone = %zone, name = %meta_name, "Deleting legacy meta record");

        client
            .delete_record_set(ctx, zone, &meta_name, RecordType::TXT)
            .await
            .map_err(|source| ReconcileError::DeleteMetaRecordSet {
                zone: zone.to_string(),
                name: meta_name,
                source,
            })
    }
}
