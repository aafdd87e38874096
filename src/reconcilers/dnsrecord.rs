// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `DNSRecord` reconciliation.
//!
//! Maps the lifecycle of a `DNSRecord` onto the [`RecordActuator`]:
//!
//! - a deletion timestamp selects [`Trigger::Delete`]; the finalizer is removed
//!   once the record set is gone
//! - the annotation `powerdns.firestoned.io/operation` with value `migrate` or
//!   `restore` selects [`Trigger::Migrate`] or [`Trigger::Restore`]; the
//!   annotation is cleared after a successful run
//! - anything else selects [`Trigger::Reconcile`]
//!
//! The outcome is written to the status: resolved zone, last operation, last
//! error and the `Ready` condition.

use super::actuator::{RecordRequest, Trigger};
use super::finalizers::{ensure_finalizer, has_finalizer, remove_finalizer};
use super::status::DNSRecordStatusUpdater;
use crate::config::OperatorConfig;
use crate::constants::KIND_DNS_RECORD;
use crate::context::Context;
use crate::crd::{DNSRecord, DNSRecordStatus, LastOperationState, LastOperationType};
use crate::dns_errors::ReconcileError;
use crate::labels::{
    DNSRECORD_FINALIZER, OPERATION_ANNOTATION, OPERATION_MIGRATE, OPERATION_RESTORE,
};
use crate::metrics;
use crate::status_reasons::{
    CONDITION_STATUS_FALSE, CONDITION_STATUS_TRUE, CONDITION_TYPE_READY, REASON_RECORD_MIGRATED,
    REASON_RECORD_READY,
};
use anyhow::{Context as _, Result};
use kube::api::{Patch, PatchParams};
use kube::runtime::controller::Action;
use kube::{Api, ResourceExt};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Select the trigger for the current state of `record`.
#[must_use]
pub fn determine_trigger(record: &DNSRecord) -> Trigger {
    if record.metadata.deletion_timestamp.is_some() {
        return Trigger::Delete;
    }

    match record
        .annotations()
        .get(OPERATION_ANNOTATION)
        .map(|value| value.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some(OPERATION_MIGRATE) => Trigger::Migrate,
        Some(OPERATION_RESTORE) => Trigger::Restore,
        _ => Trigger::Reconcile,
    }
}

/// Operation type reported in `status.lastOperation` for `trigger`.
///
/// A record stays in `Create` until its first reconciliation succeeded.
#[must_use]
pub fn operation_type(trigger: Trigger, status: Option<&DNSRecordStatus>) -> LastOperationType {
    match trigger {
        Trigger::Delete => LastOperationType::Delete,
        Trigger::Migrate => LastOperationType::Migrate,
        Trigger::Restore => LastOperationType::Restore,
        Trigger::Reconcile => match status.and_then(|s| s.last_operation.as_ref()) {
            None => LastOperationType::Create,
            Some(op)
                if op.r#type == LastOperationType::Create
                    && op.state != LastOperationState::Succeeded =>
            {
                LastOperationType::Create
            }
            Some(_) => LastOperationType::Reconcile,
        },
    }
}

/// Requeue delay after a failed reconciliation.
///
/// Problems the user has to fix are retried with the long interval.
#[must_use]
pub fn requeue_after_error(config: &OperatorConfig, error: &anyhow::Error) -> Duration {
    match error.downcast_ref::<ReconcileError>() {
        Some(e) if e.is_configuration_problem() => config.config_error_requeue(),
        _ => config.error_requeue(),
    }
}

/// Reconcile a `DNSRecord`.
///
/// # Errors
///
/// Returns an error if the PowerDNS operation fails or the resource cannot be
/// patched. A failing operation is also recorded in the status.
pub async fn reconcile_dnsrecord(record: Arc<DNSRecord>, ctx: Arc<Context>) -> Result<Action> {
    let started = Instant::now();
    let trigger = determine_trigger(&record);
    let namespace = record.namespace().unwrap_or_default();
    let name = record.name_any();

    debug!(namespace = %namespace, name = %name, trigger = %trigger, "Reconciling DNSRecord");

    let result = match trigger {
        Trigger::Delete => handle_delete(&record, &ctx).await,
        Trigger::Migrate => handle_migrate(&record, &ctx).await,
        Trigger::Reconcile | Trigger::Restore => handle_reconcile(&record, &ctx, trigger).await,
    };

    match &result {
        Ok(_) => metrics::record_reconciliation_success(KIND_DNS_RECORD, started.elapsed()),
        Err(e) => {
            warn!(namespace = %namespace, name = %name, trigger = %trigger, error = %e, "DNSRecord operation failed");
            metrics::record_reconciliation_error(KIND_DNS_RECORD, started.elapsed());
        }
    }

    result
}

async fn handle_reconcile(record: &DNSRecord, ctx: &Context, trigger: Trigger) -> Result<Action> {
    ensure_finalizer(&ctx.client, record, DNSRECORD_FINALIZER)
        .await
        .context("failed to add finalizer")?;

    let request = RecordRequest::from_resource(record);
    let operation = operation_type(trigger, record.status.as_ref());
    let op_ctx = ctx.operation();

    let outcome = ctx.actuator.execute(trigger, &op_ctx, &request).await;

    let mut status = DNSRecordStatusUpdater::new(record);
    status.set_observed_generation(record.metadata.generation);

    match outcome {
        Ok(result) => {
            if let Some(result) = result {
                status.set_zone(&result.zone);
            }
            status.set_last_operation(
                operation,
                LastOperationState::Succeeded,
                "DNS record has been successfully reconciled",
            );
            status.clear_last_error();
            status.set_condition(
                CONDITION_TYPE_READY,
                CONDITION_STATUS_TRUE,
                REASON_RECORD_READY,
                "Record set is in sync with PowerDNS",
            );
            status
                .apply(&ctx.client)
                .await
                .context("failed to update DNSRecord status")?;

            if trigger == Trigger::Restore {
                clear_operation_annotation(record, ctx).await?;
            }

            Ok(Action::requeue(ctx.config.requeue_interval()))
        }
        Err(e) => {
            record_failure(&mut status, operation, &e);
            if let Err(status_err) = status.apply(&ctx.client).await {
                warn!(error = %status_err, "Failed to record DNSRecord error in status");
            }
            Err(e.into())
        }
    }
}

async fn handle_delete(record: &DNSRecord, ctx: &Context) -> Result<Action> {
    if !has_finalizer(record, DNSRECORD_FINALIZER) {
        return Ok(Action::await_change());
    }

    let request = RecordRequest::from_resource(record);
    let op_ctx = ctx.operation();

    if let Err(e) = ctx.actuator.delete(&op_ctx, &request).await {
        let mut status = DNSRecordStatusUpdater::new(record);
        record_failure(&mut status, LastOperationType::Delete, &e);
        if let Err(status_err) = status.apply(&ctx.client).await {
            warn!(error = %status_err, "Failed to record DNSRecord error in status");
        }
        return Err(e.into());
    }

    metrics::record_resource_deleted(KIND_DNS_RECORD);
    remove_finalizer(&ctx.client, record, DNSRECORD_FINALIZER)
        .await
        .context("failed to remove finalizer")?;

    Ok(Action::await_change())
}

/// Release the record without touching PowerDNS.
///
/// The finalizer is dropped so that the resource can be removed from this
/// cluster while the record set stays in place for the new owner.
async fn handle_migrate(record: &DNSRecord, ctx: &Context) -> Result<Action> {
    let request = RecordRequest::from_resource(record);
    ctx.actuator.migrate(&ctx.operation(), &request).await?;

    let mut status = DNSRecordStatusUpdater::new(record);
    status.set_observed_generation(record.metadata.generation);
    status.set_last_operation(
        LastOperationType::Migrate,
        LastOperationState::Succeeded,
        "DNS record has been migrated",
    );
    status.clear_last_error();
    status.set_condition(
        CONDITION_TYPE_READY,
        CONDITION_STATUS_TRUE,
        REASON_RECORD_MIGRATED,
        "Record handed over, PowerDNS left untouched",
    );
    status
        .apply(&ctx.client)
        .await
        .context("failed to update DNSRecord status")?;

    remove_finalizer(&ctx.client, record, DNSRECORD_FINALIZER)
        .await
        .context("failed to remove finalizer")?;
    clear_operation_annotation(record, ctx).await?;

    info!(namespace = ?record.namespace(), name = %record.name_any(), "DNSRecord migrated");
    Ok(Action::await_change())
}

fn record_failure(
    status: &mut DNSRecordStatusUpdater,
    operation: LastOperationType,
    error: &ReconcileError,
) {
    let code = error.error_code();
    let description = error.to_string();

    metrics::record_error(KIND_DNS_RECORD, code.as_str());

    status.set_last_operation(operation, LastOperationState::Error, &description);
    status.set_last_error(&description, vec![code.to_string()]);
    status.set_condition(
        CONDITION_TYPE_READY,
        CONDITION_STATUS_FALSE,
        error.status_reason(),
        &description,
    );
}

async fn clear_operation_annotation(record: &DNSRecord, ctx: &Context) -> Result<()> {
    if !record.annotations().contains_key(OPERATION_ANNOTATION) {
        return Ok(());
    }

    let namespace = record.namespace().unwrap_or_default();
    let api: Api<DNSRecord> = Api::namespaced(ctx.client.clone(), &namespace);
    let patch = json!({ "metadata": { "annotations": { OPERATION_ANNOTATION: null } } });
    api.patch(&record.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await
        .context("failed to clear operation annotation")?;

    Ok(())
}
