// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition helpers for Kubernetes resources.
//!
//! This module provides utility functions for creating and managing Kubernetes
//! status conditions following the standard conventions, and the
//! [`DNSRecordStatusUpdater`] that writes a `DNSRecord` status in one patch.
//!
//! # Condition Format
//!
//! Kubernetes conditions follow a standard format:
//! - `type`: The aspect of the resource being reported (e.g., "Ready")
//! - `status`: "True", "False", or "Unknown"
//! - `reason`: A programmatic identifier (CamelCase)
//! - `message`: A human-readable explanation
//! - `lastTransitionTime`: RFC3339 timestamp when the condition changed
//!
//! # Example
//!
//! ```rust,no_run
//! use powerdns_operator::reconcilers::status::create_condition;
//!
//! let condition = create_condition(
//!     "Ready",
//!     "True",
//!     "RecordReady",
//!     "Record set is in sync"
//! );
//! ```

use crate::crd::{
    Condition, DNSRecord, DNSRecordStatus, LastError, LastOperation, LastOperationState,
    LastOperationType,
};
use anyhow::Result;
use chrono::Utc;
use kube::api::Patch;
use kube::{api::PatchParams, Api, Client, ResourceExt};
use serde_json::json;
use tracing::debug;

/// Create a new Kubernetes condition with the current timestamp.
///
/// # Arguments
///
/// * `condition_type` - The type of condition (e.g., "Ready")
/// * `status` - The status: "True", "False", or "Unknown"
/// * `reason` - A programmatic identifier in `CamelCase` (e.g., "`RecordReady`")
/// * `message` - A human-readable explanation
///
/// # Example
///
/// ```rust
/// # use powerdns_operator::reconcilers::status::create_condition;
/// let condition = create_condition("Ready", "True", "RecordReady", "Record set is in sync");
/// assert_eq!(condition.r#type, "Ready");
/// assert_eq!(condition.status, "True");
/// ```
#[must_use]
pub fn create_condition(
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status: status.to_string(),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        last_transition_time: Some(Utc::now().to_rfc3339()),
    }
}

/// Find a condition by type in a list of conditions.
#[must_use]
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == condition_type)
}

/// Update or add a condition in a mutable conditions list (in-memory, no API call).
///
/// The `lastTransitionTime` is preserved when the status does not change.
pub fn update_condition_in_memory(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.r#type == condition_type) {
        let last_transition_time = if existing.status == status {
            existing
                .last_transition_time
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339())
        } else {
            Utc::now().to_rfc3339()
        };

        existing.status = status.to_string();
        existing.reason = Some(reason.to_string());
        existing.message = Some(message.to_string());
        existing.last_transition_time = Some(last_transition_time);
    } else {
        conditions.push(create_condition(condition_type, status, reason, message));
    }
}

/// Compare two condition lists ignoring `lastTransitionTime`.
#[must_use]
pub fn conditions_equal(current: &[Condition], new: &[Condition]) -> bool {
    if current.len() != new.len() {
        return false;
    }

    new.iter().all(|new_cond| {
        current.iter().any(|curr_cond| {
            curr_cond.r#type == new_cond.r#type
                && curr_cond.status == new_cond.status
                && curr_cond.reason == new_cond.reason
                && curr_cond.message == new_cond.message
        })
    })
}

fn last_operation_equal(current: Option<&LastOperation>, new: Option<&LastOperation>) -> bool {
    match (current, new) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.r#type == b.r#type && a.state == b.state && a.description == b.description
        }
        _ => false,
    }
}

fn last_error_equal(current: Option<&LastError>, new: Option<&LastError>) -> bool {
    match (current, new) {
        (None, None) => true,
        (Some(a), Some(b)) => a.description == b.description && a.codes == b.codes,
        _ => false,
    }
}

/// Collects `DNSRecord` status changes and applies them in a single patch.
///
/// Timestamps are ignored when deciding whether anything changed, so that
/// a reconciliation producing the same outcome does not write the status (and
/// trigger another reconciliation).
pub struct DNSRecordStatusUpdater {
    namespace: String,
    name: String,
    current_status: Option<DNSRecordStatus>,
    new_status: DNSRecordStatus,
}

impl DNSRecordStatusUpdater {
    /// Create a new status updater starting from the current status of `record`.
    #[must_use]
    pub fn new(record: &DNSRecord) -> Self {
        let current_status = record.status.clone();
        let new_status = current_status.clone().unwrap_or_default();

        Self {
            namespace: record.namespace().unwrap_or_default(),
            name: record.name_any(),
            current_status,
            new_status,
        }
    }

    pub fn set_condition(
        &mut self,
        condition_type: &str,
        status: &str,
        reason: &str,
        message: &str,
    ) {
        update_condition_in_memory(
            &mut self.new_status.conditions,
            condition_type,
            status,
            reason,
            message,
        );
    }

    pub fn set_zone(&mut self, zone: &str) {
        self.new_status.zone = Some(zone.to_string());
    }

    pub fn set_observed_generation(&mut self, generation: Option<i64>) {
        self.new_status.observed_generation = generation;
    }

    pub fn set_last_operation(
        &mut self,
        operation: LastOperationType,
        state: LastOperationState,
        description: &str,
    ) {
        self.new_status.last_operation = Some(LastOperation {
            r#type: operation,
            state,
            description: description.to_string(),
            last_update_time: Utc::now().to_rfc3339(),
        });
    }

    pub fn set_last_error(&mut self, description: &str, codes: Vec<String>) {
        self.new_status.last_error = Some(LastError {
            description: description.to_string(),
            codes,
            last_update_time: Utc::now().to_rfc3339(),
        });
    }

    pub fn clear_last_error(&mut self) {
        self.new_status.last_error = None;
    }

    /// The status that [`Self::apply`] would write.
    #[must_use]
    pub fn status(&self) -> &DNSRecordStatus {
        &self.new_status
    }

    /// Check if the status differs semantically from the current status.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match &self.current_status {
            None => true,
            Some(current) => {
                current.zone != self.new_status.zone
                    || current.observed_generation != self.new_status.observed_generation
                    || !conditions_equal(&current.conditions, &self.new_status.conditions)
                    || !last_operation_equal(
                        current.last_operation.as_ref(),
                        self.new_status.last_operation.as_ref(),
                    )
                    || !last_error_equal(
                        current.last_error.as_ref(),
                        self.new_status.last_error.as_ref(),
                    )
            }
        }
    }

    /// Apply the collected status changes to Kubernetes (single API call).
    ///
    /// Skips the call when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the Kubernetes API call fails.
    pub async fn apply(&self, client: &Client) -> Result<()> {
        if !self.has_changes() {
            debug!(
                "DNSRecord {}/{} status unchanged, skipping update",
                self.namespace, self.name
            );
            return Ok(());
        }

        let api: Api<DNSRecord> = Api::namespaced(client.clone(), &self.namespace);

        // lastError is cleared explicitly; a merge patch ignores absent fields
        let mut status = serde_json::to_value(&self.new_status)?;
        if self.new_status.last_error.is_none() {
            status["lastError"] = serde_json::Value::Null;
        }
        let patch = json!({ "status": status });

        api.patch_status(&self.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        debug!(
            "Updated DNSRecord {}/{} status: {} condition(s), zone {:?}",
            self.namespace,
            self.name,
            self.new_status.conditions.len(),
            self.new_status.zone
        );

        Ok(())
    }
}
