// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Annotation and finalizer constants used by the reconcilers.

// ============================================================================
// Operator Annotations
// ============================================================================

/// Annotation requesting a one-shot lifecycle operation on a `DNSRecord`.
///
/// Accepted values are [`OPERATION_MIGRATE`] and [`OPERATION_RESTORE`]. The
/// annotation is removed once the operation completed.
pub const OPERATION_ANNOTATION: &str = "powerdns.firestoned.io/operation";

/// Hand the record over to another controller instance without touching PowerDNS
pub const OPERATION_MIGRATE: &str = "migrate";

/// Re-create the record after a migration
pub const OPERATION_RESTORE: &str = "restore";

// ============================================================================
// Finalizers
// ============================================================================

/// Finalizer guarding removal of the RRset before a `DNSRecord` disappears
pub const DNSRECORD_FINALIZER: &str = "powerdns.firestoned.io/dnsrecord";
