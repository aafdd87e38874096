// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hosted zone resolution for record requests.
//!
//! A record is written to, in order of precedence:
//!
//! 1. the zone set explicitly on the request
//! 2. the zone recorded in the status by an earlier reconciliation
//! 3. the hosted zone whose name is the longest dot-boundary suffix of the
//!    record name (or equal to it)
//!
//! Only the last step needs the live zone listing, see [`pinned_zone`].

use super::actuator::RecordRequest;
use crate::dns_errors::ZoneError;
use std::collections::HashMap;

/// Zone id fixed by the request itself, without consulting PowerDNS.
#[must_use]
pub fn pinned_zone(request: &RecordRequest) -> Option<&str> {
    request
        .zone
        .as_deref()
        .filter(|zone| !zone.is_empty())
        .or_else(|| request.resolved_zone.as_deref().filter(|zone| !zone.is_empty()))
}

/// Resolve the zone id a request is written to.
///
/// `zones` maps normalized zone names to zone ids and is only consulted when
/// no zone is pinned.
///
/// # Errors
///
/// Returns [`ZoneError::ZoneNotFound`] if no hosted zone contains the record name.
pub fn resolve_zone(
    request: &RecordRequest,
    zones: &HashMap<String, String>,
) -> Result<String, ZoneError> {
    if let Some(zone) = pinned_zone(request) {
        return Ok(zone.to_string());
    }

    find_zone_for_name(zones, &request.name)
        .map(str::to_string)
        .ok_or_else(|| ZoneError::ZoneNotFound {
            name: request.name.clone(),
        })
}

/// Find the id of the most specific hosted zone containing `name`.
///
/// A zone matches when it equals `name` or when `name` ends with `"." + zone`.
/// The longest matching zone name wins. A trailing dot on `name` and ASCII case
/// are ignored.
#[must_use]
pub fn find_zone_for_name<'a>(zones: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    let name = name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase();

    zones
        .iter()
        .filter(|(zone_name, _)| is_in_zone(&name, &zone_name.to_ascii_lowercase()))
        // equal lengths only happen for names differing in case; keep the pick stable
        .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
        .map(|(_, id)| id.as_str())
}

fn is_in_zone(name: &str, zone_name: &str) -> bool {
    if zone_name.is_empty() {
        return false;
    }
    name == zone_name
        || name
            .strip_suffix(zone_name)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
