// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status_reasons` module

#[cfg(test)]
mod tests {
    use crate::status_reasons::*;

    #[test]
    fn test_condition_constants() {
        assert_eq!(CONDITION_TYPE_READY, "Ready");
        assert_eq!(CONDITION_STATUS_TRUE, "True");
        assert_eq!(CONDITION_STATUS_FALSE, "False");
    }

    #[test]
    fn test_powerdns_reasons() {
        assert_eq!(REASON_POWERDNS_AUTH_FAILED, "PowerDnsAuthFailed");
        assert_eq!(REASON_POWERDNS_BAD_REQUEST, "PowerDnsBadRequest");
        assert_eq!(REASON_POWERDNS_INTERNAL_ERROR, "PowerDnsInternalError");
        assert_eq!(REASON_POWERDNS_UNREACHABLE, "PowerDnsUnreachable");
    }

    #[test]
    fn test_reasons_are_camel_case() {
        let reasons = [
            REASON_RECORD_READY,
            REASON_RECORD_MIGRATED,
            REASON_ZONE_NOT_FOUND,
            REASON_SECRET_NOT_FOUND,
            REASON_CREDENTIALS_INVALID,
            REASON_TLS_CONFIGURATION_INVALID,
            REASON_INVALID_RECORD,
            REASON_POWERDNS_BAD_REQUEST,
            REASON_POWERDNS_AUTH_FAILED,
            REASON_SECRET_UNAVAILABLE,
            REASON_POWERDNS_UNREACHABLE,
            REASON_POWERDNS_INTERNAL_ERROR,
            REASON_POWERDNS_INVALID_RESPONSE,
            REASON_OPERATION_CANCELLED,
        ];

        for reason in reasons {
            assert!(
                reason.chars().next().is_some_and(|c| c.is_ascii_uppercase()),
                "{reason} should start with an upper-case letter"
            );
            assert!(
                reason.chars().all(|c| c.is_ascii_alphanumeric()),
                "{reason} should not contain separators"
            );
        }
    }

    #[test]
    fn test_reasons_are_unique() {
        let reasons = [
            REASON_RECORD_READY,
            REASON_RECORD_MIGRATED,
            REASON_ZONE_NOT_FOUND,
            REASON_SECRET_NOT_FOUND,
            REASON_CREDENTIALS_INVALID,
            REASON_TLS_CONFIGURATION_INVALID,
            REASON_INVALID_RECORD,
            REASON_POWERDNS_BAD_REQUEST,
            REASON_POWERDNS_AUTH_FAILED,
            REASON_SECRET_UNAVAILABLE,
            REASON_POWERDNS_UNREACHABLE,
            REASON_POWERDNS_INTERNAL_ERROR,
            REASON_POWERDNS_INVALID_RESPONSE,
            REASON_OPERATION_CANCELLED,
        ];
        let unique: std::collections::HashSet<_> = reasons.iter().collect();
        assert_eq!(unique.len(), reasons.len());
    }
}
