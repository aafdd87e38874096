// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `dns_errors.rs`

#[cfg(test)]
mod tests {
    use crate::context::CancellationError;
    use crate::dns_errors::*;
    use crate::status_reasons::*;

    fn transport_error() -> PowerDnsError {
        PowerDnsError::Transport {
            endpoint: "http://pdns:8081/api/v1/servers/localhost/zones".to_string(),
            reason: "connection refused".to_string(),
        }
    }

    // ============================================================================
    // PowerDnsError
    // ============================================================================

    #[test]
    fn test_powerdns_error_transient_classification() {
        assert!(transport_error().is_transient());
        assert!(PowerDnsError::Server {
            status: 500,
            message: "boom".to_string()
        }
        .is_transient());
        assert!(PowerDnsError::Cancelled(CancellationError::DeadlineExceeded).is_transient());

        assert!(!PowerDnsError::Auth {
            status: 401,
            message: "Unauthorized".to_string()
        }
        .is_transient());
        assert!(!PowerDnsError::Rejected {
            status: 422,
            message: "bad".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_auth_is_not_a_configuration_problem() {
        let err = PowerDnsError::Auth {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert!(!err.is_configuration_problem());
        assert_eq!(err.status_reason(), REASON_POWERDNS_AUTH_FAILED);
    }

    #[test]
    fn test_tls_configuration_error() {
        let err = PowerDnsError::TlsConfiguration {
            reason: "no certificate".to_string(),
        };
        assert!(err.is_configuration_problem());
        assert_eq!(err.status_reason(), REASON_TLS_CONFIGURATION_INVALID);
    }

    // ============================================================================
    // CredentialError
    // ============================================================================

    #[test]
    fn test_credential_error_messages() {
        assert_eq!(
            CredentialError::MissingField { field: "apiKey" }.to_string(),
            "missing \"apiKey\" field in secret"
        );
        assert_eq!(
            CredentialError::EmptySecret.to_string(),
            "secret does not contain any data"
        );
    }

    // ============================================================================
    // ReconcileError
    // ============================================================================

    #[test]
    fn test_zone_not_found_is_configuration_problem() {
        let err = ReconcileError::from(ZoneError::ZoneNotFound {
            name: "www.unknown.org".to_string(),
        });

        assert!(err.is_configuration_problem());
        assert!(!err.is_transient());
        assert_eq!(err.error_code(), ErrorCode::ConfigurationProblem);
        assert_eq!(err.error_code().as_str(), "ERR_CONFIGURATION_PROBLEM");
        assert_eq!(err.status_reason(), REASON_ZONE_NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "could not find DNS hosted zone for name www.unknown.org"
        );
    }

    #[test]
    fn test_credentials_error_is_configuration_problem() {
        let err = ReconcileError::from(CredentialError::MissingField { field: "server" });
        assert!(err.is_configuration_problem());
        assert_eq!(err.status_reason(), REASON_CREDENTIALS_INVALID);
        assert!(err.to_string().starts_with("could not create PowerDNS client"));
    }

    #[test]
    fn test_secret_not_found_vs_unavailable() {
        let not_found = ReconcileError::from(SecretStoreError::NotFound {
            namespace: "dns".to_string(),
            name: "pdns".to_string(),
        });
        assert!(not_found.is_configuration_problem());
        assert_eq!(not_found.status_reason(), REASON_SECRET_NOT_FOUND);

        let unavailable = ReconcileError::from(SecretStoreError::Unavailable {
            namespace: "dns".to_string(),
            name: "pdns".to_string(),
            reason: "apiserver timeout".to_string(),
        });
        assert!(!unavailable.is_configuration_problem());
        assert!(unavailable.is_transient());
        assert_eq!(unavailable.error_code(), ErrorCode::InfrastructureUnavailable);
    }

    #[test]
    fn test_upsert_error_carries_context() {
        let err = ReconcileError::UpsertRecordSet {
            zone: "example.com.".to_string(),
            name: "www.example.com".to_string(),
            record_type: "A".to_string(),
            values: vec!["1.2.3.4".to_string()],
            source: transport_error(),
        };

        let message = err.to_string();
        assert!(message.contains("example.com."));
        assert!(message.contains("www.example.com"));
        assert!(message.contains("type A"));
        assert!(message.contains("1.2.3.4"));
        assert!(err.is_transient());
        assert_eq!(err.error_code(), ErrorCode::InfrastructureUnavailable);
        assert_eq!(err.status_reason(), REASON_POWERDNS_UNREACHABLE);
    }

    #[test]
    fn test_auth_failure_has_unauthorized_code() {
        let err = ReconcileError::ListZones(PowerDnsError::Auth {
            status: 401,
            message: "Unauthorized".to_string(),
        });
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);
        assert_eq!(err.error_code().to_string(), "ERR_INFRA_UNAUTHORIZED");
        assert!(!err.is_configuration_problem());
    }

    #[test]
    fn test_cancelled_errors() {
        let from_secret = ReconcileError::from(SecretStoreError::Cancelled(
            CancellationError::Cancelled,
        ));
        assert!(from_secret.is_cancelled());
        assert_eq!(from_secret.error_code(), ErrorCode::Cancelled);
        assert_eq!(from_secret.status_reason(), REASON_OPERATION_CANCELLED);

        let from_delete = ReconcileError::DeleteRecordSet {
            zone: "z".to_string(),
            name: "n".to_string(),
            record_type: "TXT".to_string(),
            values: vec!["\"hello\"".to_string()],
            source: PowerDnsError::Cancelled(CancellationError::DeadlineExceeded),
        };
        assert!(from_delete.is_cancelled());
        assert_eq!(from_delete.error_code().as_str(), "ERR_CANCELLED");
    }

    #[test]
    fn test_delete_error_carries_values() {
        let err = ReconcileError::DeleteRecordSet {
            zone: "example.com.".to_string(),
            name: "www.example.com".to_string(),
            record_type: "A".to_string(),
            values: vec!["1.2.3.4".to_string(), "5.6.7.8".to_string()],
            source: transport_error(),
        };

        let message = err.to_string();
        assert!(message.starts_with("could not delete DNS recordset in zone example.com."));
        assert!(message.contains("type A"));
        assert!(message.contains("values [\"1.2.3.4\", \"5.6.7.8\"]"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_invalid_ttl() {
        let err = ReconcileError::InvalidTtl {
            name: "www.example.com".to_string(),
            ttl: -1,
        };
        assert!(err.is_configuration_problem());
        assert_eq!(err.status_reason(), REASON_INVALID_RECORD);
        assert!(err.to_string().contains("-1"));
    }
}
