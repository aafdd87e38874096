// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the record actuator.
//!
//! PowerDNS is replaced by an in-memory fake that records every call.

#[cfg(test)]
mod tests {
    use crate::context::OperationContext;
    use crate::credentials::{ConnectionCredentials, SecretData, StaticSecretStore};
    use crate::crd::{
        DNSRecord, DNSRecordSpec, DNSRecordStatus, LastOperation, LastOperationState,
        LastOperationType, RecordType, SecretReference,
    };
    use crate::dns_errors::{
        CredentialError, PowerDnsError, ReconcileError, SecretStoreError, ZoneError,
    };
    use crate::powerdns::{PowerDnsApi, PowerDnsClientFactory};
    use crate::reconcilers::actuator::{RecordActuator, RecordRequest, ReconcileResult, Trigger};
    use crate::reconcilers::meta_record::MetaRecordNaming;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        ListZones,
        Upsert {
            zone: String,
            name: String,
            record_type: RecordType,
            values: Vec<String>,
            ttl: u32,
        },
        Delete {
            zone: String,
            name: String,
            record_type: RecordType,
        },
    }

    #[derive(Default)]
    struct FakePowerDns {
        zones: HashMap<String, String>,
        calls: Mutex<Vec<Call>>,
        fail_upsert: Option<PowerDnsError>,
        fail_delete: Option<PowerDnsError>,
    }

    impl FakePowerDns {
        fn with_zones(entries: &[(&str, &str)]) -> Self {
            Self {
                zones: entries
                    .iter()
                    .map(|(name, id)| ((*name).to_string(), (*id).to_string()))
                    .collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl PowerDnsApi for FakePowerDns {
        async fn list_hosted_zones(
            &self,
            _ctx: &OperationContext,
        ) -> Result<HashMap<String, String>, PowerDnsError> {
            self.record(Call::ListZones);
            Ok(self.zones.clone())
        }

        async fn upsert_record_set(
            &self,
            _ctx: &OperationContext,
            zone_id: &str,
            name: &str,
            record_type: RecordType,
            values: &[String],
            ttl: u32,
        ) -> Result<(), PowerDnsError> {
            self.record(Call::Upsert {
                zone: zone_id.to_string(),
                name: name.to_string(),
                record_type,
                values: values.to_vec(),
                ttl,
            });
            self.fail_upsert.clone().map_or(Ok(()), Err)
        }

        async fn delete_record_set(
            &self,
            _ctx: &OperationContext,
            zone_id: &str,
            name: &str,
            record_type: RecordType,
        ) -> Result<(), PowerDnsError> {
            self.record(Call::Delete {
                zone: zone_id.to_string(),
                name: name.to_string(),
                record_type,
            });
            self.fail_delete.clone().map_or(Ok(()), Err)
        }
    }

    /// Hands out the same fake and remembers the credentials it was given.
    struct FakeFactory {
        api: Arc<FakePowerDns>,
        seen: Mutex<Vec<ConnectionCredentials>>,
    }

    impl FakeFactory {
        fn new(api: Arc<FakePowerDns>) -> Self {
            Self {
                api,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl PowerDnsClientFactory for FakeFactory {
        fn create(
            &self,
            credentials: &ConnectionCredentials,
        ) -> Result<Arc<dyn PowerDnsApi>, PowerDnsError> {
            self.seen.lock().unwrap().push(credentials.clone());
            Ok(self.api.clone())
        }
    }

    fn secret() -> SecretData {
        [
            ("apiKey".to_string(), b"key".to_vec()),
            ("server".to_string(), b"http://pdns:8081".to_vec()),
        ]
        .into_iter()
        .collect()
    }

    fn store() -> Arc<StaticSecretStore> {
        Arc::new(StaticSecretStore::new().with_secret("default", "pdns", secret()))
    }

    fn request(name: &str) -> RecordRequest {
        RecordRequest {
            name: name.to_string(),
            record_type: RecordType::A,
            values: vec!["1.2.3.4".to_string()],
            ttl: None,
            zone: None,
            resolved_zone: None,
            last_operation: None,
            last_operation_state: None,
            secret_ref: SecretReference {
                name: "pdns".to_string(),
                namespace: Some("default".to_string()),
            },
        }
    }

    fn actuator(api: &Arc<FakePowerDns>) -> (RecordActuator, Arc<FakeFactory>) {
        let factory = Arc::new(FakeFactory::new(api.clone()));
        (RecordActuator::new(store(), factory.clone()), factory)
    }

    // ============================================================================
    // Reconcile
    // ============================================================================

    #[tokio::test]
    async fn test_reconcile_first_time() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, factory) = actuator(&api);

        let result = actuator
            .reconcile(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap();

        assert_eq!(
            result,
            ReconcileResult {
                zone: "zoneX".to_string()
            }
        );
        assert_eq!(
            api.calls(),
            vec![
                Call::ListZones,
                Call::Upsert {
                    zone: "zoneX".to_string(),
                    name: "www.example.com".to_string(),
                    record_type: RecordType::A,
                    values: vec!["1.2.3.4".to_string()],
                    ttl: 120,
                },
                Call::Delete {
                    zone: "zoneX".to_string(),
                    name: "comment-www.example.com".to_string(),
                    record_type: RecordType::TXT,
                },
            ]
        );

        let seen = factory.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].server, "http://pdns:8081");
        assert_eq!(seen[0].virtual_host, "localhost");
    }

    #[tokio::test]
    async fn test_reconcile_wildcard_meta_record() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);

        actuator
            .reconcile(&OperationContext::new(), &request("*.apps.example.com"))
            .await
            .unwrap();

        assert_eq!(
            api.calls().last(),
            Some(&Call::Delete {
                zone: "zoneX".to_string(),
                name: "*.comment-apps.example.com".to_string(),
                record_type: RecordType::TXT,
            })
        );
    }

    #[tokio::test]
    async fn test_reconcile_pinned_zone_skips_listing() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);

        let mut req = request("www.example.com");
        req.resolved_zone = Some("zoneY".to_string());
        req.last_operation = Some(LastOperationType::Reconcile);
        req.ttl = Some(300);

        let result = actuator
            .reconcile(&OperationContext::new(), &req)
            .await
            .unwrap();

        assert_eq!(result.zone, "zoneY");
        assert_eq!(
            api.calls(),
            vec![Call::Upsert {
                zone: "zoneY".to_string(),
                name: "www.example.com".to_string(),
                record_type: RecordType::A,
                values: vec!["1.2.3.4".to_string()],
                ttl: 300,
            }]
        );
    }

    #[tokio::test]
    async fn test_reconcile_after_failed_create_cleans_meta_record() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);

        let mut req = request("www.example.com");
        req.last_operation = Some(LastOperationType::Create);
        req.last_operation_state = Some(LastOperationState::Error);

        actuator
            .reconcile(&OperationContext::new(), &req)
            .await
            .unwrap();
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_reconcile_after_successful_create_keeps_meta_record() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);

        let mut req = request("www.example.com");
        req.resolved_zone = Some("zoneX".to_string());
        req.last_operation = Some(LastOperationType::Create);
        req.last_operation_state = Some(LastOperationState::Succeeded);
        assert!(!req.is_first_reconciliation());

        actuator
            .reconcile(&OperationContext::new(), &req)
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Upsert {
                zone: "zoneX".to_string(),
                name: "www.example.com".to_string(),
                record_type: RecordType::A,
                values: vec!["1.2.3.4".to_string()],
                ttl: 120,
            }]
        );
    }

    #[tokio::test]
    async fn test_reconcile_without_meta_record_naming() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);
        let actuator = actuator.with_meta_record_naming(MetaRecordNaming::NoMetaRecord);

        actuator
            .reconcile(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap();

        assert!(api
            .calls()
            .iter()
            .all(|call| !matches!(call, Call::Delete { .. })));
    }

    #[tokio::test]
    async fn test_reconcile_custom_default_ttl() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);
        let actuator = actuator.with_default_ttl(3600);

        actuator
            .reconcile(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap();

        assert!(matches!(api.calls()[1], Call::Upsert { ttl: 3600, .. }));
    }

    #[tokio::test]
    async fn test_reconcile_invalid_ttl_contacts_nothing() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, factory) = actuator(&api);

        let mut req = request("www.example.com");
        req.ttl = Some(-5);

        let err = actuator
            .reconcile(&OperationContext::new(), &req)
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::InvalidTtl { ttl: -5, .. }));
        assert!(api.calls().is_empty());
        assert!(factory.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_missing_secret() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);

        let mut req = request("www.example.com");
        req.secret_ref.name = "missing".to_string();

        let err = actuator
            .reconcile(&OperationContext::new(), &req)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::SecretStore(SecretStoreError::NotFound { .. })
        ));
        assert!(err.is_configuration_problem());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_malformed_secret() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let mut data = secret();
        data.remove("apiKey");
        let secrets = Arc::new(StaticSecretStore::new().with_secret("default", "pdns", data));
        let actuator = RecordActuator::new(secrets, Arc::new(FakeFactory::new(api.clone())));

        let err = actuator
            .reconcile(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Credentials(CredentialError::MissingField { field: "apiKey" })
        ));
    }

    #[tokio::test]
    async fn test_reconcile_zone_not_found() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);

        let err = actuator
            .reconcile(&OperationContext::new(), &request("www.unknown.org"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Zone(ZoneError::ZoneNotFound { .. })
        ));
        assert!(err.is_configuration_problem());
        assert_eq!(api.calls(), vec![Call::ListZones]);
    }

    #[tokio::test]
    async fn test_reconcile_upsert_failure_skips_meta_cleanup() {
        let api = Arc::new(FakePowerDns {
            fail_upsert: Some(PowerDnsError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
            ..FakePowerDns::with_zones(&[("example.com", "zoneX")])
        });
        let (actuator, _) = actuator(&api);

        let err = actuator
            .reconcile(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap_err();

        match err {
            ReconcileError::UpsertRecordSet {
                zone, name, source, ..
            } => {
                assert_eq!(zone, "zoneX");
                assert_eq!(name, "www.example.com");
                assert!(source.is_transient());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reconcile_meta_delete_failure() {
        let api = Arc::new(FakePowerDns {
            fail_delete: Some(PowerDnsError::Auth {
                status: 403,
                message: "Forbidden".to_string(),
            }),
            ..FakePowerDns::with_zones(&[("example.com", "zoneX")])
        });
        let (actuator, _) = actuator(&api);

        let err = actuator
            .reconcile(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::DeleteMetaRecordSet { ref name, .. } if name == "comment-www.example.com"
        ));
    }

    #[tokio::test]
    async fn test_reconcile_cancelled() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);
        let ctx = OperationContext::new();
        ctx.cancel();

        let err = actuator
            .reconcile(&ctx, &request("www.example.com"))
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(api.calls().is_empty());
    }

    // ============================================================================
    // Delete / Migrate / Execute
    // ============================================================================

    #[tokio::test]
    async fn test_delete_resolves_zone_and_deletes() {
        let api = Arc::new(FakePowerDns::with_zones(&[
            ("example.com", "zoneX"),
            ("sub.example.com", "zoneSub"),
        ]));
        let (actuator, _) = actuator(&api);

        actuator
            .delete(&OperationContext::new(), &request("www.sub.example.com"))
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call::ListZones,
                Call::Delete {
                    zone: "zoneSub".to_string(),
                    name: "www.sub.example.com".to_string(),
                    record_type: RecordType::A,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let api = Arc::new(FakePowerDns {
            fail_delete: Some(PowerDnsError::Transport {
                endpoint: "http://pdns:8081".to_string(),
                reason: "connection refused".to_string(),
            }),
            ..FakePowerDns::with_zones(&[("example.com", "zoneX")])
        });
        let (actuator, _) = actuator(&api);

        let mut req = request("www.example.com");
        req.zone = Some("zoneX".to_string());

        let err = actuator
            .delete(&OperationContext::new(), &req)
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ReconcileError::DeleteRecordSet { values, .. } if values == &vec!["1.2.3.4".to_string()]
        ));
        assert!(err.to_string().contains("1.2.3.4"));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_migrate_contacts_nothing() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let factory = Arc::new(FakeFactory::new(api.clone()));
        // No secrets at all: migrate must not need them
        let actuator = RecordActuator::new(Arc::new(StaticSecretStore::new()), factory.clone());

        actuator
            .migrate(&OperationContext::new(), &request("www.example.com"))
            .await
            .unwrap();

        assert!(api.calls().is_empty());
        assert!(factory.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_dispatch() {
        let api = Arc::new(FakePowerDns::with_zones(&[("example.com", "zoneX")]));
        let (actuator, _) = actuator(&api);
        let ctx = OperationContext::new();
        let req = request("www.example.com");

        let reconciled = actuator.execute(Trigger::Reconcile, &ctx, &req).await.unwrap();
        assert_eq!(reconciled.map(|r| r.zone).as_deref(), Some("zoneX"));

        let restored = actuator.execute(Trigger::Restore, &ctx, &req).await.unwrap();
        assert!(restored.is_some());

        let deleted = actuator.execute(Trigger::Delete, &ctx, &req).await.unwrap();
        assert!(deleted.is_none());

        let calls_before = api.calls().len();
        let migrated = actuator.execute(Trigger::Migrate, &ctx, &req).await.unwrap();
        assert!(migrated.is_none());
        assert_eq!(api.calls().len(), calls_before);
    }

    #[test]
    fn test_trigger_display() {
        assert_eq!(Trigger::Reconcile.to_string(), "reconcile");
        assert_eq!(Trigger::Delete.to_string(), "delete");
        assert_eq!(Trigger::Restore.to_string(), "restore");
        assert_eq!(Trigger::Migrate.to_string(), "migrate");
    }

    // ============================================================================
    // RecordRequest
    // ============================================================================

    fn dns_record(secret_namespace: Option<&str>) -> DNSRecord {
        let mut record = DNSRecord::new(
            "www",
            DNSRecordSpec {
                secret_ref: SecretReference {
                    name: "pdns".to_string(),
                    namespace: secret_namespace.map(str::to_string),
                },
                name: "www.example.com".to_string(),
                record_type: RecordType::CNAME,
                values: vec!["lb.example.com".to_string()],
                ttl: Some(60),
                zone: None,
            },
        );
        record.metadata.namespace = Some("team-a".to_string());
        record
    }

    #[test]
    fn test_request_from_resource() {
        let mut record = dns_record(None);
        record.status = Some(DNSRecordStatus {
            zone: Some("zoneX".to_string()),
            last_operation: Some(LastOperation {
                r#type: LastOperationType::Reconcile,
                state: LastOperationState::Succeeded,
                description: String::new(),
                last_update_time: String::new(),
            }),
            ..DNSRecordStatus::default()
        });

        let req = RecordRequest::from_resource(&record);
        assert_eq!(req.name, "www.example.com");
        assert_eq!(req.record_type, RecordType::CNAME);
        assert_eq!(req.ttl, Some(60));
        assert_eq!(req.resolved_zone.as_deref(), Some("zoneX"));
        assert_eq!(req.last_operation, Some(LastOperationType::Reconcile));
        assert_eq!(req.last_operation_state, Some(LastOperationState::Succeeded));
        assert_eq!(req.secret_ref.namespace.as_deref(), Some("team-a"));
        assert!(!req.is_first_reconciliation());
    }

    #[test]
    fn test_request_explicit_secret_namespace() {
        let req = RecordRequest::from_resource(&dns_record(Some("dns-system")));
        assert_eq!(req.secret_ref.namespace.as_deref(), Some("dns-system"));
        assert!(req.is_first_reconciliation());
        assert!(req.resolved_zone.is_none());
    }
}
