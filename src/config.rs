// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Operator configuration.
//!
//! Every setting is available as a command line flag and as an environment
//! variable (`POWERDNS_OPERATOR_*`). The log format keeps the conventional
//! `RUST_LOG_FORMAT` variable, next to `RUST_LOG` for the filter.

use crate::constants::{
    DEFAULT_CONFIG_ERROR_REQUEUE_SECS, DEFAULT_DNS_RECORD_TTL_SECS, DEFAULT_ERROR_REQUEUE_SECS,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_METRICS_BIND_ADDRESS, DEFAULT_OPERATION_TIMEOUT_SECS,
    DEFAULT_REQUEUE_INTERVAL_SECS,
};
use clap::{Parser, ValueEnum};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("default TTL must be between 0 and {max}, got {ttl}", max = u32::MAX)]
    InvalidDefaultTtl { ttl: i64 },

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

/// Runtime configuration of the operator.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "powerdns-operator", author, version, about, long_about = None)]
pub struct OperatorConfig {
    /// TTL in seconds applied to records that do not set one
    #[arg(long, env = "POWERDNS_OPERATOR_DEFAULT_TTL", default_value_t = DEFAULT_DNS_RECORD_TTL_SECS, allow_negative_numbers = true)]
    pub default_ttl: i64,

    /// Timeout of a single PowerDNS HTTP request
    #[arg(long, env = "POWERDNS_OPERATOR_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Upper bound for a whole reconcile or delete operation
    #[arg(long, env = "POWERDNS_OPERATOR_OPERATION_TIMEOUT_SECS", default_value_t = DEFAULT_OPERATION_TIMEOUT_SECS)]
    pub operation_timeout_secs: u64,

    /// Resync interval of records in sync
    #[arg(long, env = "POWERDNS_OPERATOR_REQUEUE_INTERVAL_SECS", default_value_t = DEFAULT_REQUEUE_INTERVAL_SECS)]
    pub requeue_interval_secs: u64,

    /// Retry interval after a transient failure
    #[arg(long, env = "POWERDNS_OPERATOR_ERROR_REQUEUE_SECS", default_value_t = DEFAULT_ERROR_REQUEUE_SECS)]
    pub error_requeue_secs: u64,

    /// Retry interval after a failure the user has to fix
    #[arg(long, env = "POWERDNS_OPERATOR_CONFIG_ERROR_REQUEUE_SECS", default_value_t = DEFAULT_CONFIG_ERROR_REQUEUE_SECS)]
    pub config_error_requeue_secs: u64,

    /// Only watch `DNSRecord` resources in this namespace (all namespaces when unset)
    #[arg(long, env = "POWERDNS_OPERATOR_WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// Listen address of the metrics and health endpoints
    #[arg(long, env = "POWERDNS_OPERATOR_METRICS_BIND_ADDRESS", default_value = DEFAULT_METRICS_BIND_ADDRESS)]
    pub metrics_bind_address: SocketAddr,

    /// Log output format
    #[arg(long, env = "RUST_LOG_FORMAT", value_enum, ignore_case = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Do not delete legacy `comment-<name>` TXT records on first reconciliation
    #[arg(long, env = "POWERDNS_OPERATOR_DISABLE_META_RECORD_CLEANUP")]
    pub disable_meta_record_cleanup: bool,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_DNS_RECORD_TTL_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            operation_timeout_secs: DEFAULT_OPERATION_TIMEOUT_SECS,
            requeue_interval_secs: DEFAULT_REQUEUE_INTERVAL_SECS,
            error_requeue_secs: DEFAULT_ERROR_REQUEUE_SECS,
            config_error_requeue_secs: DEFAULT_CONFIG_ERROR_REQUEUE_SECS,
            watch_namespace: None,
            metrics_bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            log_format: LogFormat::Text,
            disable_meta_record_cleanup: false,
        }
    }
}

impl OperatorConfig {
    /// Check values clap cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a TTL outside `0..=u32::MAX` or a zero timeout
    /// or interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if u32::try_from(self.default_ttl).is_err() {
            return Err(ConfigError::InvalidDefaultTtl {
                ttl: self.default_ttl,
            });
        }

        let durations = [
            ("http-timeout-secs", self.http_timeout_secs),
            ("operation-timeout-secs", self.operation_timeout_secs),
            ("requeue-interval-secs", self.requeue_interval_secs),
            ("error-requeue-secs", self.error_requeue_secs),
            ("config-error-requeue-secs", self.config_error_requeue_secs),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::ZeroDuration { field });
        }

        Ok(())
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    #[must_use]
    pub fn requeue_interval(&self) -> Duration {
        Duration::from_secs(self.requeue_interval_secs)
    }

    #[must_use]
    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs)
    }

    #[must_use]
    pub fn config_error_requeue(&self) -> Duration {
        Duration::from_secs(self.config_error_requeue_secs)
    }
}
