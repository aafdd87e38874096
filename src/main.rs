// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use clap::Parser;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, ResourceExt,
};
use powerdns_operator::{
    config::{LogFormat, OperatorConfig},
    constants::KIND_DNS_RECORD,
    context::Context,
    credentials::KubeSecretStore,
    crd::DNSRecord,
    dns_errors,
    metrics,
    powerdns::HttpClientFactory,
    reconcilers::{reconcile_dnsrecord, requeue_after_error, MetaRecordNaming, RecordActuator},
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ReconcileError(#[from] anyhow::Error);

fn main() -> Result<()> {
    let config = OperatorConfig::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .thread_name("powerdns-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

fn init_tracing(log_format: LogFormat) {
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(config: OperatorConfig) -> Result<()> {
    init_tracing(config.log_format);

    info!("Starting PowerDNS DNSRecord Controller");
    config.validate().context("invalid configuration")?;
    debug!(?config, "Configuration loaded");

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let meta_record_naming = if config.disable_meta_record_cleanup {
        MetaRecordNaming::NoMetaRecord
    } else {
        MetaRecordNaming::LegacyCommentRecord
    };
    let actuator = RecordActuator::new(
        Arc::new(KubeSecretStore::new(client.clone())),
        Arc::new(HttpClientFactory::new(config.http_timeout())),
    )
    .with_default_ttl(config.default_ttl)
    .with_meta_record_naming(meta_record_naming);

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(Context {
        client: client.clone(),
        actuator: Arc::new(actuator),
        config: config.clone(),
        shutdown: shutdown.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.metrics_bind_address)
        .await
        .with_context(|| format!("failed to bind metrics endpoint {}", config.metrics_bind_address))?;
    info!(address = %config.metrics_bind_address, "Serving metrics");
    let metrics_shutdown = shutdown.clone();
    let metrics_server = axum::serve(listener, metrics::metrics_router())
        .with_graceful_shutdown(async move { metrics_shutdown.cancelled().await })
        .into_future();

    // Controllers should never exit - if one fails, we log it and exit the main process
    tokio::select! {
        () = run_dnsrecord_controller(client, ctx) => {
            error!("CRITICAL: DNSRecord controller exited unexpectedly");
            shutdown.cancel();
            anyhow::bail!("DNSRecord controller exited unexpectedly")
        }
        result = metrics_server => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            shutdown.cancel();
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received, cancelling in-flight operations");
            shutdown.cancel();
            Ok(())
        }
    }
}

/// Wait for SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Run the `DNSRecord` controller
async fn run_dnsrecord_controller(client: Client, ctx: Arc<Context>) {
    let api = match &ctx.config.watch_namespace {
        Some(namespace) => {
            info!("Starting DNSRecord controller in namespace {}", namespace);
            Api::<DNSRecord>::namespaced(client, namespace)
        }
        None => {
            info!("Starting DNSRecord controller with cluster-wide watch");
            Api::<DNSRecord>::all(client)
        }
    };

    Controller::new(api, Config::default())
        .run(reconcile_dnsrecord_wrapper, error_policy, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;
}

/// Reconcile wrapper for `DNSRecord`
async fn reconcile_dnsrecord_wrapper(
    record: Arc<DNSRecord>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let name = record.name_any();
    match reconcile_dnsrecord(record, ctx).await {
        Ok(action) => {
            info!("Successfully reconciled DNSRecord: {}", name);
            Ok(action)
        }
        Err(e) => {
            error!("Failed to reconcile DNSRecord {}: {:#}", name, e);
            Err(e.into())
        }
    }
}

/// Error policy for the `DNSRecord` controller
fn error_policy(_resource: Arc<DNSRecord>, err: &ReconcileError, ctx: Arc<Context>) -> Action {
    let configuration_problem = err
        .0
        .downcast_ref::<dns_errors::ReconcileError>()
        .is_some_and(dns_errors::ReconcileError::is_configuration_problem);
    let reason = if configuration_problem {
        "configuration_problem"
    } else {
        "error"
    };
    metrics::record_reconciliation_requeue(KIND_DNS_RECORD, reason);
    Action::requeue(requeue_after_error(&ctx.config, &err.0))
}
