//! bridged — the integration bridge health daemon.
//!
//! Single binary that assembles the health subsystems:
//! - Application registry (in-memory)
//! - Service probes + composite indicators
//! - Scheduled refresh loop over the snapshot cache
//! - REST API
//!
//! # Usage
//!
//! ```text
//! bridged --config bridge.toml --port 8080
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use bridge_health::{
    ApplicationsHealthIndicator, AsyncCompositeHealthEndpoint, AsyncCompositeHealthIndicator,
    BridgeHealthAggregator, CompositeServiceHealthIndicator, HealthStatus, HttpProbeConfig,
    IntegrationHealth, http_service_probe,
};
use bridge_registry::InMemoryApplicationRegistry;

use crate::config::{BridgeConfig, parse_duration};

#[derive(Parser)]
#[command(name = "bridged", about = "Integration bridge health daemon")]
struct Cli {
    /// Path to bridge.toml.
    #[arg(long, default_value = "bridge.toml")]
    config: PathBuf,

    /// Port to listen on (overrides the config file).
    #[arg(long)]
    port: Option<u16>,

    /// Refresh interval in seconds (overrides the config file).
    #[arg(long)]
    refresh_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bridged=debug,bridge=debug".parse().expect("static filter")),
        )
        .init();

    let cli = Cli::parse();

    let config = BridgeConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let port = cli.port.unwrap_or(config.bridge.port);
    let refresh_interval = match cli.refresh_interval {
        Some(secs) => Duration::from_secs(secs),
        None => parse_duration(&config.bridge.refresh_interval)
            .context("invalid bridge.refresh_interval")?,
    };

    run(config, port, refresh_interval).await
}

async fn run(config: BridgeConfig, port: u16, refresh_interval: Duration) -> anyhow::Result<()> {
    info!("integration bridge daemon starting");

    // ── Assemble the health engine ─────────────────────────────

    let registry = Arc::new(InMemoryApplicationRegistry::new());
    for app in &config.applications {
        registry.register(IntegrationHealth {
            id: app.id.clone(),
            name: app.name.clone(),
            status: HealthStatus::Unknown,
            message: None,
        });
    }
    info!(applications = config.applications.len(), "registry seeded");

    let mut services = CompositeServiceHealthIndicator::new();
    for svc in &config.services {
        let min_version = svc
            .min_version
            .as_deref()
            .map(semver::Version::parse)
            .transpose()
            .with_context(|| format!("invalid min_version for service {}", svc.name))?;
        let timeout = parse_duration(&svc.timeout)
            .with_context(|| format!("invalid timeout for service {}", svc.name))?;

        services.register(
            &svc.name,
            http_service_probe(HttpProbeConfig {
                address: svc.address.clone(),
                path: svc.path.clone(),
                timeout,
                min_version,
            }),
        );
    }
    info!(services = services.len(), "service probes registered");

    let services = Arc::new(services);
    let applications = Arc::new(ApplicationsHealthIndicator::new(registry.clone()));
    let aggregator = BridgeHealthAggregator;

    let indicator = Arc::new(AsyncCompositeHealthIndicator::new(
        services.clone(),
        applications.clone(),
        aggregator,
        env!("CARGO_PKG_VERSION"),
    ));

    let endpoint = Arc::new(AsyncCompositeHealthEndpoint::new(
        indicator.clone(),
        services,
        applications,
        aggregator,
    ));

    // ── Scheduled refresh loop ─────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_handle = tokio::spawn(indicator.clone().run(refresh_interval, shutdown_rx));
    info!(interval = ?refresh_interval, "health refresh loop started");

    // ── API server ─────────────────────────────────────────────

    let router = bridge_api::build_router(endpoint, registry);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    let _ = refresh_handle.await;

    info!("integration bridge daemon stopped");
    Ok(())
}
