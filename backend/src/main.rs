//! Service entry-point: loads settings, wires adapters, and serves HTTP.

mod server;

use std::time::Duration;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServiceSettings, build_account_wiring, create_server};
use user_graph::inbound::http::health::HealthState;

const APPENDER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load().wrap_err("load service settings")?;
    let key = settings.session_key()?;
    let bind_addr = settings.bind_addr()?;

    #[cfg(feature = "metrics")]
    let prometheus = PrometheusMetricsBuilder::new("user_graph")
        .endpoint("/metrics")
        .build()
        .map_err(|error| eyre!("configure Prometheus metrics: {error}"))?;

    #[cfg(feature = "metrics")]
    let wiring = build_account_wiring(&settings, &prometheus.registry).await?;
    #[cfg(not(feature = "metrics"))]
    let wiring = build_account_wiring(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig {
            key,
            cookie_secure: settings.cookie_secure,
            bind_addr,
            http_state: wiring.http_state,
            #[cfg(feature = "metrics")]
            prometheus,
        },
    )
    .wrap_err_with(|| format!("bind {bind_addr}"))?;
    info!(%bind_addr, "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    if let Some(appender) = wiring.appender {
        match tokio::time::timeout(APPENDER_DRAIN_TIMEOUT, appender).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(%error, "event appender task failed"),
            Err(_) => warn!("event appender still busy at shutdown; pending events dropped"),
        }
    }
    outcome.map_err(|error| eyre!("server failed: {error}"))
}
