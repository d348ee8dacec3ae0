use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use zapdrop_channels::ChatTransport;
use zapdrop_core::action::DispatchAction;

mod app;
mod http;
mod upload;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zapdrop_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path via ZAPDROP_CONFIG > ~/.zapdrop/zapdrop.toml
    let config_path = std::env::var("ZAPDROP_CONFIG").ok();
    let config = zapdrop_core::config::ZapdropConfig::load(config_path.as_deref())
        .unwrap_or_else(|e| {
            warn!("Config load failed ({}), using defaults", e);
            zapdrop_core::config::ZapdropConfig::default()
        });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;
    let send_delay = Duration::from_secs(config.dispatch.send_delay_secs);

    std::fs::create_dir_all(&config.storage.uploads_dir)?;
    info!(dir = %config.storage.uploads_dir, "uploads directory ready");

    // WhatsApp bridge, initialised once and shared by every firing.
    let transport: Arc<dyn ChatTransport> =
        Arc::new(zapdrop_whatsapp::BridgeClient::new(&config.whatsapp.bridge_url));
    if let Err(e) = transport.probe().await {
        // Not fatal: the bridge may still be pairing; firings will surface
        // transport errors on their own.
        warn!(error = %e, "whatsapp bridge not reachable at startup");
    }

    // Fired-job channel: SchedulerEngine → delivery router task
    let (fired_tx, mut fired_rx) = tokio::sync::mpsc::channel::<zapdrop_scheduler::Job>(256);

    let scheduler_handle = zapdrop_scheduler::SchedulerHandle::new();
    let scheduler_engine = zapdrop_scheduler::SchedulerEngine::new(&scheduler_handle, fired_tx);

    let state = Arc::new(app::AppState::new(
        &config,
        scheduler_handle,
        Arc::clone(&transport),
    ));
    let router = app::build_router(state.clone());

    // Delivery router: each fired job becomes one independent firing task.
    // Two simultaneous firings interleave freely; within one firing targets
    // are strictly sequential.
    let transport_for_router = Arc::clone(&transport);
    tokio::spawn(async move {
        while let Some(job) = fired_rx.recv().await {
            let action: DispatchAction = match serde_json::from_str(&job.action) {
                Ok(a) => a,
                Err(e) => {
                    warn!(job_id = %job.id, "delivery router: bad action JSON: {e}");
                    continue;
                }
            };
            let transport = Arc::clone(&transport_for_router);
            tokio::spawn(async move {
                let report =
                    zapdrop_channels::run_firing(transport.as_ref(), &action, send_delay).await;
                info!(
                    job_id = %job.id,
                    sent = report.sent.len(),
                    skipped = report.skipped.len(),
                    aborted = report.aborted.is_some(),
                    "firing finished"
                );
            });
        }
    });

    // spawn scheduler engine loop in background
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move { scheduler_engine.run(shutdown_rx).await });

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("zapdrop gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // signal scheduler to stop
    let _ = shutdown_tx.send(true);
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
