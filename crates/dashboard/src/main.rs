use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use family_dashboard::config::{CalendarConfig, CalendarList, DashboardConfig};
use family_dashboard::google::GoogleCalendarSource;
use family_dashboard::handlers::AppState;
use family_dashboard::routes::create_app;
use family_dashboard::scheduler::{build_now, RefreshScheduler};
use family_dashboard::source::EventSource;
use family_dashboard::SnapshotPublisher;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "family_dashboard=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Another component may already have installed a provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = DashboardConfig::parse();
    let period = config.refresh_interval()?;

    tracing::info!("Starting family dashboard");

    let calendars: Arc<[CalendarConfig]> = CalendarList::load(&config.calendars_path)
        .context("Failed to load calendar list")?
        .calendars
        .into();
    tracing::info!("Loaded {} calendars", calendars.len());

    let source: Arc<dyn EventSource> = Arc::new(
        GoogleCalendarSource::connect(&config.client_secret_path, &config.token_cache_path)
            .await
            .context("Failed to create Google Calendar client")?,
    );

    // Serve a complete week from the first request on.
    let initial = build_now(&calendars, source.as_ref()).await;
    let publisher = SnapshotPublisher::new(initial);
    let state = AppState::new(publisher.reader(), &config.stylesheet);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = RefreshScheduler::new(calendars, source, publisher, period);
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    let app = create_app(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, stopping...");
            shutdown_tx.send_replace(true);
        })
        .await?;

    if let Err(e) = scheduler_handle.await {
        tracing::error!("Scheduler task error: {:?}", e);
    }

    tracing::info!("Family dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
