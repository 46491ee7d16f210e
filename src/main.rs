//! gaze-control entry point.
//!
//! Starts the processing context thread, the raw TCP control listener and
//! the Axum HTTP server (`/health`, `/status`, `/clients`, `/ws`, `/events`).

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context as _;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use gaze_control::api;
use gaze_control::app_state::AppState;
use gaze_control::config::ControlConfig;
use gaze_control::context::{
    ContextLinks, HeadlessTracker, InMemorySettings, StatusSnapshot, TrackerContext,
};
use gaze_control::domain::EventBus;
use gaze_control::marshal;
use gaze_control::router::{CommandRegistry, CommandRouter};
use gaze_control::subsystem::{CalibrationCommands, Subsystems};
use gaze_control::transport::{self, ClientRegistry};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ControlConfig::from_env().context("loading configuration")?;
    init_tracing(config.log_json);
    tracing::info!(tcp = %config.tcp_addr, http = %config.http_addr, "starting gaze-control");

    // Wire the processing context
    let (sink, queue) = marshal::channel();
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
    let event_bus = EventBus::new(config.event_bus_capacity);
    let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());

    let settings = InMemorySettings::with_area(
        config.calibration_area_width,
        config.calibration_area_height,
    );
    let context = TrackerContext::new(
        HeadlessTracker::with_presenter(CalibrationCommands::new(sink.clone())),
        settings,
        config.log_path.clone(),
        ContextLinks {
            queue,
            outbox: outbox_tx,
            events: event_bus.clone(),
            status: status_tx,
        },
    );
    let shutdown = Arc::new(AtomicBool::new(false));
    let context_thread = context
        .spawn(config.pacing(), Arc::clone(&shutdown))
        .context("spawning processing context")?;

    // Router and client fan-out
    let router = Arc::new(CommandRouter::new(
        Arc::new(CommandRegistry::standard()),
        Subsystems::new(&sink),
    ));
    drop(sink);
    let clients = Arc::new(ClientRegistry::new());
    let outbox_task = tokio::spawn(transport::run_outbox(outbox_rx, Arc::clone(&clients)));

    // Raw TCP listener
    let tcp_listener = tokio::net::TcpListener::bind(config.tcp_addr)
        .await
        .with_context(|| format!("binding tcp listener on {}", config.tcp_addr))?;
    let mut tcp_task = tokio::spawn(transport::tcp::serve(
        tcp_listener,
        Arc::clone(&router),
        Arc::clone(&clients),
    ));

    // HTTP / WebSocket server
    let app_state = AppState {
        router,
        clients,
        status: status_rx,
        event_bus,
    };
    let app = api::app(app_state);
    let http_listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("binding http listener on {}", config.http_addr))?;
    tracing::info!(addr = %config.http_addr, "http server listening");

    let server = axum::serve(
        http_listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "ctrl-c handler failed");
        }
        tracing::info!("shutdown requested");
    });

    tokio::select! {
        served = server.into_future() => served.context("http server")?,
        tcp = &mut tcp_task => {
            tcp.context("tcp listener task")?.context("tcp listener")?;
        }
    }

    // Stop the context; it drains what is still queued before exiting.
    tcp_task.abort();
    shutdown.store(true, Ordering::Release);
    tokio::task::spawn_blocking(move || context_thread.join())
        .await
        .context("joining processing context")?
        .map_err(|_| anyhow::anyhow!("processing context panicked"))?;
    outbox_task.abort();

    tracing::info!("gaze-control stopped");
    Ok(())
}
