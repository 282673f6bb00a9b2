//! meter-server

use anyhow::{anyhow, Result};
use axum::Router;
use axum_server::Handle;
use clap::Parser;
use meter_server::{
    app_state::AppStateBuilder,
    db::{self, migrations},
    router,
    settings::{Log, LogFormat, Settings},
};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    process::exit,
};
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Account service for meters and votes
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the settings file, defaults to `config/settings.toml`
    #[arg(long)]
    config_path: Option<PathBuf>,
    /// Disable ANSI colors in log output
    #[arg(long)]
    no_colors: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (stdout_writer, _stdout_guard) = tracing_appender::non_blocking(io::stdout());

    let settings = Settings::load(cli.config_path)?;

    setup_tracing(stdout_writer, &settings.log, !cli.no_colors)?;

    info!(
        subject = "app_settings",
        category = "init",
        environment = %settings.server.environment,
        "starting with settings: {:?}",
        settings,
    );

    migrations::run(&settings.database.url).await?;

    let db_pool = db::pool(
        &settings.database.url,
        settings.database.connect_timeout,
        settings.database.max_pool_size,
    )
    .await?;

    let app_state = AppStateBuilder::default()
        .with_db_pool(db_pool)
        .with_db_version(migrations::latest_version()?)
        .finalize()?;

    let cancellation_token = CancellationToken::new();

    let app_server = tokio::spawn(serve_app(
        router::setup_app_router(app_state),
        settings.server.port,
        cancellation_token.clone(),
    ));

    tokio::spawn(async move {
        capture_sigterm().await;

        cancellation_token.cancel();
        println!("\nCtrl+C received, shutting down. Press Ctrl+C again to force shutdown.");

        capture_sigterm().await;

        exit(130)
    });

    if let Err(e) = app_server.await? {
        tracing::error!("app server crashed: {}", e);
    }

    Ok(())
}

async fn serve_app(app_router: Router, port: u16, token: CancellationToken) -> Result<()> {
    let (server, _) = serve("Application", app_router, port).await?;

    token.cancelled().await;
    server.graceful_shutdown(None);

    Ok(())
}

async fn serve(name: &str, app: Router, port: u16) -> Result<(Handle, SocketAddr)> {
    let bind_addr: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    info!(
        subject = "app_start",
        category = "init",
        "{} server listening on {}",
        name,
        bind_addr
    );

    let handle = Handle::new();

    tokio::spawn({
        let handle = handle.clone();
        async move {
            axum_server::bind(bind_addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    });

    let addr = handle
        .listening()
        .await
        .ok_or_else(|| anyhow!("{name} server failed to bind {bind_addr}"))?;

    Ok((handle, addr))
}

/// Captures and waits for system signals.
async fn capture_sigterm() {
    #[cfg(unix)]
    let term = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = term => {}
    };
}

/// Setup [tracing][tracing] logging to stdout.
fn setup_tracing(
    writer: tracing_appender::non_blocking::NonBlocking,
    settings_log: &Log,
    ansi: bool,
) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meter_server=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);

    match settings_log.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(writer),
            )
            .try_init()?,
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_writer(writer),
            )
            .try_init()?,
    }

    Ok(())
}
