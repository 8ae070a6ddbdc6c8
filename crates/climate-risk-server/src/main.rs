use std::time::Duration;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "climate-risk-server", about = "REST adapter for the climate financial-risk engine")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Base URL of the historical-weather archive.
    #[arg(long, default_value = "https://archive-api.open-meteo.com")]
    weather_archive_url: String,

    /// Interval of the periodic session sweep, seconds.
    #[arg(long, default_value_t = 300)]
    session_sweep_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let state = AppState::new(&args.weather_archive_url);

    // Expired sessions are reaped lazily on access; the sweep keeps memory
    // bounded for idle callers too.
    let sessions = state.sessions.clone();
    let sweep_interval = Duration::from_secs(args.session_sweep_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let reaped = sessions.sweep();
            if reaped > 0 {
                tracing::debug!(reaped, "reaped expired partner sessions");
            }
        }
    });

    let app = routes::router(state);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "climate-risk-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(Level::INFO.into())
        .add_directive("climate_risk_core=debug".parse().expect("static filter directive"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
