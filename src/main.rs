use std::net::SocketAddr;
use std::path::PathBuf;

use attendance_ledger::api::{AppState, create_router};
use attendance_ledger::config::ConfigLoader;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(about = "Attendance ledger server: overtime/leave reconciliation and leave merging")]
struct Args {
    /// Calendar configuration directory.
    #[arg(long, default_value = "./config/cn")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let loader = ConfigLoader::load(&args.config)?;
    let jurisdiction = loader.jurisdiction();
    info!(
        config = %args.config.display(),
        jurisdiction = %jurisdiction.code,
        years = loader.config().years().len(),
        "Calendar configuration loaded"
    );

    let app = create_router(AppState::new(loader.calendar()));
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(address = %args.bind, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
