use anyhow::Result;
use clap::Parser;
use mentora_database::{establish_connection, run_migrations};
use mentora_lifecycle::OutboxDispatcher;
use mentora_server::{create_router, AppState, ServerConfig};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mentora back office API server", long_about = None)]
struct Args {
    /// Address to bind (overrides MENTORA_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<String>,

    /// Apply pending database migrations before serving
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let mut conn = establish_connection()?;
    if args.migrate {
        info!("Applying pending migrations");
        run_migrations(&mut conn)?;
    }
    let conn = Arc::new(Mutex::new(conn));

    let dispatcher = OutboxDispatcher::from_arc(conn.clone());
    let outbox_interval = config.outbox_interval();
    tokio::spawn(dispatcher.run(outbox_interval));

    let state = AppState::from_arc(conn);
    let router = create_router(state);

    info!(
        bind_addr = %config.bind_addr,
        outbox_interval_secs = config.outbox_interval_secs,
        "Starting Mentora API server"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
