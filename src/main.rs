use std::sync::Arc;

use clap::Parser;

use pandu::api::{self, AppState};
use pandu::db::Database;

#[derive(Parser, Debug)]
#[command(name = "pandu", about = "Learning and news assistant backend")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    Database::init_global().await?;
    let state = Arc::new(AppState::new(Database::get()));

    let router = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    log::info!("listening on {}", args.bind);
    axum::serve(listener, router).await?;
    Ok(())
}
