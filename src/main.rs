//! Code Annotate - browse a source tree and annotate lines in your browser
//!
//! # Usage
//! ```bash
//! code-annotate /path/to/source                    # Start server
//! code-annotate /path/to/source --open             # Start and open browser
//! code-annotate /srv/src --ignore '*.lock' --default-author reviewer
//! ```

mod config;
mod db;
mod error;
mod fs;
mod highlight;
mod models;
mod routes;
mod views;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_USER_HEADER};
use db::Database;
use fs::ignore::DEFAULT_IGNORE_PATTERNS;
use highlight::Highlighter;
use routes::AppState;

/// Code Annotate - Browse a source tree and attach notes to lines
#[derive(Parser)]
#[command(name = "code-annotate")]
#[command(about = "Browse a source tree and annotate lines in your browser", long_about = None)]
struct Cli {
    /// Root directory of the source tree to serve
    #[arg(value_name = "ROOT", env = "CODE_ANNOTATE_ROOT")]
    root: PathBuf,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "CODE_ANNOTATE_HOST")]
    host: String,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001", env = "CODE_ANNOTATE_PORT")]
    port: u16,

    /// SQLite database file for annotations
    #[arg(long, default_value = db::DEFAULT_DB_FILE, env = "CODE_ANNOTATE_DATABASE")]
    database: PathBuf,

    /// Glob patterns hidden from listings (repeatable or comma separated)
    #[arg(long, value_delimiter = ',', env = "CODE_ANNOTATE_IGNORE")]
    ignore: Option<Vec<String>>,

    /// Request header carrying the authenticated user name
    #[arg(long, default_value = DEFAULT_USER_HEADER, env = "CODE_ANNOTATE_USER_HEADER")]
    user_header: String,

    /// Author recorded when the user header is absent
    #[arg(long, env = "CODE_ANNOTATE_DEFAULT_AUTHOR")]
    default_author: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,code_annotate=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ignore = cli.ignore.unwrap_or_else(|| {
        DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect()
    });
    let config = Config::new(&cli.root, ignore, &cli.user_header, cli.default_author)?;
    tracing::info!("Hiding entries matching {:?}", config.ignore.patterns());

    let db = Database::open(&cli.database)
        .await
        .with_context(|| format!("Failed to open database {}", cli.database.display()))?;
    let highlighter = Highlighter::new().context("Failed to load syntax grammars")?;

    let root_display = config.resolver.root().display().to_string();
    let state = AppState {
        config: Arc::new(config),
        db,
        highlighter: Arc::new(highlighter),
    };

    // CORS configuration for the JSON API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}; try a different port with --port"))?;

    let url = format!("http://{}", addr);
    tracing::info!("Serving {} at {}", root_display, url);
    println!();
    println!("  Code Annotate");
    println!();
    println!("  Root:     {}", root_display);
    println!("  Database: {}", cli.database.display());
    println!("  Server:   {}", url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    if cli.open {
        if let Err(e) = open::that(&url) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
