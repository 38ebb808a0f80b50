use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notekeep::{api, config::ServerConfig};
use notekeep_core::Database;

#[derive(Parser)]
#[command(name = "notekeep")]
#[command(about = "Notes in folders and tags, with revision history for code snippets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Create the schema and default data, then exit
    Init {
        /// Database file (overrides NOTEKEEP_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Port for HTTP API (overrides NOTEKEEP_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address (overrides NOTEKEEP_HOST)
    #[arg(long)]
    host: Option<std::net::IpAddr>,

    /// Database file (overrides NOTEKEEP_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Skip seeding default folders and tags into an empty database
    #[arg(long)]
    no_seed: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
        |_| "notekeep=debug,notekeep_core=debug,tower_http=debug".into(),
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the store and bring its schema up to date.
fn open_database(path: Option<PathBuf>) -> anyhow::Result<Database> {
    let db = match path {
        Some(path) => Database::open(path.clone())
            .with_context(|| format!("Failed to open database at {}", path.display()))?,
        None => Database::open_default().context("Failed to open default database")?,
    };
    db.ensure_schema().context("Failed to prepare database schema")?;
    Ok(db)
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if args.db.is_some() {
        config.db_path = args.db;
    }

    let db = open_database(config.db_path.clone())?;
    if !args.no_seed {
        db.seed_defaults()?;
    }

    let app = api::create_router_with_cors(db, config.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.addr()))?;
    tracing::info!("notekeep listening on http://{}", config.addr());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Init { db }) => {
            let path = match db {
                Some(path) => Some(path),
                None => ServerConfig::from_env()?.db_path,
            };
            let db = open_database(path)?;
            if db.seed_defaults()? {
                tracing::info!("Database initialized with default folders and tags");
            } else {
                tracing::info!("Database already initialized");
            }
        }
        None => serve(ServeArgs::default()).await?,
    }

    Ok(())
}
