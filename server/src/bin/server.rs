use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use camino::Utf8PathBuf as PathBuf;
use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

use chronicle::{
    app_state::{AppState, SharedState},
    routes,
};
use chronicle_core::{
    config::{self, Config},
    model::repository::db::{self, Database},
    storage::UploadStorage,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML config file, defaults are used if not given
    #[arg(short, long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database tables
    InitDb {
        /// Drop existing tables and their contents first
        #[arg(long)]
        reset: bool,
    },
}

async fn db_setup(config: &Config) -> Result<Database> {
    let db = Database::new(config.database_path.clone());
    db.interact(db::migrate)
        .await
        .wrap_err_with(|| format!("error setting up database {}", config.database_path))?;
    Ok(db)
}

async fn init_db(config: &Config, reset: bool) -> Result<()> {
    let db = Database::new(config.database_path.clone());
    db.interact(move |conn| {
        if reset {
            db::reset(conn)
        } else {
            db::migrate(conn)
        }
    })
    .await?;
    println!("Database initialized.");
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let addr: IpAddr = config
        .address
        .parse()
        .wrap_err("error parsing listening address")?;
    info!("Starting up...");
    let uploads = UploadStorage::new(config.upload_dir.clone());
    uploads.create_root().await?;
    let db = db_setup(&config).await?;
    let shared_state: SharedState = Arc::new(AppState { db, uploads });
    let app = routes::app_router(shared_state, config.max_upload_size);
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(addr, config.port))
        .await
        .wrap_err("Error binding socket")?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("error running server")?;
    info!("Shutting down...");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "1");
    }
    color_eyre::install()?;
    let filter = EnvFilter::try_from_env("CHRONICLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match args.config {
        Some(path) => config::read_config(&PathBuf::from(path)).await?,
        None => Config::default(),
    };
    let config = config.with_port_from_env(std::env::var("PORT").ok())?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::InitDb { reset } => init_db(&config, reset).await,
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("Unable to listen for shutdown signal: {}", err);
            // we also shut down in case of error
            std::process::exit(1);
        }
    }
}
