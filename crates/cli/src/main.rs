use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uniquify_storage::{Storage, StorageConfig};

mod commands;

#[derive(Parser)]
#[command(name = "uniquify")]
#[command(about = "Resolve duplicate names and add unique name constraints", long_about = None)]
struct Cli {
    /// Database file (defaults to $UNIQUIFY_DB_PATH, then the local data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the entity tables if they do not exist
    Init,
    /// Print the renames the upgrade would apply, without writing
    Plan,
    /// Resolve duplicates and add the unique constraints
    Upgrade,
    /// Drop constraints down to a schema version; rewritten names stay
    Downgrade {
        #[arg(long)]
        to: i32,
    },
    /// Print schema version and constraint presence
    Status,
}

pub(crate) fn get_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("UNIQUIFY_DB_PATH").map(PathBuf::from)).unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("uniquify")
            .join("store.db")
    })
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn open_storage(flag: Option<PathBuf>) -> Result<Storage> {
    let db_path = get_db_path(flag);
    ensure_db_dir(&db_path)?;
    tracing::debug!(db = %db_path.display(), "opening store");
    Ok(Storage::open(&db_path, StorageConfig::from_env())?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = open_storage(cli.db)?;

    match cli.command {
        Commands::Init => commands::migrate::run_init(&storage),
        Commands::Plan => commands::migrate::run_plan(&storage),
        Commands::Upgrade => commands::migrate::run_upgrade(&storage),
        Commands::Downgrade { to } => commands::migrate::run_downgrade(&storage, to),
        Commands::Status => commands::status::run_status(&storage),
    }
}
