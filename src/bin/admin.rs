//! CLI administration tool for urlkey.
//!
//! Inspects and edits the mapping store directly, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Find the URL behind a key
//! cargo run --bin admin -- lookup aB3xY9z
//!
//! # Find the key for a URL
//! cargo run --bin admin -- resolve https://example.com/a
//!
//! # Shorten a URL through the same allocation path as POST /shorten
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Most recent mappings
//! cargo run --bin admin -- list --limit 50
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (see [`urlkey::config`]), notably:
//!
//! - `DATABASE_URL` or `DB_PATH`: SQLite database (default `./data/urls.db`)
//! - `APP_BASE_URL`: prefix used when printing short URLs
//! - `MAX_ALLOCATION_ATTEMPTS`: retry budget for `shorten`

use urlkey::application::services::AllocationService;
use urlkey::config::{Config, load_from_env};
use urlkey::domain::entities::ShortKey;
use urlkey::domain::errors::StoreError;
use urlkey::domain::repositories::MappingStore;
use urlkey::infrastructure::persistence::{SqliteMappingStore, open_pool};
use urlkey::utils::key_generator::RandomKeyGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::SqlitePool;
use std::sync::Arc;

/// CLI tool for managing urlkey.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the original URL for a short key
    Lookup {
        /// Short key, e.g. "aB3xY9z"
        short_key: String,
    },

    /// Print the short key already bound to a URL
    Resolve {
        /// Original URL
        url: String,
    },

    /// Shorten a URL (reuses the existing key if there is one)
    Shorten {
        /// Original URL
        url: String,
    },

    /// List the most recent mappings
    List {
        /// Number of mappings to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_from_env().context("Invalid configuration")?;
    let pool = open_pool(&config.database_url, 1, config.db_connect_timeout())
        .await
        .context("Failed to connect to database")?;

    let store = Arc::new(SqliteMappingStore::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Lookup { short_key } => handle_lookup(&store, short_key).await?,
        Commands::Resolve { url } => handle_resolve(&store, &url).await?,
        Commands::Shorten { url } => handle_shorten(&config, store, &url).await?,
        Commands::List { limit } => handle_list(&store, limit).await?,
        Commands::Stats => handle_stats(&store).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;
    Ok(())
}

async fn handle_lookup(store: &SqliteMappingStore, short_key: String) -> Result<()> {
    let Ok(key) = ShortKey::parse(short_key.clone()) else {
        println!("{} {}", "❌ Not a valid short key:".red(), short_key);
        return Ok(());
    };

    match store.get_url_by_key(&key).await {
        Ok(url) => println!("{} → {}", key.to_string().bright_cyan(), url.bright_white()),
        Err(StoreError::NotFound) => println!("{} {}", "❌ Not found:".red(), key),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn handle_resolve(store: &SqliteMappingStore, url: &str) -> Result<()> {
    match store.get_key_by_url(url).await {
        Ok(key) => println!("{} → {}", url.bright_white(), key.to_string().bright_cyan()),
        Err(StoreError::NotFound) => println!("{} {}", "❌ Not shortened:".red(), url),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Runs the allocation service against the database with the server's
/// retry budget and base URL.
async fn handle_shorten(
    config: &Config,
    store: Arc<SqliteMappingStore>,
    url: &str,
) -> Result<()> {
    let service = AllocationService::new(store, Arc::new(RandomKeyGenerator))
        .with_max_attempts(config.max_allocation_attempts)
        .with_lock_stripes(config.url_lock_stripes);
    let allocation = service.shorten(url).await?;

    if allocation.created {
        println!("{}", "✅ Short link created".green().bold());
    } else {
        println!("{}", "ℹ️  URL was already shortened".yellow().bold());
    }
    println!();
    println!("  Key:       {}", allocation.key.to_string().bright_cyan());
    println!(
        "  Short URL: {}",
        allocation.key.to_url(&config.base_url).bright_white()
    );
    if allocation.collisions > 0 {
        println!("  Collisions: {}", allocation.collisions);
    }
    println!();

    Ok(())
}

async fn handle_list(store: &SqliteMappingStore, limit: i64) -> Result<()> {
    let mappings = store.list_recent(limit).await?;

    if mappings.is_empty() {
        println!("{}", "No mappings stored yet".yellow());
        return Ok(());
    }

    println!("{}", "🔗 Recent mappings".bright_blue().bold());
    println!();
    println!("{:<8} {:<9} {}", "ID".bold(), "KEY".bold(), "URL".bold());
    println!("{}", "─".repeat(60).bright_black());

    for mapping in mappings {
        println!(
            "{:<8} {:<9} {}",
            mapping.id,
            mapping.short_key.as_str().bright_cyan(),
            mapping.original_url
        );
    }
    println!();

    Ok(())
}

async fn handle_stats(store: &SqliteMappingStore) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let count = store.count().await?;

    println!("  Mappings: {}", count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;
            let journal_mode: String = sqlx::query_scalar("PRAGMA journal_mode")
                .fetch_one(pool)
                .await?;

            println!("  SQLite:       {}", version.bright_white());
            println!("  Journal mode: {}", journal_mode.bright_white());
            println!();
        }
    }

    Ok(())
}
