//! CLI command definitions and dispatch.

pub mod document;
pub mod health;
pub mod list;

use clap::{Parser, Subcommand};

use docrepo_core::config::AppConfig;
use docrepo_core::error::AppError;
use docrepo_core::traits::Document;
use docrepo_core::types::RawDocument;
use docrepo_database::{BaseRepository, StoreManager};

use crate::output::OutputFormat;

/// Inspect and edit document collections
#[derive(Debug, Parser)]
#[command(name = "docrepo", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment, selects `config/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Collection to operate on
    #[arg(short, long, default_value = RawDocument::COLLECTION)]
    pub collection: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List documents page by page
    List(list::ListArgs),
    /// Fetch a document by id
    Get {
        /// Document id
        id: String,
    },
    /// Fetch every document matching a JSON predicate
    Find {
        /// Predicate, e.g. '{"status": "open", "age": {"$gte": 18}}'
        predicate: String,
    },
    /// Insert a JSON document
    Create {
        /// Document body; `_id` is generated when absent
        document: String,
    },
    /// Apply a partial update; `null` fields are removed
    Update {
        /// Document id
        id: String,
        /// Fields to assign
        changes: String,
    },
    /// Delete a document by id
    Delete {
        /// Document id
        id: String,
    },
    /// Check store connectivity
    Health,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let store = StoreManager::new(&config.store).await?;
        let repo = BaseRepository::<RawDocument>::with_collection(store.store(), &self.collection)
            .with_config(&config.repository);

        match &self.command {
            Commands::List(args) => list::execute(args, &repo, self.format).await,
            Commands::Get { id } => document::get(&repo, id, self.format).await,
            Commands::Find { predicate } => document::find(&repo, predicate, self.format).await,
            Commands::Create { document } => {
                document::create(&repo, document, self.format).await
            }
            Commands::Update { id, changes } => {
                document::update(&repo, id, changes, self.format).await
            }
            Commands::Delete { id } => document::delete(&repo, id).await,
            Commands::Health => health::execute(&store, config).await,
        }
    }
}

/// Repository over untyped documents, as used by every command.
pub type RawRepository = BaseRepository<RawDocument>;

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}
