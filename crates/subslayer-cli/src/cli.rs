//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SubSlayer - Track recurring subscriptions and slay the ones you don't need
#[derive(Parser)]
#[command(name = "subslayer")]
#[command(about = "Self-hosted subscription spend tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "subslayer.db", global = true)]
    pub db: PathBuf,

    /// Owner of the subscriptions being managed
    ///
    /// Matches the identity the web server uses for unauthenticated local
    /// access, so `serve --no-auth` shows the same data.
    #[arg(long, default_value = "local-dev", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SUBSLAYER_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init {
        /// Add the sample subscription set for --user
        #[arg(long)]
        sample_data: bool,
    },

    /// Add a subscription
    Add {
        /// Subscription name (e.g., "Netflix")
        #[arg(short, long)]
        name: String,

        /// Monthly cost (e.g., 15.99 or $15.99)
        #[arg(short, long)]
        cost: String,

        /// Next renewal date (YYYY-MM-DD)
        #[arg(short, long)]
        renewal: String,

        /// Category (Entertainment, Productivity, Health & Fitness, News & Media,
        /// Cloud Storage, Music, Gaming, Other)
        #[arg(long)]
        category: Option<String>,
    },

    /// List subscriptions, soonest renewal first
    List,

    /// Change fields of a subscription
    Edit {
        /// Subscription ID
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        cost: Option<String>,

        /// Next renewal date (YYYY-MM-DD)
        #[arg(short, long)]
        renewal: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a subscription
    Delete {
        /// Subscription ID
        id: i64,
    },

    /// Show monthly/yearly totals, category breakdown and insights
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show renewals due in the next 7 days
    Upcoming,

    /// List known categories
    Categories,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires Cloudflare Access headers, an API key,
        /// or a trusted network.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Give first-time users the sample subscription set
        #[arg(long)]
        seed_sample_data: bool,
    },
}
