//! SubSlayer CLI - Subscription spend tracker
//!
//! Usage:
//!   subslayer init                      Initialize database
//!   subslayer add -n Netflix -c 15.99 -r 2024-07-15 --category Entertainment
//!   subslayer summary                   Totals, categories and insights
//!   subslayer serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init { sample_data } => {
            commands::cmd_init(&cli.db, cli.no_encrypt, &cli.user, sample_data)
        }
        Commands::Add {
            name,
            cost,
            renewal,
            category,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(&db, &cli.user, &name, &cost, &renewal, category.as_deref())
        }
        Commands::List => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_list(&db, &cli.user)
        }
        Commands::Edit {
            id,
            name,
            cost,
            renewal,
            category,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_edit(
                &db,
                &cli.user,
                id,
                name.as_deref(),
                cost.as_deref(),
                renewal.as_deref(),
                category.as_deref(),
            )
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_delete(&db, &cli.user, id)
        }
        Commands::Summary { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_summary(&db, &cli.user, json)
        }
        Commands::Upcoming => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_upcoming(&db, &cli.user)
        }
        Commands::Categories => commands::cmd_categories(),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
            seed_sample_data,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
                seed_sample_data,
            )
            .await
        }
    }
}
