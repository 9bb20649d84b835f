//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use subslayer_core::db::Database;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    tracing::debug!(path = path_str, encrypted = !no_encrypt, "Opening database");
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool, owner: &str, sample_data: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    if sample_data {
        let today = chrono::Local::now().date_naive();
        let seeded = db
            .seed_sample_subscriptions(owner, today)
            .context("Failed to add sample subscriptions")?;
        tracing::debug!(owner, seeded, "Sample data pass finished");
        if seeded > 0 {
            println!("   Added {} sample subscriptions for {}", seeded, owner);
        } else {
            println!("   {} already has subscriptions, skipped sample data", owner);
        }
    }

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a subscription: subslayer add --name Netflix --cost 15.99 --renewal 2024-07-15");
    println!("  2. See your spending: subslayer summary");
    println!("  3. Start web UI: subslayer serve");

    Ok(())
}
