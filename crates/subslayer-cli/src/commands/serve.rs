//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

/// Parse a comma-separated environment variable into trimmed, non-empty entries
fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn join_networks<T: std::fmt::Display>(networks: &[T]) -> String {
    networks
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    seed_sample_data: bool,
) -> Result<()> {
    println!("🚀 Starting SubSlayer web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let api_keys = env_list("SUBSLAYER_API_KEYS");
    let allowed_origins = env_list("SUBSLAYER_ALLOWED_ORIGINS");

    // Trusted networks skip auth; trusted proxies may supply X-Forwarded-For
    let trusted_networks = subslayer_server::parse_trusted_networks(
        &std::env::var("SUBSLAYER_TRUSTED_NETWORKS").unwrap_or_default(),
    );
    let trusted_proxies = subslayer_server::parse_trusted_networks(
        &std::env::var("SUBSLAYER_TRUSTED_PROXIES").unwrap_or_default(),
    );

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        println!("   🔒 Authentication: Cloudflare Access (header)");
        if !api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (SUBSLAYER_API_KEYS)",
                api_keys.len()
            );
        }
        if !trusted_networks.is_empty() {
            println!(
                "   🏠 Trusted networks: {} (SUBSLAYER_TRUSTED_NETWORKS)",
                join_networks(&trusted_networks)
            );
        }
        if !trusted_proxies.is_empty() {
            println!(
                "   🔀 Trusted proxies: {} (SUBSLAYER_TRUSTED_PROXIES)",
                join_networks(&trusted_proxies)
            );
        }
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    if seed_sample_data {
        println!("   🌱 New users get sample subscriptions");
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = subslayer_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
        trusted_networks,
        trusted_proxies,
        seed_sample_data,
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path must be valid UTF-8"))
        .transpose()?;
    subslayer_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
