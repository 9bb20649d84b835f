//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init command and shared utilities (open_db)
//! - `serve` - Web server command
//! - `subscriptions` - Add/list/edit/delete subscriptions
//! - `summary` - Spend summary, upcoming renewals, categories

pub mod core;
pub mod serve;
pub mod subscriptions;
pub mod summary;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use subscriptions::*;
pub use summary::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount as dollars with two decimals
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}
