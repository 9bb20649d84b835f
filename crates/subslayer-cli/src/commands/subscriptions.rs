//! Subscription command implementations

use anyhow::{Context, Result};
use subslayer_core::db::Database;
use subslayer_core::models::{parse_cost, parse_date, Category, NewSubscription, SubscriptionUpdate};

use super::{format_money, truncate};

pub fn cmd_add(
    db: &Database,
    owner: &str,
    name: &str,
    cost: &str,
    renewal: &str,
    category: Option<&str>,
) -> Result<()> {
    let new = NewSubscription {
        name: name.to_string(),
        cost: parse_cost(cost)?,
        renewal_date: parse_date(renewal)?,
        category: category.map(Category::from_user_input).unwrap_or_default(),
    };

    let sub = db
        .create_subscription(owner, &new)
        .context("Failed to add subscription")?;
    tracing::info!(owner, id = sub.id, category = %sub.category, "Added subscription");

    if !sub.category.is_recognized() {
        println!(
            "   ⚠️  Unknown category '{}', it will be shown with the Other color",
            sub.category
        );
    }
    println!(
        "✅ Added {} ({}/mo, renews {}) [ID: {}]",
        sub.name,
        format_money(sub.cost),
        sub.renewal_date,
        sub.id
    );

    Ok(())
}

pub fn cmd_list(db: &Database, owner: &str) -> Result<()> {
    let subscriptions = db.list_subscriptions(owner)?;

    if subscriptions.is_empty() {
        println!("No subscriptions yet. Add one with:");
        println!("  subslayer add --name Netflix --cost 15.99 --renewal 2024-07-15");
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &subscriptions {
        println!(
            "   {:>4} │ {:24} │ {:>9}/mo │ {:16} │ renews {}",
            sub.id,
            truncate(&sub.name, 24),
            format_money(sub.cost),
            truncate(sub.category.as_str(), 16),
            sub.renewal_date
        );
    }

    Ok(())
}

pub fn cmd_edit(
    db: &Database,
    owner: &str,
    id: i64,
    name: Option<&str>,
    cost: Option<&str>,
    renewal: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let update = SubscriptionUpdate {
        name: name.map(str::to_string),
        cost: cost.map(parse_cost).transpose()?,
        renewal_date: renewal.map(parse_date).transpose()?,
        category: category.map(Category::from_user_input),
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass --name, --cost, --renewal or --category");
    }

    let sub = db
        .update_subscription(owner, id, &update)?
        .ok_or_else(|| anyhow::anyhow!("Subscription not found: {}", id))?;
    tracing::info!(owner, id, "Updated subscription");

    println!(
        "✅ Updated {} ({}/mo, renews {}, {})",
        sub.name,
        format_money(sub.cost),
        sub.renewal_date,
        sub.category
    );

    Ok(())
}

pub fn cmd_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    let sub = db
        .get_subscription(owner, id)?
        .ok_or_else(|| anyhow::anyhow!("Subscription not found: {}", id))?;

    db.delete_subscription(owner, id)?;
    tracing::info!(owner, id, "Deleted subscription");

    println!(
        "🗑️  Deleted {} (saves {}/yr)",
        sub.name,
        format_money(sub.yearly_cost())
    );

    Ok(())
}
