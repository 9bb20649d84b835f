//! Spend summary command implementations

use anyhow::{Context, Result};
use chrono::Local;
use subslayer_core::db::Database;
use subslayer_core::insights::{aggregate, upcoming_renewals, Severity, Summary};
use subslayer_core::models::Category;

use super::{format_money, truncate};

pub fn cmd_summary(db: &Database, owner: &str, json: bool) -> Result<()> {
    let subscriptions = db.list_subscriptions(owner)?;
    let summary = aggregate(&subscriptions);
    tracing::debug!(
        owner,
        as_of = %summary.as_of,
        count = summary.active_count,
        "Aggregated subscriptions"
    );

    if json {
        let output = serde_json::json!({
            "summary": summary,
            "advisories": summary.advisories(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!();
    println!("💸 Spend Summary");
    println!("   ─────────────────────────────");
    println!("   Monthly:        {}", format_money(summary.total_monthly));
    println!("   Yearly:         {}", format_money(summary.total_yearly));
    println!("   Subscriptions:  {}", summary.active_count);
    println!(
        "   Renewing soon:  {} (next 7 days)",
        summary.upcoming_renewal_count
    );
    if let Some(top) = &summary.most_expensive {
        println!(
            "   Most expensive: {} ({}/mo)",
            top.name,
            format_money(top.cost)
        );
    }

    if !summary.by_category.is_empty() {
        println!();
        println!("📊 By Category");
        for entry in &summary.by_category {
            println!(
                "   {:18} {:>10}  {:>5.1}%  ({})",
                truncate(entry.category.as_str(), 18),
                format_money(entry.amount),
                entry.percentage,
                entry.subscription_count
            );
        }
    }

    println!();
    println!("💡 Insights");
    for advisory in summary.advisories() {
        tracing::debug!(severity = %advisory.severity, title = %advisory.title, "Advisory");
        let icon = match advisory.severity {
            Severity::Warning => "⚠️ ",
            Severity::Attention => "✂️ ",
            Severity::Info => "ℹ️ ",
        };
        println!("   {} {}", icon, advisory.title);
        println!("      {}", advisory.summary);
    }
}

pub fn cmd_upcoming(db: &Database, owner: &str) -> Result<()> {
    let subscriptions = db.list_subscriptions(owner)?;
    let today = Local::now().date_naive();
    let upcoming = upcoming_renewals(&subscriptions, today);

    if upcoming.is_empty() {
        println!("✅ No renewals in the next 7 days");
        return Ok(());
    }

    println!();
    println!("📅 Upcoming Renewals");
    println!("   ─────────────────────────────");

    for sub in upcoming {
        let days = (sub.renewal_date - today).num_days();
        let when = match days {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {} days", n),
        };
        println!(
            "   {:24} {:>9}  {} ({})",
            truncate(&sub.name, 24),
            format_money(sub.cost),
            sub.renewal_date,
            when
        );
    }

    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    println!();
    println!("🏷️  Categories");
    for category in Category::ALL.iter() {
        println!("   {:18} {}", category.as_str(), category.color());
    }
    Ok(())
}
