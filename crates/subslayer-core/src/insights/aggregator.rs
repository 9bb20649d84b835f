//! Spend aggregation over a subscription snapshot

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::entertainment::EntertainmentInsight;
use super::types::Advisory;
use crate::models::{Category, Subscription};

/// Renewals due within this many days (inclusive) count as upcoming
pub const UPCOMING_RENEWAL_WINDOW_DAYS: u64 = 7;

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: Category,
    pub amount: f64,
    /// Share of the monthly total, 0-100
    pub percentage: f64,
    pub subscription_count: usize,
    /// Chart color (hex)
    pub color: String,
}

/// Aggregated view of a subscription list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Date the upcoming-renewal window was measured from
    pub as_of: NaiveDate,
    pub total_monthly: f64,
    pub total_yearly: f64,
    pub active_count: usize,
    pub most_expensive: Option<Subscription>,
    /// Categories with at least one subscription, in first-seen order
    pub by_category: Vec<CategorySpending>,
    pub upcoming_renewal_count: usize,
    pub entertainment: EntertainmentInsight,
}

impl Summary {
    /// Subtotal for a category; categories without subscriptions read as zero
    pub fn category_total(&self, category: &Category) -> f64 {
        self.by_category
            .iter()
            .find(|c| &c.category == category)
            .map(|c| c.amount)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.active_count == 0
    }

    /// Presentation-ready messages for this summary
    pub fn advisories(&self) -> Vec<Advisory> {
        Advisory::for_summary(self)
    }
}

/// Aggregate a snapshot using today's local date for the renewal window
pub fn aggregate(subscriptions: &[Subscription]) -> Summary {
    aggregate_on(subscriptions, Local::now().date_naive())
}

/// Aggregate a snapshot with an explicit "today"
///
/// Costs are read through [`Subscription::effective_cost`]. Ties for the most
/// expensive subscription go to the one that appears first.
pub fn aggregate_on(subscriptions: &[Subscription], today: NaiveDate) -> Summary {
    let mut total_monthly = 0.0;
    let mut most_expensive: Option<&Subscription> = None;
    let mut by_category: Vec<CategorySpending> = Vec::new();

    for sub in subscriptions {
        let cost = sub.effective_cost();
        total_monthly += cost;

        if most_expensive.map_or(true, |max| cost > max.effective_cost()) {
            most_expensive = Some(sub);
        }

        match by_category.iter_mut().find(|c| c.category == sub.category) {
            Some(entry) => {
                entry.amount += cost;
                entry.subscription_count += 1;
            }
            None => by_category.push(CategorySpending {
                category: sub.category.clone(),
                amount: cost,
                percentage: 0.0,
                subscription_count: 1,
                color: sub.category.color().to_string(),
            }),
        }
    }

    if total_monthly > 0.0 {
        for entry in &mut by_category {
            entry.percentage = entry.amount / total_monthly * 100.0;
        }
    }

    let upcoming_renewal_count = subscriptions
        .iter()
        .filter(|s| renews_within_window(s, today))
        .count();

    Summary {
        as_of: today,
        total_monthly,
        total_yearly: total_monthly * 12.0,
        active_count: subscriptions.len(),
        most_expensive: most_expensive.cloned(),
        by_category,
        upcoming_renewal_count,
        entertainment: EntertainmentInsight::evaluate(subscriptions),
    }
}

/// Subscriptions renewing in `[today, today + 7 days]`, soonest first
pub fn upcoming_renewals(subscriptions: &[Subscription], today: NaiveDate) -> Vec<&Subscription> {
    let mut upcoming: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|s| renews_within_window(s, today))
        .collect();
    upcoming.sort_by_key(|s| s.renewal_date);
    upcoming
}

fn renews_within_window(sub: &Subscription, today: NaiveDate) -> bool {
    let window_end = today
        .checked_add_days(Days::new(UPCOMING_RENEWAL_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);
    sub.renewal_date >= today && sub.renewal_date <= window_end
}
