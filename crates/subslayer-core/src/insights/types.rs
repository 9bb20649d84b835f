//! Advisory messages shown alongside a summary

use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregator::{Summary, UPCOMING_RENEWAL_WINDOW_DAYS};
use super::entertainment::ENTERTAINMENT_THRESHOLD;

/// Severity level of an advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// A concrete step the user could take
    Attention,
    /// Spending crossed a threshold
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message derived from a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub severity: Severity,
    /// Short title (e.g., "High Entertainment Spending")
    pub title: String,
    /// One-line summary
    pub summary: String,
}

impl Advisory {
    pub fn new(severity: Severity, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Build the advisories for a summary, most relevant first
    pub fn for_summary(summary: &Summary) -> Vec<Advisory> {
        if summary.is_empty() {
            return vec![Advisory::new(
                Severity::Info,
                "No subscriptions yet",
                "Add subscriptions to see savings opportunities.",
            )];
        }

        let mut advisories = Vec::new();
        let insight = &summary.entertainment;

        if insight.warning_active {
            advisories.push(Advisory::new(
                Severity::Warning,
                "High Entertainment Spending",
                format!(
                    "You're spending ${:.2}/mo on Entertainment, more than ${:.0}.",
                    insight.entertainment_total, ENTERTAINMENT_THRESHOLD
                ),
            ));

            if let Some(sub) = &insight.suggested_cancellation {
                advisories.push(Advisory::new(
                    Severity::Attention,
                    format!("Consider canceling {}", sub.name),
                    format!(
                        "Save ${:.2}/mo (${:.2}/yr)",
                        insight.potential_monthly_saving, insight.potential_yearly_saving
                    ),
                ));
            }
        } else {
            advisories.push(Advisory::new(
                Severity::Info,
                "Your spending looks healthy!",
                format!(
                    "Entertainment spending is within ${:.0}/mo.",
                    ENTERTAINMENT_THRESHOLD
                ),
            ));
        }

        if summary.upcoming_renewal_count > 0 {
            let noun = if summary.upcoming_renewal_count == 1 {
                "renewal"
            } else {
                "renewals"
            };
            advisories.push(Advisory::new(
                Severity::Info,
                "Upcoming renewals",
                format!(
                    "{} {} in the next {} days",
                    summary.upcoming_renewal_count, noun, UPCOMING_RENEWAL_WINDOW_DAYS
                ),
            ));
        }

        advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::aggregate_on;
    use crate::models::{Category, Subscription};
    use chrono::{NaiveDate, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn sub(name: &str, cost: f64, category: Category, renewal_day: u32) -> Subscription {
        Subscription {
            id: 0,
            owner: "tester".to_string(),
            name: name.to_string(),
            cost,
            renewal_date: NaiveDate::from_ymd_opt(2024, 6, renewal_day).unwrap(),
            category,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_severity_names() {
        for severity in [Severity::Info, Severity::Attention, Severity::Warning] {
            let json = serde_json::to_string(&severity).unwrap();
            assert_eq!(json, format!("\"{}\"", severity.as_str()));
            assert_eq!(severity.to_string(), severity.as_str());
        }
    }

    #[test]
    fn test_empty_summary_advisory() {
        let advisories = aggregate_on(&[], today()).advisories();

        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].severity, Severity::Info);
        assert_eq!(
            advisories[0].summary,
            "Add subscriptions to see savings opportunities."
        );
    }

    #[test]
    fn test_healthy_spending_advisory() {
        let subs = vec![sub("Netflix", 15.99, Category::Entertainment, 30)];
        let advisories = aggregate_on(&subs, today()).advisories();

        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].title, "Your spending looks healthy!");
    }

    #[test]
    fn test_overspend_advisories() {
        let subs = vec![
            sub("Hulu", 35.99, Category::Entertainment, 12),
            sub("Peacock", 20.00, Category::Entertainment, 30),
        ];
        let advisories = aggregate_on(&subs, today()).advisories();

        assert_eq!(advisories.len(), 3);
        assert_eq!(advisories[0].severity, Severity::Warning);
        assert_eq!(advisories[0].title, "High Entertainment Spending");
        assert!(advisories[0].summary.contains("$55.99"));

        assert_eq!(advisories[1].severity, Severity::Attention);
        assert_eq!(advisories[1].title, "Consider canceling Peacock");
        assert_eq!(advisories[1].summary, "Save $20.00/mo ($240.00/yr)");

        assert_eq!(advisories[2].summary, "1 renewal in the next 7 days");
    }
}
