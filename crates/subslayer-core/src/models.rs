//! Domain models for SubSlayer

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spending category of a subscription
///
/// The eight known categories form a closed set. Text that matches none of them
/// is kept verbatim in `Unrecognized` so it still gets its own subtotal, while
/// display lookups (color) fall back to the `Other` treatment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Entertainment,
    Productivity,
    HealthFitness,
    NewsMedia,
    CloudStorage,
    Music,
    Gaming,
    Other,
    Unrecognized(String),
}

impl Category {
    /// Known categories in the order they are offered on input forms
    pub const ALL: [Category; 8] = [
        Category::Entertainment,
        Category::Productivity,
        Category::HealthFitness,
        Category::NewsMedia,
        Category::CloudStorage,
        Category::Music,
        Category::Gaming,
        Category::Other,
    ];

    /// Parse a stored or wire category name. Never fails: unknown text becomes
    /// `Unrecognized`.
    ///
    /// Only the exact display names match, so `"entertainment"` is its own
    /// unrecognized bucket rather than `Entertainment`. Empty text is `Other`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Self::Other;
        }

        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == trimmed)
            .unwrap_or_else(|| Self::Unrecognized(trimmed.to_string()))
    }

    /// Parse a category typed at the command line
    ///
    /// Matching ignores case, whitespace and punctuation, so `"health-fitness"` and
    /// `"HEALTH_FITNESS"` are both `HealthFitness`. Anything else goes through `parse`.
    pub fn from_user_input(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "other" => Self::Other,
            "entertainment" => Self::Entertainment,
            "productivity" => Self::Productivity,
            "healthfitness" => Self::HealthFitness,
            "newsmedia" => Self::NewsMedia,
            "cloudstorage" => Self::CloudStorage,
            "music" => Self::Music,
            "gaming" => Self::Gaming,
            _ => Self::parse(s),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Entertainment => "Entertainment",
            Self::Productivity => "Productivity",
            Self::HealthFitness => "Health & Fitness",
            Self::NewsMedia => "News & Media",
            Self::CloudStorage => "Cloud Storage",
            Self::Music => "Music",
            Self::Gaming => "Gaming",
            Self::Other => "Other",
            Self::Unrecognized(name) => name,
        }
    }

    /// Chart color for this category (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Self::Entertainment => "#e64980",
            Self::Productivity => "#00d9ff",
            Self::HealthFitness => "#10b981",
            Self::NewsMedia => "#f59e0b",
            Self::CloudStorage => "#8b5cf6",
            Self::Music => "#c084fc",
            Self::Gaming => "#0ea5e9",
            Self::Other | Self::Unrecognized(_) => "#6b7280",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked recurring subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    /// Identity of the user that owns this record
    pub owner: String,
    pub name: String,
    /// Monthly recurring amount, currency-agnostic
    pub cost: f64,
    /// Date of the next billing event
    pub renewal_date: NaiveDate,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Cost used for aggregation.
    ///
    /// Negative and non-finite costs violate the store contract; they count as zero
    /// instead of poisoning totals.
    pub fn effective_cost(&self) -> f64 {
        if self.cost.is_finite() && self.cost > 0.0 {
            self.cost
        } else {
            0.0
        }
    }

    pub fn yearly_cost(&self) -> f64 {
        self.effective_cost() * 12.0
    }
}

/// Input for creating a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub cost: f64,
    pub renewal_date: NaiveDate,
    #[serde(default)]
    pub category: Category,
}

impl NewSubscription {
    /// Check the input and return a normalized copy (trimmed name)
    pub fn validate(&self) -> Result<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            cost: validate_cost(self.cost)?,
            renewal_date: self.renewal_date,
            category: self.category.clone(),
        })
    }
}

/// Partial update of a subscription; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub renewal_date: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl SubscriptionUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cost.is_none()
            && self.renewal_date.is_none()
            && self.category.is_none()
    }

    pub fn validate(&self) -> Result<Self> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            cost: self.cost.map(validate_cost).transpose()?,
            renewal_date: self.renewal_date,
            category: self.category.clone(),
        })
    }

}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidData(
            "Subscription name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_cost(cost: f64) -> Result<f64> {
    if !cost.is_finite() {
        return Err(Error::InvalidData(format!("Invalid cost: {}", cost)));
    }
    if cost < 0.0 {
        return Err(Error::InvalidData(format!(
            "Cost must not be negative: {:.2}",
            cost
        )));
    }
    Ok(cost)
}

/// Parse a monthly cost as typed by a user ("9.99" or "$9.99")
pub fn parse_cost(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let cost: f64 = digits
        .parse()
        .map_err(|_| Error::InvalidData(format!("Invalid cost: {}", s)))?;
    validate_cost(cost)
}

/// Parse a renewal date in `YYYY-MM-DD` form
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidData(format!("Invalid date (use YYYY-MM-DD): {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known_names() {
        assert_eq!(Category::parse("Entertainment"), Category::Entertainment);
        assert_eq!(Category::parse("Health & Fitness"), Category::HealthFitness);
        assert_eq!(Category::parse(" Cloud Storage "), Category::CloudStorage);
        assert_eq!(Category::parse(""), Category::Other);
    }

    #[test]
    fn test_category_parse_is_exact() {
        for text in ["entertainment", "ENTERTAINMENT", "health-fitness", "NEWS_MEDIA"] {
            let category = Category::parse(text);
            assert_eq!(category, Category::Unrecognized(text.to_string()));
            assert_eq!(category.as_str(), text);
        }

        let parsed: Category = serde_json::from_str(r#""entertainment""#).unwrap();
        assert_eq!(parsed, Category::Unrecognized("entertainment".to_string()));
    }

    #[test]
    fn test_category_from_user_input_is_lenient() {
        assert_eq!(Category::from_user_input("entertainment"), Category::Entertainment);
        assert_eq!(Category::from_user_input("health-fitness"), Category::HealthFitness);
        assert_eq!(Category::from_user_input("NEWS_MEDIA"), Category::NewsMedia);
        assert_eq!(Category::from_user_input(" cloud storage "), Category::CloudStorage);
        assert_eq!(Category::from_user_input(""), Category::Other);
        assert_eq!(
            Category::from_user_input(" Audiobooks "),
            Category::Unrecognized("Audiobooks".to_string())
        );
    }

    #[test]
    fn test_category_parse_round_trips_display_names() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), category);
        }
    }

    #[test]
    fn test_unrecognized_category_keeps_text_and_default_color() {
        let category = Category::parse("Streaming");
        assert_eq!(category, Category::Unrecognized("Streaming".to_string()));
        assert_eq!(category.as_str(), "Streaming");
        assert_eq!(category.color(), Category::Other.color());
        assert!(!category.is_recognized());
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::HealthFitness).unwrap();
        assert_eq!(json, r#""Health & Fitness""#);

        let parsed: Category = serde_json::from_str(r#""Gaming""#).unwrap();
        assert_eq!(parsed, Category::Gaming);

        let parsed: Category = serde_json::from_str(r#""Podcasts""#).unwrap();
        assert_eq!(parsed, Category::Unrecognized("Podcasts".to_string()));
    }

    #[test]
    fn test_new_subscription_validate_trims_name() {
        let input = NewSubscription {
            name: "  Netflix ".to_string(),
            cost: 15.99,
            renewal_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            category: Category::Entertainment,
        };
        let valid = input.validate().unwrap();
        assert_eq!(valid.name, "Netflix");
    }

    #[test]
    fn test_new_subscription_validate_rejects_bad_input() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let blank = NewSubscription {
            name: "   ".to_string(),
            cost: 1.0,
            renewal_date: date,
            category: Category::Other,
        };
        assert!(matches!(blank.validate(), Err(Error::InvalidData(_))));

        let negative = NewSubscription {
            name: "Gym".to_string(),
            cost: -5.0,
            renewal_date: date,
            category: Category::Other,
        };
        assert!(matches!(negative.validate(), Err(Error::InvalidData(_))));

        let nan = NewSubscription {
            name: "Gym".to_string(),
            cost: f64::NAN,
            renewal_date: date,
            category: Category::Other,
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_subscription_update_is_empty() {
        let update = SubscriptionUpdate {
            cost: Some(17.99),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(SubscriptionUpdate::default().is_empty());
    }

    #[test]
    fn test_parse_cost() {
        assert_eq!(parse_cost("9.99").unwrap(), 9.99);
        assert_eq!(parse_cost("$12.50").unwrap(), 12.5);
        assert_eq!(parse_cost("0").unwrap(), 0.0);
        assert!(parse_cost("abc").is_err());
        assert!(parse_cost("-1").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("02/29/2024").is_err());
    }

    #[test]
    fn test_effective_cost_clamps_contract_violations() {
        let mut sub = Subscription {
            id: 1,
            owner: "me".to_string(),
            name: "Broken".to_string(),
            cost: -3.0,
            renewal_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            category: Category::Other,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(sub.effective_cost(), 0.0);
        sub.cost = f64::INFINITY;
        assert_eq!(sub.effective_cost(), 0.0);
        sub.cost = 4.5;
        assert_eq!(sub.yearly_cost(), 54.0);
    }
}
