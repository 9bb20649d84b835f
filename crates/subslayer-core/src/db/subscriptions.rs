//! Subscription operations
//!
//! Every query is scoped by `owner`; one user never sees another user's rows.

use chrono::{Datelike, Months, NaiveDate};
use rusqlite::{params, Row};
use tracing::{debug, info};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, NewSubscription, Subscription, SubscriptionUpdate};

const SUBSCRIPTION_COLUMNS: &str =
    "id, owner, name, cost, renewal_date, category, created_at, updated_at";

fn row_to_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    let renewal_str: String = row.get(4)?;
    let category_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;
    let updated_at_str: String = row.get(7)?;

    let renewal_date = NaiveDate::parse_from_str(&renewal_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Subscription {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        cost: row.get(3)?,
        renewal_date,
        category: Category::parse(&category_str),
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

impl Database {
    /// Create a subscription for `owner`
    ///
    /// The input is validated (trimmed name, non-negative cost) before it is stored.
    pub fn create_subscription(&self, owner: &str, new: &NewSubscription) -> Result<Subscription> {
        let new = new.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO subscriptions (owner, name, cost, renewal_date, category)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                owner,
                new.name,
                new.cost,
                new.renewal_date.to_string(),
                new.category.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        debug!(owner, id, name = %new.name, "Created subscription");

        self.get_subscription(owner, id)?
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", id)))
    }

    /// Get a subscription by ID
    pub fn get_subscription(&self, owner: &str, id: i64) -> Result<Option<Subscription>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            &format!(
                "SELECT {} FROM subscriptions WHERE owner = ? AND id = ?",
                SUBSCRIPTION_COLUMNS
            ),
            params![owner, id],
            row_to_subscription,
        );

        match result {
            Ok(sub) => Ok(Some(sub)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List an owner's subscriptions, soonest renewal first
    pub fn list_subscriptions(&self, owner: &str) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subscriptions WHERE owner = ? ORDER BY renewal_date ASC, id ASC",
            SUBSCRIPTION_COLUMNS
        ))?;

        let subscriptions = stmt
            .query_map(params![owner], row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    /// Count an owner's subscriptions
    pub fn count_subscriptions(&self, owner: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM subscriptions WHERE owner = ?",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Apply a partial update
    ///
    /// Only the fields present in `update` are written, in a single statement, so
    /// concurrent edits to different fields do not overwrite each other.
    /// Returns the updated subscription, or `None` if the owner has no such row.
    pub fn update_subscription(
        &self,
        owner: &str,
        id: i64,
        update: &SubscriptionUpdate,
    ) -> Result<Option<Subscription>> {
        let update = update.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE subscriptions
            SET name = COALESCE(?, name),
                cost = COALESCE(?, cost),
                renewal_date = COALESCE(?, renewal_date),
                category = COALESCE(?, category),
                updated_at = CURRENT_TIMESTAMP
            WHERE owner = ? AND id = ?
            "#,
            params![
                update.name,
                update.cost,
                update.renewal_date.map(|d| d.to_string()),
                update.category.as_ref().map(|c| c.as_str()),
                owner,
                id,
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        debug!(owner, id, "Updated subscription");

        self.get_subscription(owner, id)
    }

    /// Delete a subscription. Returns false when nothing matched.
    pub fn delete_subscription(&self, owner: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM subscriptions WHERE owner = ? AND id = ?",
            params![owner, id],
        )?;
        Ok(deleted > 0)
    }

    /// Give a new user a starter set of subscriptions
    ///
    /// Does nothing when the owner already has subscriptions. Renewal dates are
    /// placed in the current and next month relative to `today`.
    pub fn seed_sample_subscriptions(&self, owner: &str, today: NaiveDate) -> Result<usize> {
        if self.count_subscriptions(owner)? > 0 {
            return Ok(0);
        }

        let samples = sample_subscriptions(today);
        for sample in &samples {
            self.create_subscription(owner, sample)?;
        }

        info!(owner, count = samples.len(), "Seeded sample subscriptions");
        Ok(samples.len())
    }
}

fn sample_subscriptions(today: NaiveDate) -> Vec<NewSubscription> {
    let this_month = today.with_day(1).unwrap_or(today);
    let next_month = this_month
        .checked_add_months(Months::new(1))
        .unwrap_or(this_month);
    let day = |month: NaiveDate, d: u32| month.with_day(d).unwrap_or(month);

    let sample = |name: &str, cost: f64, renewal_date: NaiveDate, category: Category| {
        NewSubscription {
            name: name.to_string(),
            cost,
            renewal_date,
            category,
        }
    };

    vec![
        sample("Netflix", 15.99, day(this_month, 15), Category::Entertainment),
        sample("Spotify", 9.99, day(this_month, 22), Category::Music),
        sample("Planet Fitness", 24.99, next_month, Category::HealthFitness),
        sample("Disney+", 13.99, day(this_month, 8), Category::Entertainment),
        sample("iCloud Storage", 2.99, day(this_month, 28), Category::CloudStorage),
        sample("Xbox Game Pass", 16.99, day(next_month, 5), Category::Gaming),
    ]
}
