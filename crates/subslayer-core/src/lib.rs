//! SubSlayer Core Library
//!
//! Shared functionality for the SubSlayer subscription tracker:
//! - Subscription and category models with input validation
//! - Database access and migrations (per-owner subscription store, audit log)
//! - Spend aggregation: totals, category breakdown, upcoming renewals
//! - Entertainment-overspend insight and presentation-ready advisories

pub mod db;
pub mod error;
pub mod insights;
pub mod models;

pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use insights::{
    aggregate, aggregate_on, upcoming_renewals, Advisory, CategorySpending, EntertainmentInsight,
    Severity, Summary,
};
pub use models::{Category, NewSubscription, Subscription, SubscriptionUpdate};
