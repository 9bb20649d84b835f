//! Spend insights
//!
//! Everything here is a pure function of a subscription snapshot. Nothing is
//! cached: callers recompute a [`Summary`] whenever their list changes, and the
//! newest result simply replaces the previous one.
//!
//! ## Pieces
//!
//! - **Aggregator** - totals, yearly projection, category breakdown, most
//!   expensive subscription, upcoming renewals
//! - **Entertainment insight** - overspend warning with a suggested cancellation
//! - **Advisories** - presentation-ready messages derived from a summary
//!
//! ## Usage
//!
//! ```rust,ignore
//! use subslayer_core::insights::aggregate;
//!
//! let subs = db.list_subscriptions("alice@example.com")?;
//! let summary = aggregate(&subs);
//! for advisory in summary.advisories() {
//!     println!("{}: {}", advisory.title, advisory.summary);
//! }
//! ```

pub mod aggregator;
pub mod entertainment;
pub mod types;

pub use aggregator::{
    aggregate, aggregate_on, upcoming_renewals, CategorySpending, Summary,
    UPCOMING_RENEWAL_WINDOW_DAYS,
};
pub use entertainment::{EntertainmentInsight, ENTERTAINMENT_THRESHOLD};
pub use types::{Advisory, Severity};
