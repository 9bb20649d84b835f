//! Entertainment overspend detection
//!
//! When the Entertainment subtotal goes over [`ENTERTAINMENT_THRESHOLD`], the
//! cheapest Entertainment subscription is suggested for cancellation since it is
//! the easiest one to give up. The savings figures are that subscription's cost.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Subscription};

/// Monthly Entertainment spend above which a warning is raised (strictly greater)
pub const ENTERTAINMENT_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntertainmentInsight {
    pub entertainment_total: f64,
    pub subscription_count: usize,
    pub warning_active: bool,
    /// Only present while the warning is active
    pub suggested_cancellation: Option<Subscription>,
    pub potential_monthly_saving: f64,
    pub potential_yearly_saving: f64,
}

impl EntertainmentInsight {
    pub fn evaluate(subscriptions: &[Subscription]) -> Self {
        let mut total = 0.0;
        let mut count = 0;
        let mut cheapest: Option<&Subscription> = None;

        for sub in subscriptions
            .iter()
            .filter(|s| s.category == Category::Entertainment)
        {
            let cost = sub.effective_cost();
            total += cost;
            count += 1;

            // First one wins on ties
            if cheapest.map_or(true, |min| cost < min.effective_cost()) {
                cheapest = Some(sub);
            }
        }

        let warning_active = total > ENTERTAINMENT_THRESHOLD;
        let suggested = if warning_active { cheapest } else { None };
        let monthly = suggested.map(Subscription::effective_cost).unwrap_or(0.0);

        Self {
            entertainment_total: total,
            subscription_count: count,
            warning_active,
            suggested_cancellation: suggested.cloned(),
            potential_monthly_saving: monthly,
            potential_yearly_saving: monthly * 12.0,
        }
    }
}
