//! Spend summary handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Serialize;

use crate::{caller, AppError, AppState};
use subslayer_core::insights::{aggregate, upcoming_renewals, Advisory, Summary};
use subslayer_core::models::{Category, Subscription};

/// Response for GET /api/summary
#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: Summary,
    pub advisories: Vec<Advisory>,
}

/// A selectable category with its chart color
#[derive(Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub color: &'static str,
}

/// GET /api/categories - Known categories in form order
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    let categories = Category::ALL
        .iter()
        .map(|c| CategoryInfo {
            name: c.as_str().to_string(),
            color: c.color(),
        })
        .collect();

    Json(categories)
}

/// GET /api/summary - Totals, category breakdown and advisories for the caller
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<SummaryResponse>, AppError> {
    let owner = caller(&request).user;

    let subscriptions = state.db.list_subscriptions(&owner)?;
    let summary = aggregate(&subscriptions);
    let advisories = summary.advisories();

    state.db.log_audit(
        &owner,
        "view",
        Some("summary"),
        None,
        Some(&format!(
            "count={}, total_monthly={:.2}",
            summary.active_count, summary.total_monthly
        )),
    )?;

    Ok(Json(SummaryResponse {
        summary,
        advisories,
    }))
}

/// GET /api/renewals/upcoming - Subscriptions renewing within the next week
pub async fn list_upcoming_renewals(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let owner = caller(&request).user;

    let subscriptions = state.db.list_subscriptions(&owner)?;
    let today = chrono::Local::now().date_naive();
    let upcoming: Vec<Subscription> = upcoming_renewals(&subscriptions, today)
        .into_iter()
        .cloned()
        .collect();

    state.db.log_audit(
        &owner,
        "list",
        Some("upcoming_renewal"),
        None,
        Some(&format!("count={}", upcoming.len())),
    )?;

    Ok(Json(upcoming))
}
