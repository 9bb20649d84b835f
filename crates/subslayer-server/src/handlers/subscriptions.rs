//! Subscription management handlers
//!
//! All rows are scoped to the authenticated caller.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};

use crate::{caller, read_json, AppError, AppState, SuccessResponse};
use subslayer_core::models::{NewSubscription, Subscription, SubscriptionUpdate};

/// GET /api/subscriptions - List the caller's subscriptions
///
/// With `seed_sample_data` enabled, a caller with no subscriptions gets the
/// sample set on first visit.
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let owner = caller(&request).user;

    if state.config.seed_sample_data {
        let today = chrono::Local::now().date_naive();
        let seeded = state.db.seed_sample_subscriptions(&owner, today)?;
        if seeded > 0 {
            state.db.log_audit(
                &owner,
                "seed",
                Some("subscription"),
                None,
                Some(&format!("count={}", seeded)),
            )?;
        }
    }

    let subscriptions = state.db.list_subscriptions(&owner)?;

    // Audit log - read access
    state.db.log_audit(
        &owner,
        "list",
        Some("subscription"),
        None,
        Some(&format!("count={}", subscriptions.len())),
    )?;

    Ok(Json(subscriptions))
}

/// POST /api/subscriptions - Create a subscription
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Subscription>, AppError> {
    let owner = caller(&request).user;
    let new: NewSubscription = read_json(request).await?;

    let subscription = state
        .db
        .create_subscription(&owner, &new)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        &owner,
        "create",
        Some("subscription"),
        Some(subscription.id),
        Some(&format!(
            "name={}, cost={:.2}, category={}",
            subscription.name, subscription.cost, subscription.category
        )),
    )?;

    Ok(Json(subscription))
}

/// GET /api/subscriptions/:id - Get a single subscription
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Subscription>, AppError> {
    let owner = caller(&request).user;

    let subscription = state
        .db
        .get_subscription(&owner, id)?
        .ok_or_else(|| AppError::not_found(&format!("Subscription {} not found", id)))?;

    state
        .db
        .log_audit(&owner, "get", Some("subscription"), Some(id), None)?;

    Ok(Json(subscription))
}

/// PUT /api/subscriptions/:id - Update some or all fields
pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Subscription>, AppError> {
    let owner = caller(&request).user;
    let update: SubscriptionUpdate = read_json(request).await?;

    if update.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }

    let subscription = state
        .db
        .update_subscription(&owner, id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found(&format!("Subscription {} not found", id)))?;

    state.db.log_audit(
        &owner,
        "update",
        Some("subscription"),
        Some(id),
        Some(&format!(
            "name={}, cost={:.2}, renewal_date={}, category={}",
            subscription.name, subscription.cost, subscription.renewal_date, subscription.category
        )),
    )?;

    Ok(Json(subscription))
}

/// DELETE /api/subscriptions/:id - Delete a subscription
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let owner = caller(&request).user;

    // Look it up first so the audit entry can name it
    let subscription = state
        .db
        .get_subscription(&owner, id)?
        .ok_or_else(|| AppError::not_found(&format!("Subscription {} not found", id)))?;

    state.db.delete_subscription(&owner, id)?;

    state.db.log_audit(
        &owner,
        "delete",
        Some("subscription"),
        Some(id),
        Some(&format!("name={}", subscription.name)),
    )?;

    Ok(Json(SuccessResponse { success: true }))
}
