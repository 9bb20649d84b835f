//! Authentication-related handlers

use axum::{extract::Request, Json};
use serde::Serialize;

use crate::caller;

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    /// The authenticated user's email or identifier
    pub user: String,
    /// How the user was authenticated
    pub auth_method: String,
}

/// GET /api/me - Who the server thinks the caller is
pub async fn get_me(request: Request) -> Json<MeResponse> {
    let caller = caller(&request);

    Json(MeResponse {
        user: caller.user,
        auth_method: caller.auth_method.as_str().to_string(),
    })
}
