use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{MessageResponse, UserView},
        extractors::AdminUser,
    },
    error::ApiError,
    state::AppState,
};

/// Every user, with the password hash stripped. Admin only.
#[instrument(skip(state, admin), fields(admin_id = admin.0.id))]
pub async fn list_users(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let db = state.store.load()?;
    let users: Vec<UserView> = db.users.iter().map(UserView::from).collect();
    Ok(Json(users))
}

/// Sets a user back to active. Idempotent; unknown ids are 404.
#[instrument(skip(state, admin), fields(admin_id = admin.0.id))]
pub async fn reactivate(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut db = state.store.load()?;
    let record = db
        .find_by_id_mut(id)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    record.active = true;
    let username = record.username.clone();
    state.store.save(&db)?;

    info!(user_id = id, admin_id = admin.0.id, "account reactivated");
    Ok(Json(MessageResponse {
        message: format!("{username} reactivated"),
    }))
}
