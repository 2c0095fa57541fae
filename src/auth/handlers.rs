use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
            UserSummary, UserView,
        },
        extractors::CurrentUser,
        jwt::JwtKeys,
        password,
    },
    error::ApiError,
    state::AppState,
    store::{Role, User},
};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    let mut db = state.store.load()?;
    if db.find_by_username(&payload.username).is_some() {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("Username is already taken".into()));
    }

    let hash = password::hash_password(&payload.password, state.config.hash_cost)?;
    let user = User {
        id: db.allocate_id(),
        username: payload.username,
        password_hash: hash,
        role: Role::User,
        active: true,
    };
    let summary = UserSummary::from(&user);
    db.users.push(user);
    state.store.save(&db)?;

    info!(user_id = summary.id, username = %summary.username, "user registered");
    Ok((StatusCode::CREATED, Json(summary)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    let db = state.store.load()?;

    // Order matters: a deactivated account reports 403 even when the
    // password is also wrong.
    let user = db.find_by_username(&payload.username).ok_or_else(|| {
        warn!(username = %payload.username, "login with unknown username");
        ApiError::InvalidCredentials
    })?;
    if !user.active {
        warn!(user_id = user.id, "login on deactivated account");
        return Err(ApiError::AccountDeactivated);
    }
    if !password::verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(user), fields(user_id = user.0.id))]
pub async fn me(user: CurrentUser) -> Result<Json<UserView>, ApiError> {
    Ok(Json(UserView::from(&user.0)))
}

#[instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let CurrentUser(user) = user;
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::Validation(
            "Current and new password are required".into(),
        ));
    }

    let mut db = state.store.load()?;
    let record = db
        .find_by_id_mut(user.id)
        .ok_or(ApiError::AccountDeactivated)?;
    if !password::verify_password(&payload.current_password, &record.password_hash) {
        warn!(user_id = user.id, "wrong current password");
        return Err(ApiError::InvalidCredentials);
    }
    record.password_hash = password::hash_password(&payload.new_password, state.config.hash_cost)?;
    state.store.save(&db)?;

    info!(user_id = user.id, "password changed");
    Ok(Json(MessageResponse {
        message: "Password changed".into(),
    }))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn deactivate(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let CurrentUser(user) = user;
    let mut db = state.store.load()?;
    if let Some(record) = db.find_by_id_mut(user.id) {
        record.active = false;
    }
    state.store.save(&db)?;

    info!(user_id = user.id, "account deactivated");
    Ok(Json(MessageResponse {
        message: "Account deactivated".into(),
    }))
}
