use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::list_users))
        .route("/admin/reactivate/:id", put(handlers::reactivate))
}
