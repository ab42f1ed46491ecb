use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{change_password, get_current_user, login, logout, verify_token};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_current_user))
        .route("/logout", post(logout))
        .route("/verify-token", post(verify_token))
        .route("/change-password", post(change_password))
}
