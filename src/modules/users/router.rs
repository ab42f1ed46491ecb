use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use super::controller::{
    create_user, delete_user, get_all_users, get_user_by_id, toggle_user_status, update_user,
};
use crate::state::AppState;

pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_all_users))
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user_by_id))
        .route("/users/{user_id}", put(update_user))
        .route("/users/{user_id}/toggle", patch(toggle_user_status))
        .route("/users/{user_id}", delete(delete_user))
}
