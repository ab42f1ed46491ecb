use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_feature, delete_feature, get_feature, get_feature_stats, list_features, update_feature,
};
use crate::state::AppState;

pub fn init_features_router() -> Router<AppState> {
    // /stats is registered before /{feature_id} so the literal segment wins.
    Router::new()
        .route("/", get(list_features).post(create_feature))
        .route("/stats", get(get_feature_stats))
        .route(
            "/{feature_id}",
            get(get_feature)
                .put(update_feature)
                .patch(update_feature)
                .delete(delete_feature),
        )
}
