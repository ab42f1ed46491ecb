use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{ChangePasswordRequest, LoginData, LoginRequest};
use crate::modules::features::model::{
    Attachment, CreateFeatureDto, Feature, FeatureData, FeatureListData, FeaturePagination,
    FeaturePriority, FeatureStatsData, FeatureStatus, PriorityCounts, StatusCounts,
    UpdateFeatureDto,
};
use crate::modules::uploads::model::UploadData;
use crate::modules::users::model::{
    CreateUserDto, ToggleUserDto, UpdateUserDto, User, UserData, UserRole, UsersData,
};
use crate::utils::errors::FieldError;
use crate::utils::pagination::PaginationParams;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health_check,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_current_user,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::verify_token,
        crate::modules::auth::controller::change_password,
        crate::modules::features::controller::list_features,
        crate::modules::features::controller::get_feature_stats,
        crate::modules::features::controller::get_feature,
        crate::modules::features::controller::create_feature,
        crate::modules::features::controller::update_feature,
        crate::modules::features::controller::delete_feature,
        crate::modules::uploads::controller::upload_attachments,
        crate::modules::uploads::controller::delete_attachment,
        crate::modules::users::controller::get_all_users,
        crate::modules::users::controller::get_user_by_id,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::toggle_user_status,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserData,
            UsersData,
            CreateUserDto,
            UpdateUserDto,
            ToggleUserDto,
            LoginRequest,
            LoginData,
            ChangePasswordRequest,
            Feature,
            FeatureStatus,
            FeaturePriority,
            Attachment,
            CreateFeatureDto,
            UpdateFeatureDto,
            FeatureData,
            FeatureListData,
            FeaturePagination,
            FeatureStatsData,
            StatusCounts,
            PriorityCounts,
            UploadData,
            FieldError,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Login and session endpoints"),
        (name = "Features", description = "Public feature showcase and admin feature management"),
        (name = "Uploads", description = "Feature attachment uploads"),
        (name = "Admin", description = "Super admin user management")
    ),
    info(
        title = "FeatureBoard API",
        version = "0.1.0",
        description = "Feature-tracking REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication and role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
