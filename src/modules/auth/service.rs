use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{LoginData, LoginRequest};
use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_token;
use crate::utils::password::{hash_password, verify_password};

pub struct AuthService;

impl AuthService {
    /// Exchange credentials for a bearer token.
    ///
    /// Unknown email and wrong password answer identically so the response
    /// does not reveal which accounts exist. A disabled account fails before
    /// the password check and never touches `last_login`.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginData, AppError> {
        let credentials = UserService::find_credentials_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !credentials.enabled {
            return Err(AppError::unauthorized(
                "Account is disabled. Please contact administrator.",
            ));
        }

        if !verify_password(&dto.password, &credentials.password)? {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET last_login = now()
             WHERE id = $1
             RETURNING id, name, email, role, enabled, last_login, created_at, updated_at",
        )
        .bind(credentials.id)
        .fetch_one(db)
        .await?;

        let token = create_token(user.id, &user.email, &user.role, jwt_config)?;

        Ok(LoginData { token, user })
    }

    /// Self-service password change; requires the current password.
    #[instrument(skip(db, current_password, new_password))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let stored = sqlx::query_as::<_, (String,)>("SELECT password FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !verify_password(current_password, &stored.0)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let hashed = hash_password(new_password)?;

        sqlx::query("UPDATE users SET password = $1, updated_at = now() WHERE id = $2")
            .bind(&hashed)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }
}
