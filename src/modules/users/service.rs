use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{
    CreateUserDto, UpdateUserDto, User, UserCredentials, UserRole,
};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

/// Sanitized projection; the password column stays out of every query that
/// feeds a response.
const USER_COLUMNS: &str = "id, name, email, role, enabled, last_login, created_at, updated_at";

pub struct UserService;

impl UserService {
    /// Case-normalized credential lookup for login.
    #[instrument(skip(db))]
    pub async fn find_credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password, role, enabled, last_login, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_all_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(db))]
    pub async fn get_user_by_id(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Create an account. Email is stored lowercased; the role defaults to
    /// `admin` and the account starts enabled.
    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let email = dto.email.trim().to_lowercase();

        let existing = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(db)
            .await?;

        if existing.is_some() {
            return Err(AppError::duplicate("User with this email already exists"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role, enabled)
             VALUES ($1, $2, $3, $4, TRUE)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&email)
        .bind(&hashed_password)
        .bind(dto.role.unwrap_or(UserRole::Admin))
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Update profile fields and role. An acting user may never change its
    /// own role, whatever the direction.
    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        id: Uuid,
        dto: UpdateUserDto,
        acting_user_id: Uuid,
    ) -> Result<User, AppError> {
        let user = Self::get_user_by_id(db, id).await?;

        if let Some(new_role) = dto.role {
            if id == acting_user_id && new_role != user.role {
                return Err(AppError::forbidden("Cannot change your own role"));
            }
        }

        let email = match dto.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if email != user.email {
                    let existing =
                        sqlx::query_as::<_, (Uuid,)>("SELECT id FROM users WHERE email = $1")
                            .bind(&email)
                            .fetch_optional(db)
                            .await?;
                    if existing.is_some() {
                        return Err(AppError::duplicate("Email already exists"));
                    }
                }
                email
            }
            None => user.email.clone(),
        };

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = $1, email = $2, role = $3, updated_at = now()
             WHERE id = $4
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&user.name))
        .bind(&email)
        .bind(dto.role.unwrap_or(user.role))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    /// Flip the enabled flag. Rejected outright on the acting user's own
    /// account, regardless of the requested value.
    #[instrument(skip(db))]
    pub async fn toggle_enabled(
        db: &PgPool,
        id: Uuid,
        enabled: bool,
        acting_user_id: Uuid,
    ) -> Result<User, AppError> {
        let user = Self::get_user_by_id(db, id).await?;

        if user.id == acting_user_id {
            return Err(AppError::forbidden("Cannot disable your own account"));
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET enabled = $1, updated_at = now()
             WHERE id = $2
             RETURNING {USER_COLUMNS}"
        ))
        .bind(enabled)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    /// Hard delete. Forbidden on the acting user's own account.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid, acting_user_id: Uuid) -> Result<(), AppError> {
        let user = Self::get_user_by_id(db, id).await?;

        if user.id == acting_user_id {
            return Err(AppError::forbidden("Cannot delete your own account"));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }
}
