use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::users::dtos::{ChangePasswordDto, UserResponseDto};
use crate::features::users::models::User;
use crate::shared::types::PaginationQuery;

const USER_COLUMNS: &str = "id, username, email, password_hash, is_admin, created_at";

/// New account data, password already hashed
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Service for user accounts
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find user by username: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Create a user together with their (empty) persisted cart
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let username_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(new_user.username)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        if username_taken {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
                .bind(new_user.email)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        if email_taken {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.is_admin)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "Username or email already registered"))?;

        sqlx::query("INSERT INTO carts (id, user_id) VALUES ($1, $2)")
            .bind(Uuid::now_v7())
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "Cart already exists for user"))?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit user creation: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn list(&self, params: &PaginationQuery) -> Result<(Vec<UserResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users.into_iter().map(UserResponseDto::from).collect(), total))
    }

    /// Delete a user; an admin can never delete their own account
    pub async fn delete(&self, acting: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if acting.user_id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        tracing::info!(user_id = %id, deleted_by = %acting.user_id, "User deleted");
        Ok(())
    }

    pub async fn change_password(&self, user_id: Uuid, dto: ChangePasswordDto) -> Result<()> {
        let user = self.get_by_id(user_id).await?;

        if !verify_password(&user.password_hash, &dto.current_password)? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update password: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    pub async fn promote_to_admin(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to promote user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        tracing::info!(user_id = %user_id, "User promoted to admin");
        Ok(())
    }
}
