//! User repository.

use sqlx::PgPool;

use vitalhub_core::error::{AppError, ErrorKind};
use vitalhub_core::result::AppResult;
use vitalhub_core::types::pagination::{Page, PageRequest};
use vitalhub_entity::user::{CreateUser, UpdateUser, User, UserListParams};

use crate::query::ListQueryBuilder;

const USER_COLUMNS: &str =
    "id, email, password_hash, role, is_active, last_login_at, created_by, created_at, updated_at";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// List users with filters and pagination, newest first.
    ///
    /// Count and page fetch share one predicate list.
    pub async fn list(&self, params: &UserListParams) -> AppResult<Page<User>> {
        let page = PageRequest::from_raw(params.page, params.page_size);

        let mut filters = ListQueryBuilder::new();
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            filters.contains("email", search);
        }
        if let Some(role) = params.role.as_deref().filter(|s| !s.is_empty()) {
            filters.equals("role", role);
        }
        if let Some(is_active) = params.is_active {
            filters.equals_bool("is_active", is_active);
        }

        let count_sql = filters.count_sql("users");
        let page_sql = filters.page_sql("users", USER_COLUMNS, "created_at");

        let total: i64 = filters
            .bind_count(sqlx::query_scalar(&count_sql))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let users = filters
            .bind_rows(sqlx::query_as::<_, User>(&page_sql))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(Page::new(users, total, &page))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, role, is_active, created_by) \
             VALUES ($1, $2, $3, TRUE, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role.as_str())
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict(format!("Email '{}' already exists", data.email))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Apply a partial update. `None` fields keep their current value.
    pub async fn update(&self, id: i64, data: &UpdateUser) -> AppResult<User> {
        let sql = format!(
            "UPDATE users SET email = COALESCE($2, email), role = COALESCE($3, role), \
             updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(data.email.as_deref())
        .bind(data.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update user", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Activate or deactivate an account. Returns `false` when the user
    /// does not exist.
    pub async fn set_active(&self, id: i64, is_active: bool) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to change user status", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
