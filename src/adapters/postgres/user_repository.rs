//! PostgreSQL user repository.
//!
//! The unique email index backs duplicate detection on both insert and
//! update.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{ApiError, ListParams, ListResult, Role, User, UserId};
use crate::ports::UserRepository;

use super::db_err;
use super::filters::{push_order, push_where, push_window, Column, ColumnMap};

const COLUMNS: ColumnMap = &[
    ("name", Column::Scalar("name")),
    ("email", Column::Scalar("email")),
    ("role", Column::Scalar("role")),
    ("createdAt", Column::Scalar("created_at")),
];

const SELECT: &str = "SELECT id, name, email, password_hash, role, reset_password_token, \
     reset_password_expire, created_at FROM users";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    reset_password_token: Option<String>,
    reset_password_expire: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, ApiError> {
        let role = Role::from_str(&self.role)
            .map_err(|_| ApiError::database(format!("unknown role value: {}", self.role)))?;
        Ok(User::from_storage(
            UserId::from_uuid(self.id),
            self.name,
            self.email,
            self.password_hash,
            role,
            self.reset_password_token,
            self.reset_password_expire,
            self.created_at,
        ))
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, reset_password_token, \
             reset_password_expire, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.reset_password_token())
        .bind(user.reset_password_expire())
        .bind(user.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, role = $5, \
             reset_password_token = $6, reset_password_expire = $7 WHERE id = $1",
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.reset_password_token())
        .bind(user.reset_password_expire())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("No user found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, ApiError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE email = $1", SELECT))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, ApiError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE reset_password_token = $1", SELECT))
                .bind(token_hash)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        row.map(UserRow::into_user).transpose()
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<User>, ApiError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_where(&mut count, &params.filters, COLUMNS)?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT);
        push_where(&mut query, &params.filters, COLUMNS)?;
        push_order(&mut query, &params.sort, COLUMNS)?;
        push_window(&mut query, params);

        let rows: Vec<UserRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(ListResult {
            items: rows
                .into_iter()
                .map(UserRow::into_user)
                .collect::<Result<_, _>>()?,
            total: total as u64,
        })
    }

    async fn delete(&self, id: &UserId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
