//! Identity read-side and reference data.
//!
//! User and service-category administration is out of scope; these are the
//! lookups the engine needs (front-desk pool, forward-target checks, SLA
//! days) plus minimal inserts for seeding and tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{CategoryId, Role, ServiceCategory, User, UserId};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    role: String,
    is_active: bool,
    is_available: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User> {
        Ok(User {
            id: UserId(self.id),
            full_name: self.full_name,
            role: self.role.parse()?,
            is_active: self.is_active,
            is_available: self.is_available,
            created_at: self.created_at,
        })
    }
}

impl super::Db {
    /// Insert a user row. Seeding and tests only.
    pub async fn insert_user(
        &self,
        full_name: &str,
        role: Role,
        is_available: bool,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, full_name, role, is_active, is_available, created_at)
             VALUES ($1, $2, $3, TRUE, $4, $5)",
        )
        .bind(id)
        .bind(full_name)
        .bind(role.to_string())
        .bind(is_available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_user(UserId(id)).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, full_name, role, is_active, is_available, created_at
             FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| Error::NotFound(format!("user {id}")))?
            .try_into_user()
    }

    /// Active users holding a role. Used for the front-desk notification pool.
    pub async fn list_active_by_role(&self, role: Role) -> Result<Vec<UserId>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE role = $1 AND is_active ORDER BY created_at")
                .bind(role.to_string())
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| UserId(id)).collect())
    }

    /// Flip an officer's availability flag.
    pub async fn set_user_availability(&self, id: UserId, is_available: bool) -> Result<()> {
        let rows = sqlx::query("UPDATE users SET is_available = $1 WHERE id = $2")
            .bind(is_available)
            .bind(id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if rows == 0 {
            return Err(Error::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    /// Insert a service category. Seeding and tests only.
    pub async fn insert_category(
        &self,
        name: &str,
        sla_days: i32,
        now: DateTime<Utc>,
    ) -> Result<ServiceCategory> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO service_categories (id, name, sla_days, is_active, created_at)
             VALUES ($1, $2, $3, TRUE, $4)",
        )
        .bind(id)
        .bind(name)
        .bind(sla_days)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_category(CategoryId(id)).await
    }

    /// Get a service category by ID.
    pub async fn get_category(&self, id: CategoryId) -> Result<ServiceCategory> {
        let row: Option<(Uuid, String, i32, bool, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, name, sla_days, is_active, created_at
             FROM service_categories WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        let (id, name, sla_days, is_active, created_at) =
            row.ok_or_else(|| Error::NotFound(format!("service category {id}")))?;
        Ok(ServiceCategory {
            id: CategoryId(id),
            name,
            sla_days,
            is_active,
            created_at,
        })
    }
}
