//! Notification sink and read-side.
//!
//! Inserts happen after a transition commits, on the plain pool, so a sink
//! failure can never roll back the transition that produced it.

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{ApplicationId, NewNotification, Notification, UserId};
use crate::telemetry::metrics;

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    notification_type: String,
    application_id: Option<Uuid>,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn try_into_notification(self) -> Result<Notification> {
        Ok(Notification {
            id: self.id,
            user_id: UserId(self.user_id),
            notification_type: self.notification_type.parse()?,
            application_id: self.application_id.map(ApplicationId),
            title: self.title,
            message: self.message,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

impl super::Db {
    /// Persist a batch of pending notifications.
    pub async fn insert_notifications(
        &self,
        pending: &[NewNotification],
        now: DateTime<Utc>,
    ) -> Result<()> {
        for n in pending {
            sqlx::query(
                "INSERT INTO notifications
                     (id, user_id, notification_type, application_id, title, message, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(n.user_id.0)
            .bind(n.notification_type.to_string())
            .bind(n.application_id.map(|a| a.0))
            .bind(&n.title)
            .bind(&n.message)
            .bind(now)
            .execute(&self.pool)
            .await?;
        }
        metrics::notifications_dispatched().add(
            pending.len() as u64,
            &[KeyValue::new("result", "ok")],
        );
        Ok(())
    }

    /// Newest-first notifications for a user.
    pub async fn list_notifications(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            "SELECT id, user_id, notification_type, application_id, title, message, is_read, created_at
             FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id LIMIT $2",
        )
        .bind(user_id.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(NotificationRow::try_into_notification)
            .collect()
    }

    /// Mark a notification read. Recipient only: a guard on `user_id`
    /// turns anyone else's attempt into Forbidden.
    pub async fn mark_notification_read(&self, id: Uuid, user_id: UserId) -> Result<()> {
        let rows = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            let exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM notifications WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            return Err(match exists {
                Some(_) => Error::Forbidden(
                    "only the recipient may mark a notification read".to_string(),
                ),
                None => Error::NotFound(format!("notification {id}")),
            });
        }
        Ok(())
    }
}
