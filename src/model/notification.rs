//! Notifications fanned out on lifecycle transitions.
//!
//! The engine computes pending notifications as plain data during a
//! transition and dispatches them after the transaction commits. Delivery
//! is best-effort; a dispatch failure never rolls back a transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApplicationId, UserId};
use crate::error::Error;

/// A persisted notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub notification_type: NotificationType,
    pub application_id: Option<ApplicationId>,
    pub title: String,
    pub message: String,
    /// Mutable by the recipient only.
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// What happened, from the recipient's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Submitted,
    Validated,
    InProgress,
    Approved,
    Rejected,
    Assigned,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationType::Submitted => "submitted",
            NotificationType::Validated => "validated",
            NotificationType::InProgress => "in_progress",
            NotificationType::Approved => "approved",
            NotificationType::Rejected => "rejected",
            NotificationType::Assigned => "assigned",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for NotificationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(NotificationType::Submitted),
            "validated" => Ok(NotificationType::Validated),
            "in_progress" => Ok(NotificationType::InProgress),
            "approved" => Ok(NotificationType::Approved),
            "rejected" => Ok(NotificationType::Rejected),
            "assigned" => Ok(NotificationType::Assigned),
            _ => Err(Error::Validation(format!("unknown notification type: {s}"))),
        }
    }
}

/// A pending notification command, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub notification_type: NotificationType,
    pub application_id: Option<ApplicationId>,
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_type_roundtrip() {
        for t in [
            NotificationType::Submitted,
            NotificationType::Validated,
            NotificationType::InProgress,
            NotificationType::Approved,
            NotificationType::Rejected,
            NotificationType::Assigned,
        ] {
            let parsed: NotificationType = t.to_string().parse().unwrap();
            assert_eq!(parsed, t);
        }
    }
}
