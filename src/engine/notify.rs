//! Notification fan-out per transition.
//!
//! Pure builders: each returns the pending notification commands for one
//! transition. The engine dispatches them after the transaction commits.
//! The citizen is always told; the front-desk pool hears about submissions
//! and the newly assigned officer about validation and forwarding.

use crate::model::{Application, NewNotification, NotificationType, UserId};

fn to_user(
    app: &Application,
    user_id: UserId,
    notification_type: NotificationType,
    title: &str,
    message: String,
) -> NewNotification {
    NewNotification {
        user_id,
        notification_type,
        application_id: Some(app.id),
        title: title.to_string(),
        message,
    }
}

pub fn on_submitted(app: &Application, front_desk: &[UserId]) -> Vec<NewNotification> {
    let mut out = vec![to_user(
        app,
        app.citizen_id,
        NotificationType::Submitted,
        "Application submitted",
        format!(
            "Your application \"{}\" has been submitted and awaits validation.",
            app.subject
        ),
    )];
    for &clerk in front_desk {
        out.push(to_user(
            app,
            clerk,
            NotificationType::Submitted,
            "New application awaiting validation",
            format!("Application \"{}\" is awaiting front-desk validation.", app.subject),
        ));
    }
    out
}

pub fn on_validated(app: &Application) -> Vec<NewNotification> {
    let rr = app.rr_number.as_deref().unwrap_or("-");
    let mut out = vec![to_user(
        app,
        app.citizen_id,
        NotificationType::Validated,
        "Application validated",
        format!(
            "Your application \"{}\" has been validated. Registration number: {rr}.",
            app.subject
        ),
    )];
    if let Some(holder) = app.current_holder_id {
        out.push(to_user(
            app,
            holder,
            NotificationType::Assigned,
            "Application assigned to you",
            format!("Application {rr} (\"{}\") has been assigned to you.", app.subject),
        ));
    }
    out
}

pub fn on_processing(app: &Application) -> Vec<NewNotification> {
    vec![to_user(
        app,
        app.citizen_id,
        NotificationType::InProgress,
        "Application under processing",
        format!("Your application \"{}\" is now being processed.", app.subject),
    )]
}

pub fn on_approved(app: &Application) -> Vec<NewNotification> {
    vec![to_user(
        app,
        app.citizen_id,
        NotificationType::Approved,
        "Application approved",
        format!("Your application \"{}\" has been approved.", app.subject),
    )]
}

pub fn on_rejected(app: &Application, reason: &str) -> Vec<NewNotification> {
    vec![to_user(
        app,
        app.citizen_id,
        NotificationType::Rejected,
        "Application rejected",
        format!("Your application \"{}\" was rejected: {reason}", app.subject),
    )]
}

pub fn on_forwarded(app: &Application, target: UserId) -> Vec<NewNotification> {
    vec![
        to_user(
            app,
            app.citizen_id,
            NotificationType::Assigned,
            "Application reassigned",
            format!(
                "Your application \"{}\" has been forwarded to another officer.",
                app.subject
            ),
        ),
        to_user(
            app,
            target,
            NotificationType::Assigned,
            "Application forwarded to you",
            format!("Application \"{}\" has been forwarded to you.", app.subject),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApplicationId, ApplicationStatus, CategoryId};
    use chrono::Utc;
    use uuid::Uuid;

    fn app(holder: Option<UserId>) -> Application {
        let now = Utc::now();
        Application {
            id: ApplicationId::new(),
            citizen_id: UserId(Uuid::new_v4()),
            service_category_id: CategoryId(Uuid::new_v4()),
            subject: "income certificate".to_string(),
            details: serde_json::Value::Null,
            status: ApplicationStatus::Pending,
            rr_number: Some("RR25050004".to_string()),
            current_holder_id: holder,
            created_at: now,
            submitted_at: None,
            validated_at: None,
            completed_at: None,
            updated_at: now,
            documents: Vec::new(),
            workflow: Vec::new(),
            assignments: Vec::new(),
            validation: None,
        }
    }

    #[test]
    fn submission_notifies_citizen_and_pool() {
        let a = app(None);
        let pool = vec![UserId(Uuid::new_v4()), UserId(Uuid::new_v4())];
        let out = on_submitted(&a, &pool);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].user_id, a.citizen_id);
        assert_eq!(out[1].user_id, pool[0]);
        assert_eq!(out[2].user_id, pool[1]);
        assert!(out.iter().all(|n| n.application_id == Some(a.id)));
    }

    #[test]
    fn validation_notifies_holder_when_seeded() {
        let holder = UserId(Uuid::new_v4());
        let out = on_validated(&app(Some(holder)));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].user_id, holder);
        assert_eq!(out[1].notification_type, NotificationType::Assigned);
        assert!(out[0].message.contains("RR25050004"));
    }

    #[test]
    fn validation_without_holder_notifies_citizen_only() {
        let a = app(None);
        let out = on_validated(&a);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].user_id, a.citizen_id);
    }

    #[test]
    fn decisions_notify_citizen() {
        let a = app(None);
        assert_eq!(on_approved(&a).len(), 1);
        let rejected = on_rejected(&a, "incomplete records");
        assert_eq!(rejected[0].notification_type, NotificationType::Rejected);
        assert!(rejected[0].message.contains("incomplete records"));
    }

    #[test]
    fn forward_notifies_citizen_and_target() {
        let a = app(Some(UserId(Uuid::new_v4())));
        let target = UserId(Uuid::new_v4());
        let out = on_forwarded(&a, target);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].user_id, a.citizen_id);
        assert_eq!(out[1].user_id, target);
    }
}
