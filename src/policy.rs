//! Role-gated authorization for lifecycle actions.
//!
//! One pure lookup instead of switch-on-role logic scattered per operation:
//! `authorize` checks the structural edge first (does the state machine
//! allow this action from the current status?), then the role, ownership,
//! and holder requirements. Admin roles bypass the role gate but never the
//! structural one.

use crate::error::{Error, Result};
use crate::model::{Action, Application, ApplicationStatus, Principal, Role};

/// Authorize `actor` to perform `action` on `app`.
///
/// Errors are ordered per the taxonomy: `Unauthorized` (inactive principal),
/// then `InvalidTransition` (illegal from the current status, regardless of
/// who asks), then `Forbidden` (legal transition, wrong actor).
pub fn authorize(action: Action, app: &Application, actor: &Principal) -> Result<()> {
    if !actor.is_active {
        return Err(Error::Unauthorized("principal is not active".to_string()));
    }

    structural_check(action, app.status)?;

    if actor.role.is_admin() {
        return Ok(());
    }

    match action {
        Action::Submit => {
            if actor.role != Role::Citizen {
                return Err(Error::Forbidden(
                    "only the owning citizen may submit".to_string(),
                ));
            }
            if app.citizen_id != actor.id {
                return Err(Error::Forbidden(
                    "cannot submit another citizen's application".to_string(),
                ));
            }
            Ok(())
        }
        Action::Validate => {
            if actor.role != Role::FrontDesk {
                return Err(Error::Forbidden(
                    "only front desk may validate".to_string(),
                ));
            }
            Ok(())
        }
        Action::Process | Action::Approve | Action::Forward => require_holder(app, actor),
        Action::Reject => match app.status {
            ApplicationStatus::Pending => {
                if actor.role != Role::FrontDesk {
                    return Err(Error::Forbidden(
                        "only front desk may reject a pending application".to_string(),
                    ));
                }
                Ok(())
            }
            ApplicationStatus::InProgress if actor.role == Role::FrontDesk => Ok(()),
            _ => require_holder(app, actor),
        },
    }
}

/// Does the state machine allow this action from `from`?
///
/// This is the only gate admin roles are subject to: operational correction
/// may override who acts, never what the lifecycle permits.
fn structural_check(action: Action, from: ApplicationStatus) -> Result<()> {
    let legal = match action.target_status() {
        Some(to) => from.can_transition_to(to),
        // Forward keeps the status; it is only meaningful once an officer
        // holds the case.
        None => matches!(
            from,
            ApplicationStatus::Validated | ApplicationStatus::InProgress
        ),
    };
    if legal {
        Ok(())
    } else {
        Err(Error::InvalidTransition { from, action })
    }
}

fn require_holder(app: &Application, actor: &Principal) -> Result<()> {
    if !actor.role.is_officer() {
        return Err(Error::Forbidden(
            "only processing officers may act on assigned applications".to_string(),
        ));
    }
    if app.current_holder_id != Some(actor.id) {
        return Err(Error::Forbidden(
            "not the current holder of this application".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApplicationId, CategoryId, UserId};
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> Principal {
        Principal {
            id: UserId(Uuid::new_v4()),
            role,
            is_active: true,
        }
    }

    fn app(status: ApplicationStatus, citizen: &Principal, holder: Option<&Principal>) -> Application {
        let now = Utc::now();
        Application {
            id: ApplicationId::new(),
            citizen_id: citizen.id,
            service_category_id: CategoryId(Uuid::new_v4()),
            subject: "caste certificate".to_string(),
            details: serde_json::Value::Null,
            status,
            rr_number: None,
            current_holder_id: holder.map(|h| h.id),
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
    fn inactive_principal_is_unauthorized() {
        let citizen = user(Role::Citizen);
        let a = app(ApplicationStatus::Draft, &citizen, None);
        let mut inactive = citizen.clone();
        inactive.is_active = false;
        assert!(matches!(
            authorize(Action::Submit, &a, &inactive),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn owner_may_submit_draft() {
        let citizen = user(Role::Citizen);
        let a = app(ApplicationStatus::Draft, &citizen, None);
        assert!(authorize(Action::Submit, &a, &citizen).is_ok());
    }

    #[test]
    fn non_owner_citizen_cannot_submit() {
        let citizen = user(Role::Citizen);
        let other = user(Role::Citizen);
        let a = app(ApplicationStatus::Draft, &citizen, None);
        assert!(matches!(
            authorize(Action::Submit, &a, &other),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn submit_is_structural_before_role() {
        // Submitting a pending application is invalid for anyone, even its owner.
        let citizen = user(Role::Citizen);
        let a = app(ApplicationStatus::Pending, &citizen, None);
        assert!(matches!(
            authorize(Action::Submit, &a, &citizen),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn front_desk_validates_pending() {
        let citizen = user(Role::Citizen);
        let a = app(ApplicationStatus::Pending, &citizen, None);
        assert!(authorize(Action::Validate, &a, &user(Role::FrontDesk)).is_ok());
    }

    #[test]
    fn citizen_cannot_validate() {
        let citizen = user(Role::Citizen);
        let a = app(ApplicationStatus::Pending, &citizen, None);
        assert!(matches!(
            authorize(Action::Validate, &a, &citizen),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn revalidation_is_invalid_transition() {
        let citizen = user(Role::Citizen);
        let a = app(ApplicationStatus::Validated, &citizen, None);
        assert!(matches!(
            authorize(Action::Validate, &a, &user(Role::FrontDesk)),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn admin_bypasses_role_but_not_structure() {
        let citizen = user(Role::Citizen);
        let admin = user(Role::Admin);

        // Admin may validate a pending application without the front-desk role.
        let pending = app(ApplicationStatus::Pending, &citizen, None);
        assert!(authorize(Action::Validate, &pending, &admin).is_ok());

        // But cannot validate a draft: the edge does not exist.
        let draft = app(ApplicationStatus::Draft, &citizen, None);
        assert!(matches!(
            authorize(Action::Validate, &draft, &admin),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn holder_processes_validated() {
        let citizen = user(Role::Citizen);
        let officer = user(Role::Ro);
        let a = app(ApplicationStatus::Validated, &citizen, Some(&officer));
        assert!(authorize(Action::Process, &a, &officer).is_ok());
    }

    #[test]
    fn non_holder_officer_cannot_process_or_approve() {
        let citizen = user(Role::Citizen);
        let holder = user(Role::Ro);
        let other = user(Role::Sdm);

        let validated = app(ApplicationStatus::Validated, &citizen, Some(&holder));
        assert!(matches!(
            authorize(Action::Process, &validated, &other),
            Err(Error::Forbidden(_))
        ));

        let in_progress = app(ApplicationStatus::InProgress, &citizen, Some(&holder));
        assert!(matches!(
            authorize(Action::Approve, &in_progress, &other),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn front_desk_cannot_process() {
        let citizen = user(Role::Citizen);
        let officer = user(Role::Dc);
        let a = app(ApplicationStatus::Validated, &citizen, Some(&officer));
        assert!(matches!(
            authorize(Action::Process, &a, &user(Role::FrontDesk)),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn reject_gating_per_status() {
        let citizen = user(Role::Citizen);
        let holder = user(Role::Adc);
        let front_desk = user(Role::FrontDesk);

        // Pending: front desk only.
        let pending = app(ApplicationStatus::Pending, &citizen, None);
        assert!(authorize(Action::Reject, &pending, &front_desk).is_ok());
        assert!(matches!(
            authorize(Action::Reject, &pending, &holder),
            Err(Error::Forbidden(_))
        ));

        // Validated: current holder only.
        let validated = app(ApplicationStatus::Validated, &citizen, Some(&holder));
        assert!(authorize(Action::Reject, &validated, &holder).is_ok());
        assert!(matches!(
            authorize(Action::Reject, &validated, &front_desk),
            Err(Error::Forbidden(_))
        ));

        // In progress: holder or front desk.
        let in_progress = app(ApplicationStatus::InProgress, &citizen, Some(&holder));
        assert!(authorize(Action::Reject, &in_progress, &holder).is_ok());
        assert!(authorize(Action::Reject, &in_progress, &front_desk).is_ok());
        assert!(matches!(
            authorize(Action::Reject, &in_progress, &citizen),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn terminal_states_reject_everything() {
        let citizen = user(Role::Citizen);
        let admin = user(Role::SuperAdmin);
        for status in [ApplicationStatus::Approved, ApplicationStatus::Rejected] {
            let a = app(status, &citizen, None);
            for action in [
                Action::Submit,
                Action::Validate,
                Action::Process,
                Action::Approve,
                Action::Reject,
                Action::Forward,
            ] {
                assert!(
                    matches!(
                        authorize(action, &a, &admin),
                        Err(Error::InvalidTransition { .. })
                    ),
                    "{action} from {status} must be invalid even for admins"
                );
            }
        }
    }

    #[test]
    fn forward_requires_held_status() {
        let citizen = user(Role::Citizen);
        let holder = user(Role::Sdm);

        let pending = app(ApplicationStatus::Pending, &citizen, None);
        assert!(matches!(
            authorize(Action::Forward, &pending, &holder),
            Err(Error::InvalidTransition { .. })
        ));

        let validated = app(ApplicationStatus::Validated, &citizen, Some(&holder));
        assert!(authorize(Action::Forward, &validated, &holder).is_ok());

        let in_progress = app(ApplicationStatus::InProgress, &citizen, Some(&holder));
        assert!(authorize(Action::Forward, &in_progress, &holder).is_ok());
    }
}
