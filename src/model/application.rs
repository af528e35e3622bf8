//! The application aggregate: lifecycle status, owned side records, and
//! the builder for creating new applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApplicationId, CategoryId, Priority, UserId};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Citizen is still assembling the request.
    Draft,
    /// Submitted, waiting for front-desk validation.
    Pending,
    /// Front desk validated; RR number minted, holder seeded.
    Validated,
    /// Current holder is actively processing.
    InProgress,
    /// Granted. Terminal.
    Approved,
    /// Refused at front desk or by an officer. Terminal.
    Rejected,
    /// Reserved post-approval archival status. No transition produces it.
    Completed,
}

impl ApplicationStatus {
    /// Can transition from self to `to`?
    pub fn can_transition_to(self, to: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, to),
            (Draft, Pending)
                | (Pending, Validated)
                | (Pending, Rejected)
                | (Validated, InProgress)
                | (Validated, Rejected)     // officer refuses without processing
                | (InProgress, Approved)
                | (InProgress, Rejected)
        )
    }

    /// Is this a terminal status?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved
                | ApplicationStatus::Rejected
                | ApplicationStatus::Completed
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Validated => "validated",
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ApplicationStatus::Draft),
            "pending" => Ok(ApplicationStatus::Pending),
            "validated" => Ok(ApplicationStatus::Validated),
            "in_progress" => Ok(ApplicationStatus::InProgress),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "completed" => Ok(ApplicationStatus::Completed),
            _ => Err(Error::Validation(format!("unknown status: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Engine operations that act on an application's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    Validate,
    Process,
    Approve,
    Reject,
    Forward,
}

impl Action {
    /// The status this action drives the application to.
    /// `Forward` reassigns the holder without changing status.
    pub fn target_status(self) -> Option<ApplicationStatus> {
        match self {
            Action::Submit => Some(ApplicationStatus::Pending),
            Action::Validate => Some(ApplicationStatus::Validated),
            Action::Process => Some(ApplicationStatus::InProgress),
            Action::Approve => Some(ApplicationStatus::Approved),
            Action::Reject => Some(ApplicationStatus::Rejected),
            Action::Forward => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Submit => "submit",
            Action::Validate => "validate",
            Action::Process => "process",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Forward => "forward",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// A citizen's service request tracked by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,

    /// Owning citizen. Immutable after creation.
    pub citizen_id: UserId,

    /// Service category reference carrying the SLA. Immutable.
    pub service_category_id: CategoryId,

    /// Short description of the request.
    pub subject: String,

    /// Form payload. Opaque to the engine.
    pub details: serde_json::Value,

    pub status: ApplicationStatus,

    /// Registration number, minted exactly once at validation.
    pub rr_number: Option<String>,

    /// Officer who currently must act. Null until validation.
    pub current_holder_id: Option<UserId>,

    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub validated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Uploaded document references.
    pub documents: Vec<Document>,

    /// Append-only status-transition history. First entry has `from_status`
    /// `None` (creation).
    pub workflow: Vec<WorkflowEntry>,

    /// Append-only forwarding chain.
    pub assignments: Vec<OfficerAssignment>,

    /// Front-desk decision snapshot, present once validated.
    pub validation: Option<ValidationRecord>,
}

/// An uploaded document reference. The file itself lives in the document
/// store; the engine only records the returned URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: uuid::Uuid,
    pub application_id: ApplicationId,
    pub name: String,
    pub file_url: String,
    pub is_verified: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// One immutable record of a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEntry {
    pub from_status: Option<ApplicationStatus>,
    pub to_status: ApplicationStatus,
    pub changed_by: UserId,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row per "this officer was given responsibility".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerAssignment {
    pub assigned_by: UserId,
    pub assigned_to: UserId,
    pub priority: Priority,
    pub instructions: Option<String>,
    pub expected_completion_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of the front-desk decision. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub is_documents_complete: bool,
    pub is_eligibility_verified: bool,
    pub validation_notes: Option<String>,
    pub validated_by: UserId,
    pub rr_number: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for creating new applications. The engine's public API for
/// opening a DRAFT.
pub struct NewApplication {
    pub(crate) citizen_id: UserId,
    pub(crate) service_category_id: CategoryId,
    pub(crate) subject: String,
    pub(crate) details: serde_json::Value,
    pub(crate) documents: Vec<NewDocument>,
    pub(crate) preferred_officer_id: Option<UserId>,
}

/// A document reference attached at creation or while in DRAFT.
pub struct NewDocument {
    pub name: String,
    pub file_url: String,
}

impl NewApplication {
    pub fn new(
        citizen_id: UserId,
        service_category_id: CategoryId,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            citizen_id,
            service_category_id,
            subject: subject.into(),
            details: serde_json::Value::Null,
            documents: Vec::new(),
            preferred_officer_id: None,
        }
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn document(mut self, name: impl Into<String>, file_url: impl Into<String>) -> Self {
        self.documents.push(NewDocument {
            name: name.into(),
            file_url: file_url.into(),
        });
        self
    }

    /// Officer the citizen would like the case routed to. Seeds the
    /// assignment chain; validation promotes it to current holder.
    pub fn preferred_officer(mut self, officer_id: UserId) -> Self {
        self.preferred_officer_id = Some(officer_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    const ALL: [ApplicationStatus; 7] =
        [Draft, Pending, Validated, InProgress, Approved, Rejected, Completed];

    #[test]
    fn legal_edges_only() {
        let legal = [
            (Draft, Pending),
            (Pending, Validated),
            (Pending, Rejected),
            (Validated, InProgress),
            (Validated, Rejected),
            (InProgress, Approved),
            (InProgress, Rejected),
        ];
        for from in ALL {
            for to in ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in [Approved, Rejected, Completed] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn completed_is_unreachable() {
        for from in ALL {
            assert!(!from.can_transition_to(Completed));
        }
    }

    #[test]
    fn status_roundtrip() {
        for status in ALL {
            let parsed: ApplicationStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("unknown".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn action_targets() {
        assert_eq!(Action::Submit.target_status(), Some(Pending));
        assert_eq!(Action::Validate.target_status(), Some(Validated));
        assert_eq!(Action::Forward.target_status(), None);
    }
}
