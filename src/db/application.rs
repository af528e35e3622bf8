//! Application aggregate operations: creation, lifecycle transitions,
//! document recording.
//!
//! Every transition runs inside one transaction: re-check status, apply the
//! mutation, append the workflow row, append the audit row. A concurrent
//! reader never observes a status without its history rows, and a stale
//! transition attempt fails on the status guard instead of corrupting
//! state. Notifications are not written here; the engine dispatches them
//! after commit.

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde_json::json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{
    Action, Application, ApplicationId, ApplicationStatus, CategoryId, Document, NewApplication,
    OfficerAssignment, Priority, UserId, ValidationRecord, WorkflowEntry,
};
use crate::rr;
use crate::telemetry::metrics;

impl super::Db {
    /// Create a DRAFT application with its initial documents and, when a
    /// preferred officer was named, the seed assignment row.
    pub async fn create_application(
        &self,
        new: NewApplication,
        sla_days: i32,
        actor_id: UserId,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO applications (id, citizen_id, service_category_id, subject, details, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, 'draft', $6, $6)",
        )
        .bind(id)
        .bind(new.citizen_id.0)
        .bind(new.service_category_id.0)
        .bind(&new.subject)
        .bind(&new.details)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for doc in &new.documents {
            sqlx::query(
                "INSERT INTO application_documents (id, application_id, name, file_url, uploaded_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(&doc.name)
            .bind(&doc.file_url)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(officer) = new.preferred_officer_id {
            insert_assignment(
                &mut tx,
                ApplicationId(id),
                actor_id,
                officer,
                Priority::Medium,
                None,
                now + chrono::Duration::days(sla_days as i64),
                now,
            )
            .await?;
        }

        append_workflow(
            &mut tx,
            ApplicationId(id),
            None,
            ApplicationStatus::Draft,
            actor_id,
            None,
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            ApplicationId(id),
            "application_created",
            actor_id,
            None,
            Some(json!({ "status": "draft", "subject": new.subject })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        self.get_application(ApplicationId(id)).await
    }

    /// Get an application with its owned collections.
    pub async fn get_application(&self, id: ApplicationId) -> Result<Application> {
        let row: Option<ApplicationRow> = sqlx::query_as(
            "SELECT id, citizen_id, service_category_id, subject, details, status, rr_number,
                    current_holder_id, created_at, submitted_at, validated_at, completed_at, updated_at
             FROM applications WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        let row = row.ok_or_else(|| Error::NotFound(format!("application {id}")))?;

        let documents: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, application_id, name, file_url, is_verified, uploaded_at
             FROM application_documents WHERE application_id = $1 ORDER BY uploaded_at, id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        let workflow: Vec<WorkflowRow> = sqlx::query_as(
            "SELECT from_status, to_status, changed_by, comments, created_at
             FROM application_workflow WHERE application_id = $1 ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        let assignments: Vec<AssignmentRow> = sqlx::query_as(
            "SELECT assigned_by, assigned_to, priority, instructions, expected_completion_date, created_at
             FROM officer_assignments WHERE application_id = $1 ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        let validation: Option<ValidationRow> = sqlx::query_as(
            "SELECT is_documents_complete, is_eligibility_verified, validation_notes, validated_by,
                    rr_number, created_at
             FROM application_validations WHERE application_id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.try_into_application(documents, workflow, assignments, validation)
    }

    /// DRAFT -> PENDING.
    pub async fn submit_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        comments: Option<&str>,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "UPDATE applications SET status = 'pending', submitted_at = $2, updated_at = $2
             WHERE id = $1 AND status = 'draft'",
        )
        .bind(id.0)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(stale_transition(&mut tx, id, Action::Submit).await);
        }

        append_workflow(
            &mut tx,
            id,
            Some(ApplicationStatus::Draft),
            ApplicationStatus::Pending,
            actor_id,
            comments.map(str::to_string),
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            id,
            "application_submitted",
            actor_id,
            Some(json!({ "status": "draft" })),
            Some(json!({ "status": "pending", "submitted_at": now })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        record_transition(ApplicationStatus::Draft, ApplicationStatus::Pending);
        self.get_application(id).await
    }

    /// PENDING -> VALIDATED: mint the RR number, snapshot the front-desk
    /// decision, seed the current holder from the assignment chain.
    pub async fn validate_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        is_documents_complete: bool,
        is_eligibility_verified: bool,
        validation_notes: Option<&str>,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        // Daily sequence: applications already validated this UTC day + 1.
        // Read in the same transaction as the write; see DESIGN.md for the
        // accepted concurrency window.
        let (day_start, day_end) = rr::day_bounds(now);
        let (prior,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM applications WHERE validated_at >= $1 AND validated_at < $2",
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&mut *tx)
        .await?;
        let rr_number = rr::mint(now, prior);

        let holder = latest_assignee(&mut tx, id).await?;

        // COALESCE keeps an already-minted number; it is assigned exactly once.
        let rows = sqlx::query(
            "UPDATE applications
             SET status = 'validated', rr_number = COALESCE(rr_number, $2), validated_at = $3,
                 current_holder_id = $4, updated_at = $3
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id.0)
        .bind(&rr_number)
        .bind(now)
        .bind(holder.map(|h| h.0))
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(stale_transition(&mut tx, id, Action::Validate).await);
        }

        sqlx::query(
            "INSERT INTO application_validations
                 (application_id, is_documents_complete, is_eligibility_verified, validation_notes,
                  validated_by, rr_number, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id.0)
        .bind(is_documents_complete)
        .bind(is_eligibility_verified)
        .bind(validation_notes)
        .bind(actor_id.0)
        .bind(&rr_number)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        append_workflow(
            &mut tx,
            id,
            Some(ApplicationStatus::Pending),
            ApplicationStatus::Validated,
            actor_id,
            validation_notes.map(str::to_string),
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            id,
            "application_validated",
            actor_id,
            Some(json!({ "status": "pending", "rr_number": null })),
            Some(json!({
                "status": "validated",
                "rr_number": rr_number,
                "current_holder_id": holder.map(|h| h.0),
            })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        record_transition(ApplicationStatus::Pending, ApplicationStatus::Validated);
        metrics::rr_numbers_minted().add(1, &[]);
        self.get_application(id).await
    }

    /// VALIDATED -> IN_PROGRESS.
    pub async fn start_processing(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        comments: Option<&str>,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "UPDATE applications SET status = 'in_progress', updated_at = $2
             WHERE id = $1 AND status = 'validated'",
        )
        .bind(id.0)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(stale_transition(&mut tx, id, Action::Process).await);
        }

        append_workflow(
            &mut tx,
            id,
            Some(ApplicationStatus::Validated),
            ApplicationStatus::InProgress,
            actor_id,
            comments.map(str::to_string),
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            id,
            "processing_started",
            actor_id,
            Some(json!({ "status": "validated" })),
            Some(json!({ "status": "in_progress" })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        record_transition(ApplicationStatus::Validated, ApplicationStatus::InProgress);
        self.get_application(id).await
    }

    /// IN_PROGRESS -> APPROVED.
    pub async fn approve_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        comments: Option<&str>,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "UPDATE applications SET status = 'approved', completed_at = $2, updated_at = $2
             WHERE id = $1 AND status = 'in_progress'",
        )
        .bind(id.0)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(stale_transition(&mut tx, id, Action::Approve).await);
        }

        append_workflow(
            &mut tx,
            id,
            Some(ApplicationStatus::InProgress),
            ApplicationStatus::Approved,
            actor_id,
            comments.map(str::to_string),
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            id,
            "application_approved",
            actor_id,
            Some(json!({ "status": "in_progress" })),
            Some(json!({ "status": "approved", "completed_at": now })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        record_transition(ApplicationStatus::InProgress, ApplicationStatus::Approved);
        self.get_application(id).await
    }

    /// `from` -> REJECTED. The caller supplies the status it observed; the
    /// guard turns a raced attempt into an error.
    pub async fn reject_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        from: ApplicationStatus,
        reason: &str,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "UPDATE applications SET status = 'rejected', updated_at = $2
             WHERE id = $1 AND status = $3",
        )
        .bind(id.0)
        .bind(now)
        .bind(from.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(stale_transition(&mut tx, id, Action::Reject).await);
        }

        append_workflow(
            &mut tx,
            id,
            Some(from),
            ApplicationStatus::Rejected,
            actor_id,
            Some(reason.to_string()),
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            id,
            "application_rejected",
            actor_id,
            Some(json!({ "status": from.to_string() })),
            Some(json!({ "status": "rejected", "reason": reason })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        record_transition(from, ApplicationStatus::Rejected);
        self.get_application(id).await
    }

    /// Reassign the current holder without changing status. Appends an
    /// assignment row and a workflow row with `from_status == to_status`.
    pub async fn forward_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        target: UserId,
        priority: Priority,
        instructions: &str,
        sla_days: i32,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let status = fetch_status(&mut tx, id).await?;
        if !matches!(
            status,
            ApplicationStatus::Validated | ApplicationStatus::InProgress
        ) {
            return Err(Error::InvalidTransition {
                from: status,
                action: Action::Forward,
            });
        }

        let previous = latest_assignee(&mut tx, id).await?;

        insert_assignment(
            &mut tx,
            id,
            actor_id,
            target,
            priority,
            Some(instructions),
            now + chrono::Duration::days(sla_days as i64),
            now,
        )
        .await?;

        let rows = sqlx::query(
            "UPDATE applications SET current_holder_id = $2, updated_at = $3
             WHERE id = $1 AND status = $4",
        )
        .bind(id.0)
        .bind(target.0)
        .bind(now)
        .bind(status.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(stale_transition(&mut tx, id, Action::Forward).await);
        }

        append_workflow(
            &mut tx,
            id,
            Some(status),
            status,
            actor_id,
            Some(instructions.to_string()),
            now,
        )
        .await?;
        append_audit(
            &mut tx,
            id,
            "application_forwarded",
            actor_id,
            Some(json!({ "current_holder_id": previous.map(|h| h.0) })),
            Some(json!({
                "current_holder_id": target.0,
                "priority": priority.code(),
            })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        record_transition(status, status);
        self.get_application(id).await
    }

    /// Record a document reference on a not-yet-validated application.
    pub async fn add_document(
        &self,
        id: ApplicationId,
        actor_id: UserId,
        name: &str,
        file_url: &str,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        // Re-check under the transaction; the engine validated the status
        // it observed, this closes the race.
        let status = fetch_status(&mut tx, id).await?;
        if !matches!(
            status,
            ApplicationStatus::Draft | ApplicationStatus::Pending
        ) {
            return Err(Error::Validation(format!(
                "documents can only be added before validation (status is {status})"
            )));
        }

        let doc_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO application_documents (id, application_id, name, file_url, uploaded_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(doc_id)
        .bind(id.0)
        .bind(name)
        .bind(file_url)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE applications SET updated_at = $2 WHERE id = $1")
            .bind(id.0)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        append_audit(
            &mut tx,
            id,
            "document_added",
            actor_id,
            None,
            Some(json!({ "document_id": doc_id, "name": name, "file_url": file_url })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        self.get_application(id).await
    }

    /// Flip a document's verification flag.
    pub async fn verify_document(
        &self,
        id: ApplicationId,
        doc_id: Uuid,
        actor_id: UserId,
        now: DateTime<Utc>,
        ip: Option<&str>,
    ) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "UPDATE application_documents SET is_verified = TRUE
             WHERE id = $1 AND application_id = $2",
        )
        .bind(doc_id)
        .bind(id.0)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(Error::NotFound(format!("document {doc_id}")));
        }

        append_audit(
            &mut tx,
            id,
            "document_verified",
            actor_id,
            Some(json!({ "document_id": doc_id, "is_verified": false })),
            Some(json!({ "document_id": doc_id, "is_verified": true })),
            ip,
            now,
        )
        .await?;

        tx.commit().await?;
        self.get_application(id).await
    }

    /// Workflow and audit row counts, for invariant checks.
    pub async fn history_counts(&self, id: ApplicationId) -> Result<(i64, i64)> {
        let (workflow,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM application_workflow WHERE application_id = $1")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await?;
        let (audit,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM application_audit_logs WHERE application_id = $1")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await?;
        Ok((workflow, audit))
    }
}

// ---------------------------------------------------------------------------
// Shared transaction helpers
// ---------------------------------------------------------------------------

async fn fetch_status(conn: &mut PgConnection, id: ApplicationId) -> Result<ApplicationStatus> {
    let row: Option<(String,)> = sqlx::query_as("SELECT status FROM applications WHERE id = $1")
        .bind(id.0)
        .fetch_optional(conn)
        .await?;
    row.ok_or_else(|| Error::NotFound(format!("application {id}")))?
        .0
        .parse()
}

/// Error for a transition whose status guard matched no row: the
/// application vanished or its status moved underneath us.
async fn stale_transition(conn: &mut PgConnection, id: ApplicationId, action: Action) -> Error {
    match fetch_status(conn, id).await {
        Ok(from) => Error::InvalidTransition { from, action },
        Err(e) => e,
    }
}

async fn latest_assignee(conn: &mut PgConnection, id: ApplicationId) -> Result<Option<UserId>> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        "SELECT assigned_to FROM officer_assignments
         WHERE application_id = $1 ORDER BY id DESC LIMIT 1",
    )
    .bind(id.0)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|(u,)| UserId(u)))
}

#[allow(clippy::too_many_arguments)]
async fn insert_assignment(
    conn: &mut PgConnection,
    id: ApplicationId,
    assigned_by: UserId,
    assigned_to: UserId,
    priority: Priority,
    instructions: Option<&str>,
    expected_completion_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO officer_assignments
             (application_id, assigned_by, assigned_to, priority, instructions,
              expected_completion_date, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(id.0)
    .bind(assigned_by.0)
    .bind(assigned_to.0)
    .bind(priority.code())
    .bind(instructions)
    .bind(expected_completion_date)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

async fn append_workflow(
    conn: &mut PgConnection,
    id: ApplicationId,
    from: Option<ApplicationStatus>,
    to: ApplicationStatus,
    changed_by: UserId,
    comments: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO application_workflow
             (application_id, from_status, to_status, changed_by, comments, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id.0)
    .bind(from.map(|s| s.to_string()))
    .bind(to.to_string())
    .bind(changed_by.0)
    .bind(comments)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn append_audit(
    conn: &mut PgConnection,
    id: ApplicationId,
    action: &str,
    performed_by: UserId,
    old_values: Option<serde_json::Value>,
    new_values: Option<serde_json::Value>,
    ip: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO application_audit_logs
             (application_id, action, performed_by, old_values, new_values, ip_address, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(id.0)
    .bind(action)
    .bind(performed_by.0)
    .bind(old_values)
    .bind(new_values)
    .bind(ip)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

fn record_transition(from: ApplicationStatus, to: ApplicationStatus) {
    metrics::application_transitions().add(
        1,
        &[
            KeyValue::new("from", from.to_string()),
            KeyValue::new("to", to.to_string()),
        ],
    );
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    citizen_id: Uuid,
    service_category_id: Uuid,
    subject: String,
    details: serde_json::Value,
    status: String,
    rr_number: Option<String>,
    current_holder_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    validated_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    application_id: Uuid,
    name: String,
    file_url: String,
    is_verified: bool,
    uploaded_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct WorkflowRow {
    from_status: Option<String>,
    to_status: String,
    changed_by: Uuid,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    assigned_by: Uuid,
    assigned_to: Uuid,
    priority: i32,
    instructions: Option<String>,
    expected_completion_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ValidationRow {
    is_documents_complete: bool,
    is_eligibility_verified: bool,
    validation_notes: Option<String>,
    validated_by: Uuid,
    rr_number: String,
    created_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn try_into_application(
        self,
        documents: Vec<DocumentRow>,
        workflow: Vec<WorkflowRow>,
        assignments: Vec<AssignmentRow>,
        validation: Option<ValidationRow>,
    ) -> Result<Application> {
        let workflow = workflow
            .into_iter()
            .map(|w| {
                Ok(WorkflowEntry {
                    from_status: w
                        .from_status
                        .as_deref()
                        .map(|s| s.parse::<ApplicationStatus>())
                        .transpose()?,
                    to_status: w.to_status.parse()?,
                    changed_by: UserId(w.changed_by),
                    comments: w.comments,
                    created_at: w.created_at,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let assignments = assignments
            .into_iter()
            .map(|a| {
                Ok(OfficerAssignment {
                    assigned_by: UserId(a.assigned_by),
                    assigned_to: UserId(a.assigned_to),
                    priority: Priority::from_code(a.priority).ok_or_else(|| {
                        Error::Other(format!("unknown priority code: {}", a.priority))
                    })?,
                    instructions: a.instructions,
                    expected_completion_date: a.expected_completion_date,
                    created_at: a.created_at,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Application {
            id: ApplicationId(self.id),
            citizen_id: UserId(self.citizen_id),
            service_category_id: CategoryId(self.service_category_id),
            subject: self.subject,
            details: self.details,
            status: self.status.parse()?,
            rr_number: self.rr_number,
            current_holder_id: self.current_holder_id.map(UserId),
            created_at: self.created_at,
            submitted_at: self.submitted_at,
            validated_at: self.validated_at,
            completed_at: self.completed_at,
            updated_at: self.updated_at,
            documents: documents
                .into_iter()
                .map(|d| Document {
                    id: d.id,
                    application_id: ApplicationId(d.application_id),
                    name: d.name,
                    file_url: d.file_url,
                    is_verified: d.is_verified,
                    uploaded_at: d.uploaded_at,
                })
                .collect(),
            workflow,
            assignments,
            validation: validation.map(|v| ValidationRecord {
                is_documents_complete: v.is_documents_complete,
                is_eligibility_verified: v.is_eligibility_verified,
                validation_notes: v.validation_notes,
                validated_by: UserId(v.validated_by),
                rr_number: v.rr_number,
                created_at: v.created_at,
            }),
        })
    }
}
