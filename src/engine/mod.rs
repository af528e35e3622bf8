//! The workflow engine: role-gated lifecycle operations over applications.
//!
//! Each operation loads the application, authorizes the actor against the
//! permission table, validates its input, and hands the mutation to the
//! storage layer, which executes it atomically (status + workflow + audit).
//! Pending notifications are computed as data and dispatched only after the
//! transaction commits; a dispatch failure is logged, never surfaced.

pub mod notify;

use std::sync::Arc;

use opentelemetry::KeyValue;
use tracing::{Instrument, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::db::Db;
use crate::db::query::{ApplicationFilter, ApplicationSummary, DashboardStats};
use crate::error::{Error, Result};
use crate::model::{
    Action, Application, ApplicationId, ApplicationStatus, NewApplication, NewNotification,
    Notification, Principal, Priority, RequestContext, Role, UserId,
};
use crate::policy;
use crate::telemetry::metrics;
use crate::telemetry::workflow::transition_span;

/// Front-desk decision on a pending application.
pub enum ValidationDecision {
    Accept {
        is_documents_complete: bool,
        is_eligibility_verified: bool,
        validation_notes: Option<String>,
    },
    Reject {
        rejection_reason: String,
    },
}

/// Holder reassignment request.
pub struct ForwardRequest {
    pub target_officer_id: UserId,
    pub priority: Priority,
    pub instructions: String,
}

pub struct WorkflowEngine {
    db: Arc<Db>,
    clock: Arc<dyn Clock>,
}

impl WorkflowEngine {
    pub fn new(db: Arc<Db>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn with_system_clock(db: Arc<Db>) -> Self {
        Self::new(db, Arc::new(SystemClock))
    }

    // -----------------------------------------------------------------------
    // Creation & documents
    // -----------------------------------------------------------------------

    /// Open a DRAFT application for a citizen.
    pub async fn create(
        &self,
        new: NewApplication,
        actor: &Principal,
        ctx: &RequestContext,
    ) -> Result<Application> {
        require_active(actor)?;
        if !actor.role.is_admin() {
            if actor.role != Role::Citizen {
                return Err(Error::Forbidden(
                    "only citizens open applications".to_string(),
                ));
            }
            if new.citizen_id != actor.id {
                return Err(Error::Forbidden(
                    "cannot open an application for another citizen".to_string(),
                ));
            }
        }
        if new.subject.trim().is_empty() {
            return Err(Error::Validation("subject is required".to_string()));
        }

        let category = self.db.get_category(new.service_category_id).await?;
        if !category.is_active {
            return Err(Error::Validation(format!(
                "service category \"{}\" is not active",
                category.name
            )));
        }

        if let Some(officer_id) = new.preferred_officer_id {
            let officer = self.db.get_user(officer_id).await?;
            if !officer.role.is_officer() {
                return Err(Error::Validation(
                    "preferred officer must be a processing officer".to_string(),
                ));
            }
            if !officer.is_active {
                return Err(Error::Validation(
                    "preferred officer is not active".to_string(),
                ));
            }
        }

        let app = self
            .db
            .create_application(
                new,
                category.sla_days,
                actor.id,
                self.clock.now(),
                ctx.ip_address.as_deref(),
            )
            .await?;
        info!(id = %app.id, citizen = %app.citizen_id, "application created");
        Ok(app)
    }

    /// Attach a document reference while the application is still editable.
    pub async fn add_document(
        &self,
        id: ApplicationId,
        actor: &Principal,
        name: &str,
        file_url: &str,
        ctx: &RequestContext,
    ) -> Result<Application> {
        require_active(actor)?;
        if name.trim().is_empty() {
            return Err(Error::Validation("document name is required".to_string()));
        }

        let app = self.db.get_application(id).await?;
        if !actor.role.is_admin() && app.citizen_id != actor.id {
            return Err(Error::Forbidden(
                "only the owning citizen may attach documents".to_string(),
            ));
        }
        if !matches!(
            app.status,
            ApplicationStatus::Draft | ApplicationStatus::Pending
        ) {
            return Err(Error::Validation(format!(
                "documents can only be added before validation (status is {})",
                app.status
            )));
        }

        self.db
            .add_document(
                id,
                actor.id,
                name,
                file_url,
                self.clock.now(),
                ctx.ip_address.as_deref(),
            )
            .await
    }

    /// Mark a document verified. Staff action.
    pub async fn verify_document(
        &self,
        id: ApplicationId,
        doc_id: Uuid,
        actor: &Principal,
        ctx: &RequestContext,
    ) -> Result<Application> {
        require_active(actor)?;
        if !(actor.role == Role::FrontDesk || actor.role.is_officer() || actor.role.is_admin()) {
            return Err(Error::Forbidden(
                "only staff may verify documents".to_string(),
            ));
        }
        // Existence check doubles as the NotFound path for the application.
        self.db.get_application(id).await?;
        self.db
            .verify_document(id, doc_id, actor.id, self.clock.now(), ctx.ip_address.as_deref())
            .await
    }

    // -----------------------------------------------------------------------
    // Lifecycle transitions
    // -----------------------------------------------------------------------

    /// DRAFT -> PENDING, by the owning citizen.
    pub async fn submit(
        &self,
        id: ApplicationId,
        actor: &Principal,
        comments: Option<String>,
        ctx: &RequestContext,
    ) -> Result<Application> {
        let span = transition_span("submit", &id);
        async move {
            let app = self.db.get_application(id).await?;
            policy::authorize(Action::Submit, &app, actor)?;
            if app.documents.is_empty() {
                return Err(Error::Validation(
                    "at least one document is required before submission".to_string(),
                ));
            }

            let app = self
                .db
                .submit_application(
                    id,
                    actor.id,
                    comments.as_deref(),
                    self.clock.now(),
                    ctx.ip_address.as_deref(),
                )
                .await?;

            let pool = self.front_desk_pool().await;
            self.dispatch(notify::on_submitted(&app, &pool)).await;
            info!(id = %app.id, "application submitted");
            Ok(app)
        }
        .instrument(span)
        .await
    }

    /// PENDING -> VALIDATED (minting the RR number) or -> REJECTED,
    /// per the front-desk decision.
    pub async fn validate(
        &self,
        id: ApplicationId,
        actor: &Principal,
        decision: ValidationDecision,
        ctx: &RequestContext,
    ) -> Result<Application> {
        match decision {
            ValidationDecision::Reject { rejection_reason } => {
                self.reject(id, actor, rejection_reason, ctx).await
            }
            ValidationDecision::Accept {
                is_documents_complete,
                is_eligibility_verified,
                validation_notes,
            } => {
                let span = transition_span("validate", &id);
                async move {
                    let app = self.db.get_application(id).await?;
                    policy::authorize(Action::Validate, &app, actor)?;

                    let app = self
                        .db
                        .validate_application(
                            id,
                            actor.id,
                            is_documents_complete,
                            is_eligibility_verified,
                            validation_notes.as_deref(),
                            self.clock.now(),
                            ctx.ip_address.as_deref(),
                        )
                        .await?;

                    self.dispatch(notify::on_validated(&app)).await;
                    info!(
                        id = %app.id,
                        rr_number = app.rr_number.as_deref().unwrap_or("-"),
                        "application validated"
                    );
                    Ok(app)
                }
                .instrument(span)
                .await
            }
        }
    }

    /// VALIDATED -> IN_PROGRESS, by the current holder.
    pub async fn process(
        &self,
        id: ApplicationId,
        actor: &Principal,
        comments: Option<String>,
        ctx: &RequestContext,
    ) -> Result<Application> {
        let span = transition_span("process", &id);
        async move {
            let app = self.db.get_application(id).await?;
            policy::authorize(Action::Process, &app, actor)?;

            let app = self
                .db
                .start_processing(
                    id,
                    actor.id,
                    comments.as_deref(),
                    self.clock.now(),
                    ctx.ip_address.as_deref(),
                )
                .await?;

            self.dispatch(notify::on_processing(&app)).await;
            info!(id = %app.id, "processing started");
            Ok(app)
        }
        .instrument(span)
        .await
    }

    /// IN_PROGRESS -> APPROVED, by the current holder.
    pub async fn approve(
        &self,
        id: ApplicationId,
        actor: &Principal,
        comments: Option<String>,
        ctx: &RequestContext,
    ) -> Result<Application> {
        let span = transition_span("approve", &id);
        async move {
            let app = self.db.get_application(id).await?;
            policy::authorize(Action::Approve, &app, actor)?;

            let app = self
                .db
                .approve_application(
                    id,
                    actor.id,
                    comments.as_deref(),
                    self.clock.now(),
                    ctx.ip_address.as_deref(),
                )
                .await?;

            self.dispatch(notify::on_approved(&app)).await;
            info!(id = %app.id, "application approved");
            Ok(app)
        }
        .instrument(span)
        .await
    }

    /// Any rejectable status -> REJECTED. Requires a reason.
    pub async fn reject(
        &self,
        id: ApplicationId,
        actor: &Principal,
        rejection_reason: String,
        ctx: &RequestContext,
    ) -> Result<Application> {
        let span = transition_span("reject", &id);
        async move {
            if rejection_reason.trim().is_empty() {
                return Err(Error::Validation(
                    "rejection reason is required".to_string(),
                ));
            }

            let app = self.db.get_application(id).await?;
            policy::authorize(Action::Reject, &app, actor)?;

            let app = self
                .db
                .reject_application(
                    id,
                    actor.id,
                    app.status,
                    &rejection_reason,
                    self.clock.now(),
                    ctx.ip_address.as_deref(),
                )
                .await?;

            self.dispatch(notify::on_rejected(&app, &rejection_reason)).await;
            info!(id = %app.id, "application rejected");
            Ok(app)
        }
        .instrument(span)
        .await
    }

    /// Reassign the current holder. Status is unchanged; the workflow row
    /// records `from == to`.
    pub async fn forward(
        &self,
        id: ApplicationId,
        actor: &Principal,
        request: ForwardRequest,
        ctx: &RequestContext,
    ) -> Result<Application> {
        let span = transition_span("forward", &id);
        async move {
            if request.instructions.trim().is_empty() {
                return Err(Error::Validation(
                    "forwarding instructions are required".to_string(),
                ));
            }

            let app = self.db.get_application(id).await?;
            policy::authorize(Action::Forward, &app, actor)?;

            let target = self.db.get_user(request.target_officer_id).await?;
            if !target.role.is_officer() {
                return Err(Error::Validation(
                    "forward target must be a processing officer".to_string(),
                ));
            }
            if !target.is_active || !target.is_available {
                return Err(Error::Validation(
                    "target officer is not available".to_string(),
                ));
            }

            let category = self.db.get_category(app.service_category_id).await?;
            let app = self
                .db
                .forward_application(
                    id,
                    actor.id,
                    target.id,
                    request.priority,
                    &request.instructions,
                    category.sla_days,
                    self.clock.now(),
                    ctx.ip_address.as_deref(),
                )
                .await?;

            self.dispatch(notify::on_forwarded(&app, target.id)).await;
            info!(id = %app.id, to = %target.id, "application forwarded");
            Ok(app)
        }
        .instrument(span)
        .await
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Fetch one application. Citizens see only their own.
    pub async fn get(&self, id: ApplicationId, actor: &Principal) -> Result<Application> {
        require_active(actor)?;
        let app = self.db.get_application(id).await?;
        if actor.role == Role::Citizen && app.citizen_id != actor.id {
            return Err(Error::Forbidden(
                "cannot view another citizen's application".to_string(),
            ));
        }
        Ok(app)
    }

    /// Paginated, filtered list. Citizens are scoped to their own cases.
    pub async fn list(
        &self,
        mut filter: ApplicationFilter,
        actor: &Principal,
    ) -> Result<Vec<ApplicationSummary>> {
        require_active(actor)?;
        if actor.role == Role::Citizen {
            filter.citizen = Some(actor.id);
        }
        self.db.list_applications(&filter).await
    }

    /// Dashboard counts. Staff only.
    pub async fn stats(&self, actor: &Principal) -> Result<DashboardStats> {
        require_active(actor)?;
        if actor.role == Role::Citizen {
            return Err(Error::Forbidden(
                "dashboard statistics are staff-only".to_string(),
            ));
        }
        self.db.dashboard_stats(self.clock.now()).await
    }

    /// The actor's notifications, newest first.
    pub async fn notifications(&self, actor: &Principal, limit: i64) -> Result<Vec<Notification>> {
        require_active(actor)?;
        self.db.list_notifications(actor.id, limit).await
    }

    /// Mark one of the actor's notifications read.
    pub async fn mark_notification_read(&self, id: Uuid, actor: &Principal) -> Result<()> {
        require_active(actor)?;
        self.db.mark_notification_read(id, actor.id).await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn front_desk_pool(&self) -> Vec<UserId> {
        match self.db.list_active_by_role(Role::FrontDesk).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!("front-desk pool lookup failed: {e}");
                Vec::new()
            }
        }
    }

    /// Best-effort dispatch, outside the transaction. A failure here must
    /// not roll back the transition that produced the notifications.
    async fn dispatch(&self, pending: Vec<NewNotification>) {
        if pending.is_empty() {
            return;
        }
        let count = pending.len();
        if let Err(e) = self.db.insert_notifications(&pending, self.clock.now()).await {
            metrics::notifications_dispatched()
                .add(count as u64, &[KeyValue::new("result", "error")]);
            warn!("notification dispatch failed: {e}");
        }
    }
}

fn require_active(actor: &Principal) -> Result<()> {
    if actor.is_active {
        Ok(())
    } else {
        Err(Error::Unauthorized("principal is not active".to_string()))
    }
}
