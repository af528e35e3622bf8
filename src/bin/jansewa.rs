//! jansewa CLI — operator interface to the application-processing engine.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use jansewa::config::Config;
use jansewa::config::secrets::ExposeSecret;
use jansewa::db::Db;
use jansewa::db::query::ApplicationFilter;
use jansewa::docstore::{DocumentStore, FsDocumentStore};
use jansewa::engine::{ForwardRequest, ValidationDecision, WorkflowEngine};
use jansewa::model::{
    Application, ApplicationId, CategoryId, NewApplication, Principal, RequestContext, UserId,
};
use jansewa::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "jansewa", about = "District e-services application portal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed reference data (users, service categories)
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },
    /// Application operations
    App {
        #[command(subcommand)]
        action: AppAction,
    },
    /// Notification operations
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// Create a user
    User {
        /// Full name
        name: String,
        /// Role (citizen, front_desk, dc, adc, ro, sdm, dy_dir, admin, super_admin)
        role: String,
        /// Mark the user unavailable for forwarding
        #[arg(long)]
        unavailable: bool,
    },
    /// Create a service category
    Category {
        /// Category name
        name: String,
        /// Target processing duration in days
        #[arg(long, default_value_t = 15)]
        sla_days: i32,
    },
}

#[derive(Subcommand)]
enum AppAction {
    /// Open a DRAFT application
    Create {
        /// Acting user ID
        #[arg(long)]
        actor: Uuid,
        /// Service category ID
        #[arg(long)]
        category: Uuid,
        /// Short description of the request
        #[arg(long)]
        subject: String,
        /// JSON form payload
        #[arg(long)]
        details: Option<String>,
        /// Document file to upload (repeatable)
        #[arg(long = "doc")]
        docs: Vec<PathBuf>,
        /// Preferred processing officer
        #[arg(long)]
        preferred_officer: Option<Uuid>,
        /// Directory backing the document store
        #[arg(long, default_value = "documents")]
        document_dir: PathBuf,
    },
    /// Upload a document to a draft/pending application
    AddDoc {
        #[arg(long)]
        actor: Uuid,
        /// Application ID (full UUID or prefix)
        id: String,
        /// File to upload
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "documents")]
        document_dir: PathBuf,
    },
    /// Submit a draft for validation
    Submit {
        #[arg(long)]
        actor: Uuid,
        id: String,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Front-desk validation of a pending application
    Validate {
        #[arg(long)]
        actor: Uuid,
        id: String,
        #[arg(long)]
        docs_complete: bool,
        #[arg(long)]
        eligibility_verified: bool,
        #[arg(long)]
        notes: Option<String>,
        /// Reject instead of validating
        #[arg(long)]
        reject: bool,
        /// Rejection reason (with --reject)
        #[arg(long)]
        reason: Option<String>,
    },
    /// Start processing a validated application
    Process {
        #[arg(long)]
        actor: Uuid,
        id: String,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Approve an in-progress application
    Approve {
        #[arg(long)]
        actor: Uuid,
        id: String,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Reject an application
    Reject {
        #[arg(long)]
        actor: Uuid,
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Forward to another officer
    Forward {
        #[arg(long)]
        actor: Uuid,
        id: String,
        /// Target officer ID
        #[arg(long)]
        to: Uuid,
        /// Priority (high, medium, low)
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        instructions: String,
    },
    /// Show an application
    Show {
        #[arg(long)]
        actor: Uuid,
        id: String,
    },
    /// List applications
    List {
        #[arg(long)]
        actor: Uuid,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Only applications currently assigned to the actor
        #[arg(long)]
        mine: bool,
        /// Search RR number, citizen name, or service name
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Dashboard counts
    Stats {
        #[arg(long)]
        actor: Uuid,
    },
}

#[derive(Subcommand)]
enum NotifyAction {
    /// List the actor's notifications
    List {
        #[arg(long)]
        actor: Uuid,
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Mark a notification read
    Read {
        #[arg(long)]
        actor: Uuid,
        /// Notification ID
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "jansewa".to_string(),
    })?;

    let db = Arc::new(Db::connect(config.database_url.expose_secret()).await?);
    db.migrate().await?;
    let engine = WorkflowEngine::with_system_clock(Arc::clone(&db));
    let ctx = RequestContext::default();

    match cli.command {
        Command::Seed { action } => cmd_seed(&db, action).await,
        Command::App { action } => cmd_app(&db, &engine, &ctx, action).await,
        Command::Notify { action } => cmd_notify(&db, &engine, action).await,
    }
}

async fn cmd_seed(db: &Db, action: SeedAction) -> anyhow::Result<()> {
    match action {
        SeedAction::User {
            name,
            role,
            unavailable,
        } => {
            let role = role
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid role: {role}"))?;
            let user = db
                .insert_user(&name, role, !unavailable, chrono::Utc::now())
                .await?;
            println!("Created user {} ({}, {})", user.id, user.full_name, user.role);
        }
        SeedAction::Category { name, sla_days } => {
            let category = db
                .insert_category(&name, sla_days, chrono::Utc::now())
                .await?;
            println!(
                "Created category {} ({}, SLA {} days)",
                category.id, category.name, category.sla_days
            );
        }
    }
    Ok(())
}

async fn cmd_app(
    db: &Db,
    engine: &WorkflowEngine,
    ctx: &RequestContext,
    action: AppAction,
) -> anyhow::Result<()> {
    match action {
        AppAction::Create {
            actor,
            category,
            subject,
            details,
            docs,
            preferred_officer,
            document_dir,
        } => {
            let actor = principal(db, actor).await?;
            let details: serde_json::Value = match details {
                Some(json) => serde_json::from_str(&json)?,
                None => serde_json::json!({}),
            };

            let mut new = NewApplication::new(actor.id, CategoryId(category), &subject)
                .details(details);
            if let Some(officer) = preferred_officer {
                new = new.preferred_officer(UserId(officer));
            }

            let store = FsDocumentStore::new(&document_dir);
            for path in &docs {
                let (name, url) = upload(&store, path)?;
                new = new.document(name, url);
            }

            let app = engine.create(new, &actor, ctx).await?;
            println!("Created: {} (status: {})", app.id, app.status);
        }
        AppAction::AddDoc {
            actor,
            id,
            file,
            document_dir,
        } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let store = FsDocumentStore::new(&document_dir);
            let (name, url) = upload(&store, &file)?;
            let app = engine.add_document(id, &actor, &name, &url, ctx).await?;
            println!("Added {} ({} document(s))", name, app.documents.len());
        }
        AppAction::Submit { actor, id, comments } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let app = engine.submit(id, &actor, comments, ctx).await?;
            println!("Submitted: {} (status: {})", app.id, app.status);
        }
        AppAction::Validate {
            actor,
            id,
            docs_complete,
            eligibility_verified,
            notes,
            reject,
            reason,
        } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let decision = if reject {
                ValidationDecision::Reject {
                    rejection_reason: reason
                        .ok_or_else(|| anyhow::anyhow!("--reason is required with --reject"))?,
                }
            } else {
                ValidationDecision::Accept {
                    is_documents_complete: docs_complete,
                    is_eligibility_verified: eligibility_verified,
                    validation_notes: notes,
                }
            };
            let app = engine.validate(id, &actor, decision, ctx).await?;
            match app.rr_number {
                Some(ref rr) => println!("Validated: {} (RR: {rr})", app.id),
                None => println!("Rejected: {} (status: {})", app.id, app.status),
            }
        }
        AppAction::Process { actor, id, comments } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let app = engine.process(id, &actor, comments, ctx).await?;
            println!("Processing: {} (status: {})", app.id, app.status);
        }
        AppAction::Approve { actor, id, comments } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let app = engine.approve(id, &actor, comments, ctx).await?;
            println!("Approved: {} (status: {})", app.id, app.status);
        }
        AppAction::Reject { actor, id, reason } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let app = engine.reject(id, &actor, reason, ctx).await?;
            println!("Rejected: {} (status: {})", app.id, app.status);
        }
        AppAction::Forward {
            actor,
            id,
            to,
            priority,
            instructions,
        } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let priority = priority
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid priority: {priority}"))?;
            let app = engine
                .forward(
                    id,
                    &actor,
                    ForwardRequest {
                        target_officer_id: UserId(to),
                        priority,
                        instructions,
                    },
                    ctx,
                )
                .await?;
            println!(
                "Forwarded: {} -> {}",
                app.id,
                app.current_holder_id
                    .map(|h| h.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        AppAction::Show { actor, id } => {
            let actor = principal(db, actor).await?;
            let id = resolve_id(engine, &actor, &id).await?;
            let app = engine.get(id, &actor).await?;
            print_application(&app);
        }
        AppAction::List {
            actor,
            status,
            mine,
            search,
            limit,
        } => {
            let actor = principal(db, actor).await?;
            let mut filter = ApplicationFilter::new();
            filter.limit = limit;
            filter.search = search;
            if mine {
                filter.holder = Some(actor.id);
            }
            if let Some(s) = status {
                filter.status =
                    Some(s.parse().map_err(|_| anyhow::anyhow!("invalid status: {s}"))?);
            }

            let items = engine.list(filter, &actor).await?;
            if items.is_empty() {
                println!("No applications found.");
                return Ok(());
            }

            println!(
                "{:<8}  {:<10}  {:<11}  {:<24}  {:<20}  CREATED",
                "ID", "RR", "STATUS", "SUBJECT", "CITIZEN"
            );
            println!("{}", "-".repeat(100));
            for item in &items {
                println!(
                    "{:<8}  {:<10}  {:<11}  {:<24}  {:<20}  {}",
                    item.id.to_string(),
                    item.rr_number.as_deref().unwrap_or("-"),
                    item.status.to_string(),
                    truncate(&item.subject, 24),
                    truncate(&item.citizen_name, 20),
                    item.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            println!("\n{} application(s)", items.len());
        }
        AppAction::Stats { actor } => {
            let actor = principal(db, actor).await?;
            let stats = engine.stats(&actor).await?;
            println!("Total:       {}", stats.total);
            println!("Pending:     {}", stats.pending);
            println!("In progress: {}", stats.in_progress);
            println!("Completed:   {}", stats.completed);
            println!("Overdue:     {}", stats.overdue);
        }
    }
    Ok(())
}

async fn cmd_notify(db: &Db, engine: &WorkflowEngine, action: NotifyAction) -> anyhow::Result<()> {
    match action {
        NotifyAction::List { actor, limit } => {
            let actor = principal(db, actor).await?;
            let items = engine.notifications(&actor, limit).await?;
            if items.is_empty() {
                println!("No notifications.");
                return Ok(());
            }
            for n in &items {
                let marker = if n.is_read { " " } else { "*" };
                println!(
                    "{marker} [{}] {}  {}\n    {}",
                    n.notification_type,
                    n.created_at.format("%Y-%m-%d %H:%M"),
                    n.title,
                    n.message
                );
            }
        }
        NotifyAction::Read { actor, id } => {
            let actor = principal(db, actor).await?;
            engine.mark_notification_read(id, &actor).await?;
            println!("Marked read: {id}");
        }
    }
    Ok(())
}

/// Resolve the acting principal by ID — the identity-gate boundary for the CLI.
async fn principal(db: &Db, id: Uuid) -> anyhow::Result<Principal> {
    Ok(db.get_user(UserId(id)).await?.principal())
}

/// Support prefix matching: find the application whose ID starts with the
/// given string.
async fn resolve_id(
    engine: &WorkflowEngine,
    actor: &Principal,
    id_str: &str,
) -> anyhow::Result<ApplicationId> {
    if id_str.len() == 36 {
        return Ok(ApplicationId(Uuid::parse_str(id_str)?));
    }

    let mut filter = ApplicationFilter::new();
    filter.limit = 100;
    let items = engine.list(filter, actor).await?;
    let matches: Vec<_> = items
        .iter()
        .filter(|item| item.id.0.to_string().starts_with(id_str))
        .collect();
    match matches.len() {
        0 => anyhow::bail!("no application matching prefix '{id_str}'"),
        1 => Ok(matches[0].id),
        n => anyhow::bail!("{n} applications match prefix '{id_str}' — be more specific"),
    }
}

fn upload(store: &FsDocumentStore, path: &PathBuf) -> anyhow::Result<(String, String)> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid file name: {}", path.display()))?
        .to_string();
    let url = store.store(&name, &bytes)?;
    Ok((name, url))
}

fn print_application(app: &Application) {
    println!("ID:         {}", app.id.0);
    println!("Subject:    {}", app.subject);
    println!("Status:     {}", app.status);
    println!("RR Number:  {}", app.rr_number.as_deref().unwrap_or("-"));
    println!("Citizen:    {}", app.citizen_id);
    println!(
        "Holder:     {}",
        app.current_holder_id
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Created:    {}", app.created_at);
    if let Some(at) = app.submitted_at {
        println!("Submitted:  {at}");
    }
    if let Some(at) = app.validated_at {
        println!("Validated:  {at}");
    }
    if let Some(at) = app.completed_at {
        println!("Completed:  {at}");
    }

    if !app.documents.is_empty() {
        println!("---");
        for doc in &app.documents {
            let mark = if doc.is_verified { "✓" } else { " " };
            println!("Doc {mark} {}  {}", doc.name, doc.file_url);
        }
    }

    if let Some(ref v) = app.validation {
        println!("---");
        println!("Validated by:   {}", v.validated_by);
        println!("Docs complete:  {}", v.is_documents_complete);
        println!("Eligibility:    {}", v.is_eligibility_verified);
        if let Some(ref notes) = v.validation_notes {
            println!("Notes:          {notes}");
        }
    }

    if !app.workflow.is_empty() {
        println!("---");
        for entry in &app.workflow {
            let from = entry
                .from_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "·".to_string());
            println!(
                "{}  {from} -> {}  by {}{}",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.to_status,
                entry.changed_by,
                entry
                    .comments
                    .as_deref()
                    .map(|c| format!("  ({c})"))
                    .unwrap_or_default()
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() > max { &s[..max] } else { s }
}
