//! Read-side projections for dashboards: filtered lists and aggregate
//! counts. Derived per query, never stored.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{ApplicationId, ApplicationStatus, UserId};

/// Filters for the paginated application list.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    /// Only applications currently held by this officer ("assigned to me").
    pub holder: Option<UserId>,
    /// Only applications owned by this citizen.
    pub citizen: Option<UserId>,
    /// Case-insensitive match on RR number, citizen name, or service name.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ApplicationFilter {
    pub fn new() -> Self {
        Self {
            limit: 20,
            ..Default::default()
        }
    }
}

/// One row of the application list: the aggregate plus the joined names
/// the dashboard displays and searches over.
#[derive(Debug, Clone)]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    pub rr_number: Option<String>,
    pub subject: String,
    pub status: ApplicationStatus,
    pub citizen_name: String,
    pub service_name: String,
    pub current_holder_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    /// Validated, not yet done, and past the category SLA.
    pub overdue: i64,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    rr_number: Option<String>,
    subject: String,
    status: String,
    citizen_name: String,
    service_name: String,
    current_holder_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl super::Db {
    /// Paginated application list, newest first.
    pub async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationSummary>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT a.id, a.rr_number, a.subject, a.status,
                    u.full_name AS citizen_name, c.name AS service_name,
                    a.current_holder_id, a.created_at, a.updated_at
             FROM applications a
             JOIN users u ON u.id = a.citizen_id
             JOIN service_categories c ON c.id = a.service_category_id
             WHERE TRUE",
        );

        if let Some(status) = filter.status {
            qb.push(" AND a.status = ").push_bind(status.to_string());
        }
        if let Some(holder) = filter.holder {
            qb.push(" AND a.current_holder_id = ").push_bind(holder.0);
        }
        if let Some(citizen) = filter.citizen {
            qb.push(" AND a.citizen_id = ").push_bind(citizen.0);
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (a.rr_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.full_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY a.created_at DESC, a.id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows: Vec<SummaryRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|r| {
                Ok(ApplicationSummary {
                    id: ApplicationId(r.id),
                    rr_number: r.rr_number,
                    subject: r.subject,
                    status: r.status.parse()?,
                    citizen_name: r.citizen_name,
                    service_name: r.service_name,
                    current_holder_id: r.current_holder_id.map(UserId),
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                })
            })
            .collect()
    }

    /// Aggregate counts over the whole application set.
    ///
    /// `now` is the injected clock reading; overdue compares it against
    /// `validated_at + sla_days` for cases still in flight.
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let (total, pending, in_progress, completed, overdue): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*),
                        COUNT(*) FILTER (WHERE a.status = 'pending'),
                        COUNT(*) FILTER (WHERE a.status = 'in_progress'),
                        COUNT(*) FILTER (WHERE a.status IN ('approved', 'completed')),
                        COUNT(*) FILTER (WHERE a.status IN ('validated', 'in_progress')
                            AND a.validated_at + make_interval(days => c.sla_days) < $1)
                 FROM applications a
                 JOIN service_categories c ON c.id = a.service_category_id",
            )
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            total,
            pending,
            in_progress,
            completed,
            overdue,
        })
    }
}
