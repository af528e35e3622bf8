//! Core data model.
//!
//! An application is a citizen's service request moving through the
//! front-desk/officer pipeline. It has identity, a lifecycle status, an
//! owning citizen, a current holder, and append-only side records
//! (documents, workflow history, assignments, validation, audit).

pub mod application;
pub mod notification;

pub use application::*;
pub use notification::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Newtype for application IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub Uuid);

impl ApplicationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Newtype for user IDs (citizens, staff, officers alike).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for service category IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub Uuid);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Role of an acting principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    FrontDesk,
    Dc,
    Adc,
    Ro,
    Sdm,
    DyDir,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Processing-tier officer roles: may hold and act on validated applications.
    pub fn is_officer(self) -> bool {
        matches!(self, Role::Dc | Role::Adc | Role::Ro | Role::Sdm | Role::DyDir)
    }

    /// Admin roles bypass role gating (not structural preconditions).
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Citizen => "citizen",
            Role::FrontDesk => "front_desk",
            Role::Dc => "dc",
            Role::Adc => "adc",
            Role::Ro => "ro",
            Role::Sdm => "sdm",
            Role::DyDir => "dy_dir",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Role::Citizen),
            "front_desk" => Ok(Role::FrontDesk),
            "dc" => Ok(Role::Dc),
            "adc" => Ok(Role::Adc),
            "ro" => Ok(Role::Ro),
            "sdm" => Ok(Role::Sdm),
            "dy_dir" => Ok(Role::DyDir),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(Error::Validation(format!("unknown role: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Principal & request context
// ---------------------------------------------------------------------------

/// The acting principal as resolved by the identity gate.
///
/// The engine trusts this as given; credential verification happened
/// upstream.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub is_active: bool,
}

/// Per-request provenance recorded on audit rows.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip_address: Option<String>,
}

// ---------------------------------------------------------------------------
// Users (identity read-side)
// ---------------------------------------------------------------------------

/// A user row. Administration of users is out of scope; the engine reads
/// this table to resolve the front-desk pool and check forward targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    /// Officers flag themselves unavailable to stop receiving forwards.
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            is_active: self.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Service categories
// ---------------------------------------------------------------------------

/// Reference data carrying the SLA used for due-date computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: CategoryId,
    pub name: String,
    pub sla_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Assignment priority. Stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn code(self) -> i32 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Priority::High),
            2 => Some(Priority::Medium),
            3 => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::Validation(format!("unknown priority: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in [
            Role::Citizen,
            Role::FrontDesk,
            Role::Dc,
            Role::Adc,
            Role::Ro,
            Role::Sdm,
            Role::DyDir,
            Role::Admin,
            Role::SuperAdmin,
        ] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn officer_and_admin_classification() {
        assert!(Role::Dc.is_officer());
        assert!(Role::DyDir.is_officer());
        assert!(!Role::Citizen.is_officer());
        assert!(!Role::FrontDesk.is_officer());
        assert!(!Role::Admin.is_officer());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::Ro.is_admin());
    }

    #[test]
    fn priority_codes() {
        assert_eq!(Priority::High.code(), 1);
        assert_eq!(Priority::from_code(3), Some(Priority::Low));
        assert_eq!(Priority::from_code(0), None);
    }
}
