//! # jansewa
//!
//! Postgres-backed application-processing engine for a district e-services
//! portal.
//!
//! Citizens open service requests, front desk validates them and mints an
//! RR registration number, officers process, approve, reject, or forward
//! cases. Every status transition runs as one atomic transaction that also
//! appends workflow history and an audit row, then fans out notifications
//! after commit.

pub mod clock;
pub mod config;
pub mod db;
pub mod docstore;
pub mod engine;
pub mod error;
pub mod model;
pub mod policy;
pub mod rr;
pub mod telemetry;
