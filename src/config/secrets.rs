//! Secret handling utilities.
//!
//! Re-exports secrecy types used for configuration values that must not
//! appear in logs.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
