//! Transition span helpers.
//!
//! One span per lifecycle operation, so history appends and notification
//! dispatch show up under the transition that caused them.

use tracing::Span;

use crate::model::ApplicationId;

/// Start a span for a lifecycle operation on an application.
pub fn transition_span(action: &str, id: &ApplicationId) -> Span {
    tracing::info_span!(
        "application.transition",
        "application.action" = action,
        "application.id" = %id.0,
    )
}
