//! Metric instrument factories.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"jansewa"` meter.

use opentelemetry::metrics::{Counter, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("jansewa")
}

/// Counter: application status transitions (forwards count as `from == to`).
/// Labels: `from`, `to`.
pub fn application_transitions() -> Counter<u64> {
    meter()
        .u64_counter("jansewa.application.transitions")
        .with_description("Number of application status transitions")
        .build()
}

/// Counter: RR registration numbers minted at validation.
pub fn rr_numbers_minted() -> Counter<u64> {
    meter()
        .u64_counter("jansewa.rr_numbers.minted")
        .with_description("Number of RR registration numbers minted")
        .build()
}

/// Counter: notifications dispatched after commit.
/// Labels: `result` ("ok" | "error").
pub fn notifications_dispatched() -> Counter<u64> {
    meter()
        .u64_counter("jansewa.notifications.dispatched")
        .with_description("Number of notifications dispatched")
        .build()
}
