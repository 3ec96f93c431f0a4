//! Identifier and clock utilities.
//!
//! Every identifier clinform persists (template ids, section and field ids, record ids) is
//! allocated through an injected [`IdGenerator`] rather than read ad hoc from the wall clock, and
//! every timestamp comes from an injected [`Clock`]. Production code uses the timestamp
//! generator and the system clock; tests use [`SequentialIdGenerator`] and [`FixedClock`] so
//! store behaviour is deterministic.
//!
//! ## Identifier forms
//! - Timestamp: `<prefix><unix millis>`, e.g. `RPT1736605322045`. Human-scannable and strictly
//!   increasing per generator.
//! - Sequential: `<prefix><n>` starting at 1, e.g. `field_1`.
//! - UUID: `<prefix><32 lowercase hex>`, for callers that need global uniqueness.

mod service;

pub use service::{
    Clock, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock, TimestampIdGenerator,
    UuidIdGenerator,
};
