//! Implementations of the identifier generators and clocks.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Allocates unique string identifiers.
///
/// Implementations must never return the same identifier twice for the same prefix over the
/// lifetime of the generator.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, prefix: &str) -> String;
}

/// Monotonic counter: `<prefix>1`, `<prefix>2`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}{n}")
    }
}

/// Timestamp-derived identifiers: `<prefix><unix millis>`.
///
/// # Monotonicity Guarantee
///
/// Each generated timestamp is strictly greater than the previous one from the same generator.
/// When the clock has not advanced (or has gone backwards) the previous timestamp is bumped by
/// 1 ms, so two saves inside the same millisecond still get distinct ids.
pub struct TimestampIdGenerator {
    clock: Arc<dyn Clock>,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl TimestampIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: Mutex::new(None),
        }
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        // A poisoned lock only means another holder panicked; the stored instant is still valid.
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let timestamp = match *last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        *last = Some(timestamp);
        timestamp
    }
}

impl Default for TimestampIdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_timestamp().timestamp_millis())
    }
}

/// Random v4 UUID identifiers in simple (unhyphenated) form.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", Uuid::new_v4().simple())
    }
}
