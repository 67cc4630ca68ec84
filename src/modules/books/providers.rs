//! Id and time sources used by the book service.

use time::OffsetDateTime;
use uuid::{Timestamp, Uuid};

/// Produces a unique identifier per call.
pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> String;
}

/// UUID v7 ids in their 32-character simple form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdProvider;

impl IdProvider for UuidIdProvider {
    fn next_id(&self) -> String {
        Uuid::new_v7(Timestamp::now(uuid::NoContext))
            .simple()
            .to_string()
    }
}

/// Source of `insertedAt` / `updatedAt` values.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
