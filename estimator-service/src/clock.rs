use time::OffsetDateTime;

/// Source of the current instant for clock-derived features.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Local wall clock, falling back to UTC when the local offset cannot be
/// determined (e.g. multi-threaded processes on some Unix targets).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
