/// Source of the human-readable `lastUpdated` stamps.
pub trait Clock {
    fn stamp(&self) -> String;
}

/// Format used for every `lastUpdated` value, e.g. `2024-06-26 10:30 AM`.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn stamp(&self) -> String {
        jiff::Zoned::now().strftime(STAMP_FORMAT).to_string()
    }
}

/// Always returns the same stamp.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(stamp: impl Into<String>) -> Self {
        Self(stamp.into())
    }
}

impl Clock for FixedClock {
    fn stamp(&self) -> String {
        self.0.clone()
    }
}
