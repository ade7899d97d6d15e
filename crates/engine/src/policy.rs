//! Billing policy.

/// Default per-period dues, in minor currency units.
pub const DEFAULT_DUES_MINOR: i64 = 100_000;

/// Default number of days between generation and the due date.
pub const DEFAULT_GRACE_DAYS: i64 = 14;

/// System-wide billing policy. One value for every member; there are no
/// per-member overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillingPolicy {
    pub amount_due_minor: i64,
    pub grace_days: i64,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            amount_due_minor: DEFAULT_DUES_MINOR,
            grace_days: DEFAULT_GRACE_DAYS,
        }
    }
}
