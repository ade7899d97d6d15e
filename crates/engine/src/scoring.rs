//! Timeliness scoring policy.

use chrono::{DateTime, Utc};

/// Points awarded for a payment verified on or before the due date.
pub const ON_TIME_POINTS: i64 = 10;

/// Points awarded for a payment verified after the due date.
pub const LATE_POINTS: i64 = 5;

/// Maps payment timeliness to a score delta.
///
/// Paying exactly at the due date counts as on time.
pub fn payment_points(paid_at: DateTime<Utc>, due_date: DateTime<Utc>) -> i64 {
    if paid_at <= due_date {
        ON_TIME_POINTS
    } else {
        LATE_POINTS
    }
}
