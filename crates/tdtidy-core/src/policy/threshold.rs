//! Threshold policy: retention period (days) -> absolute cutoff.

use chrono::{DateTime, Days, Utc};

use crate::domain::TidyError;
use crate::ports::Clock;

/// Compute the cutoff instant `now - retention_period_days`, in UTC.
///
/// Call once per run and reuse the result, so every comparison in the run
/// sees the same cutoff. `0` days yields `now`.
pub fn threshold<C: Clock + ?Sized>(
    clock: &C,
    retention_period_days: u32,
) -> Result<DateTime<Utc>, TidyError> {
    clock
        .now()
        .checked_sub_days(Days::new(u64::from(retention_period_days)))
        .ok_or(TidyError::ThresholdOutOfRange {
            days: retention_period_days,
        })
}
