//! Expiration classification.
//!
//! Pure functions from an expiry instant to a day count and a tri-state
//! status. Unparseable expiry dates classify as [`ExpirationStatus::Expired`]
//! with no day count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Timestamp;

/// Certificates with fewer than this many whole days left are "expiring soon".
pub const WARNING_THRESHOLD_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Expiration state of a certificate at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpirationStatus {
    Valid,
    Warning,
    Expired,
}

/// Day count plus status, as evaluated against one "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expiry {
    /// `None` when the expiry date could not be parsed.
    pub days_remaining: Option<i64>,
    pub status: ExpirationStatus,
}

/// Whole days from `now` until `expires_at`, rounded toward negative infinity.
///
/// One millisecond past expiry is already day `-1`.
pub fn days_remaining(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> i64 {
    (expires_at - now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Classify a day count.
pub fn classify_days(days: i64) -> ExpirationStatus {
    if days < 0 {
        ExpirationStatus::Expired
    } else if days < WARNING_THRESHOLD_DAYS {
        ExpirationStatus::Warning
    } else {
        ExpirationStatus::Valid
    }
}

/// Classify a stored expiry timestamp. Total: garbage input yields `Expired`.
pub fn classify(now: DateTime<Utc>, expires_at: &Timestamp) -> Expiry {
    match expires_at.parse() {
        Some(instant) => {
            let days = days_remaining(now, instant);
            Expiry {
                days_remaining: Some(days),
                status: classify_days(days),
            }
        }
        None => Expiry {
            days_remaining: None,
            status: ExpirationStatus::Expired,
        },
    }
}
