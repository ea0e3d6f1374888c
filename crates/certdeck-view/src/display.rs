//! Labels and formatting shared by every front end.

use certdeck_store::{ExpirationStatus, Timestamp};

use crate::pipeline::CertificateView;

pub fn status_label(status: ExpirationStatus) -> &'static str {
    match status {
        ExpirationStatus::Valid => "Valid",
        ExpirationStatus::Warning => "Expiring Soon",
        ExpirationStatus::Expired => "Expired",
    }
}

/// "N days remaining", or "Expired N days ago" once past expiry.
pub fn days_label(days_remaining: Option<i64>) -> String {
    match days_remaining {
        Some(days) if days < 0 => format!("Expired {} days ago", days.unsigned_abs()),
        Some(days) => format!("{days} days remaining"),
        None => "Unknown expiry".to_string(),
    }
}

/// Medium date, e.g. "Oct 17, 2026".
pub fn format_date(timestamp: &Timestamp) -> String {
    timestamp
        .parse()
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

pub fn domains_line(domains: &[String]) -> String {
    domains.join(", ")
}

/// Placeholder shown instead of rows: title, then hint on the next line.
/// `None` when there are rows.
pub fn empty_state_message(view: &CertificateView) -> Option<String> {
    EmptyState::of(view).map(|state| format!("{}\n{}", state.title(), state.description()))
}

/// Which placeholder the list screen shows instead of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing has been added yet.
    NoCertificates,
    /// Certificates exist but the filters hide all of them.
    NoMatches,
}

impl EmptyState {
    pub fn of(view: &CertificateView) -> Option<Self> {
        if view.collection_is_empty {
            Some(Self::NoCertificates)
        } else if view.filtered_is_empty {
            Some(Self::NoMatches)
        } else {
            None
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NoCertificates => "No certificates added",
            Self::NoMatches => "No certificates found",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoCertificates => {
                "You haven't added any certificates yet. Add one to get started."
            }
            Self::NoMatches => {
                "No certificates match your search criteria. Try different filters or search terms."
            }
        }
    }
}
