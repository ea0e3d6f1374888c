//! User-selected filter and sort state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use certdeck_store::ExpirationStatus;

/// Expiration bucket a user can narrow the list to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpirationFilter {
    #[default]
    All,
    Valid,
    Expiring,
    Expired,
}

impl ExpirationFilter {
    pub const ALL: [ExpirationFilter; 4] = [Self::All, Self::Valid, Self::Expiring, Self::Expired];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Valid => "valid",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
        }
    }

    pub fn matches(&self, status: ExpirationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Valid => status == ExpirationStatus::Valid,
            Self::Expiring => status == ExpirationStatus::Warning,
            Self::Expired => status == ExpirationStatus::Expired,
        }
    }
}

/// Ordering applied to the filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    ExpirationAsc,
    ExpirationDesc,
    NameAsc,
    NameDesc,
    Issuer,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        Self::ExpirationAsc,
        Self::ExpirationDesc,
        Self::NameAsc,
        Self::NameDesc,
        Self::Issuer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpirationAsc => "expiration-asc",
            Self::ExpirationDesc => "expiration-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Issuer => "issuer",
        }
    }
}

/// Error parsing a filter or sort name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: String,
}

fn parse_named<T: Copy>(
    kind: &'static str,
    s: &str,
    all: &[T],
    name: fn(&T) -> &'static str,
) -> Result<T, ParseOptionError> {
    let wanted = s.trim().to_ascii_lowercase();
    all.iter()
        .find(|v| name(v) == wanted)
        .copied()
        .ok_or_else(|| ParseOptionError {
            kind,
            value: s.to_string(),
            expected: all.iter().map(name).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for ExpirationFilter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("expiration filter", s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for SortOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("sort option", s, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for ExpirationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the list screen lets a user choose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default)]
    pub expiration: ExpirationFilter,
    #[serde(default)]
    pub sort: SortOption,
}

impl ViewQuery {
    pub fn with_sort(sort: SortOption) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Reset search, issuer and expiration filters. The sort is kept.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.issuer = None;
        self.expiration = ExpirationFilter::All;
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty() || self.issuer.is_some() || self.expiration != ExpirationFilter::All
    }
}
