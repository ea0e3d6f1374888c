//! Certificate record data model.
//!
//! Field names serialize in camelCase so the persisted collection keeps
//! the layout browsers have been writing under the `certificates` key.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Distinguished-name style detail record. Every attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistinguishedName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizational_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

pub type CertificateSubject = DistinguishedName;
pub type CertificateIssuer = DistinguishedName;

impl DistinguishedName {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }

    /// Best single-line label: common name, else organization.
    pub fn summary(&self) -> Option<&str> {
        self.common_name
            .as_deref()
            .or(self.organization.as_deref())
    }

    /// Labelled attributes in display order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("Common Name", self.common_name.as_deref()),
            ("Organization", self.organization.as_deref()),
            ("Organizational Unit", self.organizational_unit.as_deref()),
            ("Country", self.country.as_deref()),
            ("State", self.state.as_deref()),
            ("Locality", self.locality.as_deref()),
            ("Email", self.email_address.as_deref()),
        ]
    }
}

/// A date-time kept in its serialized text form.
///
/// Parsing is deferred so a single malformed value never makes the whole
/// collection unreadable. Use [`Timestamp::parse`] to get an instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into a UTC instant.
    ///
    /// Accepts RFC 3339, the same with minute precision
    /// (`2026-12-01T10:00Z`, `2026-12-01T10:00+02:00`), a naive
    /// `YYYY-MM-DDTHH:MM[:SS[.fff]]` (read as UTC) and a bare `YYYY-MM-DD`
    /// (midnight UTC). Anything else is `None`.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
                return Some(dt.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub issuer_details: CertificateIssuer,
    #[serde(default)]
    pub subject: CertificateSubject,
    #[serde(default)]
    pub domains: Vec<String>,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,
}

/// Payload for creating a certificate. Everything but the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub issuer_details: CertificateIssuer,
    #[serde(default)]
    pub subject: CertificateSubject,
    #[serde(default)]
    pub domains: Vec<String>,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,
}

impl CertificateData {
    pub fn into_certificate(self, id: String) -> Certificate {
        Certificate {
            id,
            name: self.name,
            issuer: self.issuer,
            issuer_details: self.issuer_details,
            subject: self.subject,
            domains: self.domains,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            description: self.description,
            notes: self.notes,
            serial_number: self.serial_number,
            signature_algorithm: self.signature_algorithm,
        }
    }
}

/// Partial update for an existing certificate.
///
/// `None` leaves a field untouched. For the optional text fields the inner
/// `Option` is the new value, so `Some(None)` clears the field. The id is
/// not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificatePatch {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub issuer_details: Option<CertificateIssuer>,
    pub subject: Option<CertificateSubject>,
    pub domains: Option<Vec<String>>,
    pub issued_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub description: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub serial_number: Option<Option<String>>,
    pub signature_algorithm: Option<Option<String>>,
}

impl CertificatePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the present fields into `cert`.
    pub fn apply(self, cert: &mut Certificate) {
        if let Some(v) = self.name {
            cert.name = v;
        }
        if let Some(v) = self.issuer {
            cert.issuer = v;
        }
        if let Some(v) = self.issuer_details {
            cert.issuer_details = v;
        }
        if let Some(v) = self.subject {
            cert.subject = v;
        }
        if let Some(v) = self.domains {
            cert.domains = v;
        }
        if let Some(v) = self.issued_at {
            cert.issued_at = v;
        }
        if let Some(v) = self.expires_at {
            cert.expires_at = v;
        }
        if let Some(v) = self.description {
            cert.description = v;
        }
        if let Some(v) = self.notes {
            cert.notes = v;
        }
        if let Some(v) = self.serial_number {
            cert.serial_number = v;
        }
        if let Some(v) = self.signature_algorithm {
            cert.signature_algorithm = v;
        }
    }
}
