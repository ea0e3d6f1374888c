//! Derivation from the raw collection to the rendered list.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use certdeck_store::{classify, Certificate, ExpirationStatus};

use crate::collate::LocaleCollator;
use crate::query::{SortOption, ViewQuery};

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedCertificate {
    #[serde(flatten)]
    pub certificate: Certificate,
    /// `None` when `expiresAt` could not be parsed.
    pub days_remaining: Option<i64>,
    pub status: ExpirationStatus,
}

/// Everything the list screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub issuer_options: Vec<String>,
    pub certificates: Vec<ListedCertificate>,
    /// No certificates have been added at all.
    pub collection_is_empty: bool,
    /// Certificates exist but none pass the current filters.
    pub filtered_is_empty: bool,
}

impl CertificateView {
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

/// Distinct non-empty issuers, ascending.
pub fn issuer_options(certificates: &[Certificate]) -> Vec<String> {
    certificates
        .iter()
        .filter(|c| !c.issuer.is_empty())
        .map(|c| c.issuer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Case-insensitive substring match on name, any domain, or issuer.
pub fn matches_search(certificate: &Certificate, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    certificate.name.to_lowercase().contains(&needle)
        || certificate
            .domains
            .iter()
            .any(|d| d.to_lowercase().contains(&needle))
        || certificate.issuer.to_lowercase().contains(&needle)
}

/// Compare two rows under `sort`.
///
/// For the expiration orders an unparseable `expiresAt` counts as earlier
/// than every real date: first when ascending, last when descending.
pub fn compare(
    collator: &mut LocaleCollator,
    sort: SortOption,
    a: &Certificate,
    b: &Certificate,
) -> Ordering {
    match sort {
        SortOption::ExpirationAsc => expiry_key(a).cmp(&expiry_key(b)),
        SortOption::ExpirationDesc => expiry_key(b).cmp(&expiry_key(a)),
        SortOption::NameAsc => collator.compare(&a.name, &b.name),
        SortOption::NameDesc => collator.compare(&b.name, &a.name),
        SortOption::Issuer => collator.compare(&a.issuer, &b.issuer),
    }
}

// `None < Some(_)`, which puts unparseable dates first.
fn expiry_key(certificate: &Certificate) -> Option<DateTime<Utc>> {
    certificate.expires_at.parse()
}

/// Filter, classify and sort `certificates` for display at `now`.
pub fn derive(certificates: &[Certificate], query: &ViewQuery, now: DateTime<Utc>) -> CertificateView {
    let mut rows: Vec<ListedCertificate> = certificates
        .iter()
        .filter(|c| matches_search(c, &query.search))
        .filter(|c| query.issuer.as_deref().map_or(true, |issuer| c.issuer == issuer))
        .filter_map(|c| {
            let expiry = classify(now, &c.expires_at);
            query.expiration.matches(expiry.status).then(|| ListedCertificate {
                certificate: c.clone(),
                days_remaining: expiry.days_remaining,
                status: expiry.status,
            })
        })
        .collect();

    // Stable: equal keys keep collection order.
    let mut collator = LocaleCollator::new();
    rows.sort_by(|a, b| compare(&mut collator, query.sort, &a.certificate, &b.certificate));

    tracing::trace!(
        total = certificates.len(),
        shown = rows.len(),
        sort = %query.sort,
        "Certificate view derived"
    );

    CertificateView {
        issuer_options: issuer_options(certificates),
        collection_is_empty: certificates.is_empty(),
        filtered_is_empty: rows.is_empty(),
        certificates: rows,
    }
}
