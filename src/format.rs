//! Human-readable CLI output formatting.
//!
//! JSON output bypasses this module and serializes the view types
//! directly.

use certdeck_common::id::short_id;
use certdeck_store::{Certificate, DistinguishedName, Expiry};
use certdeck_view::display::{days_label, domains_line, format_date, status_label};
use certdeck_view::ListedCertificate;

/// One list row.
///
/// Format: `ID\tNAME\tSTATUS\tDAYS\tISSUER`
pub fn certificate_line(row: &ListedCertificate) -> String {
    let cert = &row.certificate;
    format!(
        "{}\t{}\t{}\t{}\t{}",
        short_id(&cert.id),
        cert.name,
        status_label(row.status),
        days_label(row.days_remaining),
        cert.issuer
    )
}

/// Multi-line detail for `certdeck show`.
pub fn certificate_detail(cert: &Certificate, expiry: &Expiry) -> String {
    let mut out = vec![
        cert.name.clone(),
        format!("  ID:        {}", cert.id),
        format!("  Status:    {} ({})", status_label(expiry.status), days_label(expiry.days_remaining)),
        format!("  Issuer:    {}", issuer_line(cert)),
        format!("  Domains:   {}", domains_line(&cert.domains)),
        format!("  Issued:    {}", format_date(&cert.issued_at)),
        format!("  Expires:   {}", format_date(&cert.expires_at)),
    ];
    if let Some(serial) = &cert.serial_number {
        out.push(format!("  Serial:    {serial}"));
    }
    if let Some(algorithm) = &cert.signature_algorithm {
        out.push(format!("  Algorithm: {algorithm}"));
    }
    if let Some(description) = &cert.description {
        out.push(format!("  Description: {description}"));
    }
    if let Some(notes) = &cert.notes {
        out.push(format!("  Notes:     {notes}"));
    }
    push_name_block(&mut out, "Subject", &cert.subject);
    push_name_block(&mut out, "Issuer details", &cert.issuer_details);
    out.join("\n")
}

/// Issuer display string, with the detail record's name when it adds one.
fn issuer_line(cert: &Certificate) -> String {
    match cert.issuer_details.summary() {
        Some(detail) if detail != cert.issuer => format!("{} ({detail})", cert.issuer),
        _ => cert.issuer.clone(),
    }
}

fn push_name_block(out: &mut Vec<String>, title: &str, name: &DistinguishedName) {
    if name.is_empty() {
        return;
    }
    out.push(format!("  {title}:"));
    for (label, value) in name.fields() {
        if let Some(value) = value {
            out.push(format!("    {label}: {value}"));
        }
    }
}
