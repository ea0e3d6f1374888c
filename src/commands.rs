//! CLI subcommand handlers.
//!
//! Each handler runs one verb against an open store and writes human or
//! JSON output to `out`. Store construction and CLI parsing live in
//! `main.rs`; text layout lives in `format.rs`.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use certdeck_store::{
    classify, CertificateData, CertificatePatch, CertificateStore, DistinguishedName,
    DurableStore, Timestamp,
};
use certdeck_view::display::empty_state_message;
use certdeck_view::{derive, issuer_options, ListedCertificate, SortOption, ViewQuery};

use crate::cli::{AddArgs, ListArgs, UpdateArgs};
use crate::format;

/// Bad user input that never reached the store.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidInput(pub String);

pub fn list<S: DurableStore>(
    store: &CertificateStore<S>,
    args: ListArgs,
    default_sort: SortOption,
    now: DateTime<Utc>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let query = ViewQuery {
        search: args.search.unwrap_or_default(),
        issuer: args.issuer,
        expiration: args.status,
        sort: args.sort.unwrap_or(default_sort),
    };
    let view = derive(store.certificates(), &query, now);

    if json {
        return write_json(out, &view);
    }
    if let Some(message) = empty_state_message(&view) {
        writeln!(out, "{message}")?;
        return Ok(());
    }
    for row in &view.certificates {
        writeln!(out, "{}", format::certificate_line(row))?;
    }
    Ok(())
}

pub fn show<S: DurableStore>(
    store: &CertificateStore<S>,
    id: &str,
    now: DateTime<Utc>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let id = store.resolve_id(id)?;
    let Some(certificate) = store.get(&id) else {
        return Err(certdeck_store::StoreError::NotFound(id).into());
    };
    let expiry = classify(now, &certificate.expires_at);

    if json {
        return write_json(
            out,
            &ListedCertificate {
                certificate,
                days_remaining: expiry.days_remaining,
                status: expiry.status,
            },
        );
    }
    writeln!(out, "{}", format::certificate_detail(&certificate, &expiry))?;
    Ok(())
}

pub fn add<S: DurableStore>(
    store: &mut CertificateStore<S>,
    args: AddArgs,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let data = CertificateData {
        name: required("name", args.name)?,
        issuer: required("issuer", args.issuer)?,
        issuer_details: parse_name(&args.issuer_details)?,
        subject: parse_name(&args.subject)?,
        domains: args.domains,
        issued_at: parse_date("issued-at", &args.issued_at)?,
        expires_at: parse_date("expires-at", &args.expires_at)?,
        description: non_empty(args.description),
        notes: non_empty(args.notes),
        serial_number: non_empty(args.serial_number),
        signature_algorithm: non_empty(args.signature_algorithm),
    };
    let certificate = store.add(data)?;

    if json {
        return write_json(out, &certificate);
    }
    writeln!(out, "Added \"{}\" [id: {}]", certificate.name, certificate.id)?;
    Ok(())
}

pub fn update<S: DurableStore>(
    store: &mut CertificateStore<S>,
    args: UpdateArgs,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let id = store.resolve_id(&args.id)?;
    let patch = CertificatePatch {
        name: args.name.map(|v| required("name", v)).transpose()?,
        issuer: args.issuer.map(|v| required("issuer", v)).transpose()?,
        issuer_details: optional_name(&args.issuer_details)?,
        subject: optional_name(&args.subject)?,
        domains: (!args.domains.is_empty()).then_some(args.domains),
        issued_at: args
            .issued_at
            .map(|v| parse_date("issued-at", &v))
            .transpose()?,
        expires_at: args
            .expires_at
            .map(|v| parse_date("expires-at", &v))
            .transpose()?,
        description: args.description.map(|v| non_empty(Some(v))),
        notes: args.notes.map(|v| non_empty(Some(v))),
        serial_number: args.serial_number.map(|v| non_empty(Some(v))),
        signature_algorithm: args.signature_algorithm.map(|v| non_empty(Some(v))),
    };
    if patch.is_empty() {
        return Err(InvalidInput("nothing to update, pass at least one field".to_string()).into());
    }
    store.update(&id, patch)?;

    if json {
        return write_json(out, &store.get(&id));
    }
    writeln!(out, "Updated {id}")?;
    Ok(())
}

pub fn remove<S: DurableStore>(
    store: &mut CertificateStore<S>,
    id: &str,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let id = store.resolve_id(id)?;
    store.remove(&id)?;

    if json {
        return write_json(out, &serde_json::json!({ "removed": id }));
    }
    writeln!(out, "Removed {id}")?;
    Ok(())
}

pub fn issuers<S: DurableStore>(
    store: &CertificateStore<S>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let options = issuer_options(store.certificates());
    if json {
        return write_json(out, &options);
    }
    for issuer in options {
        writeln!(out, "{issuer}")?;
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn required(field: &str, value: String) -> Result<String, InvalidInput> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept any supported date form and store it as RFC 3339 UTC.
fn parse_date(field: &str, raw: &str) -> Result<Timestamp, InvalidInput> {
    Timestamp::new(raw)
        .parse()
        .map(Timestamp::from)
        .ok_or_else(|| InvalidInput(format!("{field}: '{raw}' is not a date (use RFC 3339 or YYYY-MM-DD)")))
}

/// Build a distinguished name from `KEY=VALUE` entries.
fn parse_name(entries: &[String]) -> Result<DistinguishedName, InvalidInput> {
    let mut name = DistinguishedName::default();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(InvalidInput(format!("'{entry}' is not KEY=VALUE")));
        };
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "cn" | "common-name" => &mut name.common_name,
            "o" | "organization" => &mut name.organization,
            "ou" | "organizational-unit" => &mut name.organizational_unit,
            "c" | "country" => &mut name.country,
            "st" | "state" => &mut name.state,
            "l" | "locality" => &mut name.locality,
            "email" | "emailaddress" => &mut name.email_address,
            other => {
                return Err(InvalidInput(format!(
                    "unknown name attribute '{other}' (expected cn, o, ou, c, st, l, email)"
                )))
            }
        };
        *slot = value;
    }
    Ok(name)
}

fn optional_name(entries: &[String]) -> Result<Option<DistinguishedName>, InvalidInput> {
    if entries.is_empty() {
        return Ok(None);
    }
    parse_name(entries).map(Some)
}
