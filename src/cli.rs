use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use certdeck_view::{ExpirationFilter, SortOption};

#[derive(Parser, Debug)]
#[command(name = "certdeck", version, about = "Track TLS certificates and when they expire")]
pub struct Cli {
    /// Directory holding certificates.json and config.toml
    #[arg(long, env = "CERTDECK_DATA_DIR", value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "CERTDECK_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to file (in addition to stderr)
    #[arg(long, env = "CERTDECK_LOG_FILE", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Effective tracing filter after `-v` flags.
    pub fn log_filter(&self) -> &str {
        match self.verbose {
            0 => self.log_level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List certificates, filtered and sorted
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show one certificate in detail
    Show {
        /// Certificate ID or unambiguous prefix
        id: String,
    },
    /// Track a new certificate
    Add(AddArgs),
    /// Change fields of a tracked certificate
    Update(UpdateArgs),
    /// Stop tracking a certificate
    #[command(visible_alias = "rm")]
    Remove {
        /// Certificate ID or unambiguous prefix
        id: String,
    },
    /// List the distinct issuers in the collection
    Issuers,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on name, domains or issuer
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only certificates from this issuer (exact match)
    #[arg(long)]
    pub issuer: Option<String>,

    /// Expiration bucket: all, valid, expiring, expired
    #[arg(long, default_value = "all")]
    pub status: ExpirationFilter,

    /// expiration-asc, expiration-desc, name-asc, name-desc, issuer
    /// (default from config.toml)
    #[arg(long)]
    pub sort: Option<SortOption>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Issuing authority
    #[arg(long)]
    pub issuer: String,

    /// Covered domain (repeatable)
    #[arg(long = "domain", value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// Issue date (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub issued_at: String,

    /// Expiry date (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub expires_at: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub serial_number: Option<String>,

    #[arg(long)]
    pub signature_algorithm: Option<String>,

    /// Subject attribute as KEY=VALUE (cn, o, ou, c, st, l, email)
    #[arg(long = "subject", value_name = "KEY=VALUE")]
    pub subject: Vec<String>,

    /// Issuer attribute as KEY=VALUE (cn, o, ou, c, st, l, email)
    #[arg(long = "issuer-detail", value_name = "KEY=VALUE")]
    pub issuer_details: Vec<String>,
}

/// Fields left out are unchanged. An empty string clears an optional
/// text field.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Certificate ID or unambiguous prefix
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub issuer: Option<String>,

    /// Replace the domain list (repeatable)
    #[arg(long = "domain", value_name = "DOMAIN")]
    pub domains: Vec<String>,

    #[arg(long)]
    pub issued_at: Option<String>,

    #[arg(long)]
    pub expires_at: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub serial_number: Option<String>,

    #[arg(long)]
    pub signature_algorithm: Option<String>,

    /// Replace the subject details with these KEY=VALUE attributes
    #[arg(long = "subject", value_name = "KEY=VALUE")]
    pub subject: Vec<String>,

    /// Replace the issuer details with these KEY=VALUE attributes
    #[arg(long = "issuer-detail", value_name = "KEY=VALUE")]
    pub issuer_details: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_parses_filters() {
        let cli = Cli::try_parse_from([
            "certdeck", "list", "--search", "api", "--issuer", "Internal", "--status", "expiring",
            "--sort", "name-desc",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.search.as_deref(), Some("api"));
        assert_eq!(args.issuer.as_deref(), Some("Internal"));
        assert_eq!(args.status, ExpirationFilter::Expiring);
        assert_eq!(args.sort, Some(SortOption::NameDesc));
    }

    #[test]
    fn list_defaults() {
        let cli = Cli::try_parse_from(["certdeck", "ls"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.status, ExpirationFilter::All);
        assert_eq!(args.sort, None);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        assert!(Cli::try_parse_from(["certdeck", "list", "--sort", "newest"]).is_err());
    }

    #[test]
    fn add_collects_repeated_domains() {
        let cli = Cli::try_parse_from([
            "certdeck", "add", "--name", "Prod", "--issuer", "LetsEncrypt", "--domain", "a.example.com",
            "--domain", "b.example.com", "--issued-at", "2026-01-01", "--expires-at", "2027-01-01",
            "--subject", "cn=a.example.com",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.domains, vec!["a.example.com", "b.example.com"]);
        assert_eq!(args.subject, vec!["cn=a.example.com"]);
    }

    #[test]
    fn add_requires_dates() {
        assert!(Cli::try_parse_from(["certdeck", "add", "--name", "x", "--issuer", "y"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["certdeck", "issuers", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn log_filter_uses_level_without_verbose() {
        let cli = Cli::try_parse_from(["certdeck", "--log-level", "info", "issuers"]).unwrap();
        assert_eq!(cli.log_filter(), "info");
    }
}
