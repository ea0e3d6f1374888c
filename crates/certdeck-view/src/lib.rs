//! View pipeline: turns the stored collection plus the user's filter and
//! sort choices into the list a front end renders.

pub mod collate;
pub mod display;
pub mod pipeline;
pub mod query;

pub use display::EmptyState;
pub use pipeline::{derive, issuer_options, CertificateView, ListedCertificate};
pub use query::{ExpirationFilter, ParseOptionError, SortOption, ViewQuery};
