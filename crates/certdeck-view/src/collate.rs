//! Locale-aware string ordering for list sorting.
//!
//! Uses the Unicode Collation Algorithm with CLDR root tailoring: accents
//! and case are secondary and tertiary differences, so "Adam" < "Émile" <
//! "eve" < "Zoe", and on a case-only tie lowercase sorts first.

use std::cmp::Ordering;

use feruca::Collator;

/// Reusable collator for a batch of comparisons.
pub struct LocaleCollator {
    inner: Collator,
}

impl LocaleCollator {
    pub fn new() -> Self {
        Self {
            inner: Collator::default(),
        }
    }

    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        self.inner.collate(a, b)
    }
}

impl Default for LocaleCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off comparison. Sorting should hold a [`LocaleCollator`] instead.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    LocaleCollator::new().compare(a, b)
}
