//! Logging handler configuration.

use std::fmt;
use std::sync::Arc;

use http::header::HeaderName;

use crate::headers::{RedactPredicate, never_redact};

/// Options shared by [`LoggingHandler`](crate::middleware::LoggingHandler)
/// and [`LoggingScopeHandler`](crate::middleware::LoggingScopeHandler).
///
/// Without a redaction predicate every header value is logged verbatim
/// (header dumps only appear at `TRACE`).
///
/// ```rust
/// use http::header::{ACCEPT, AUTHORIZATION};
/// use httplog::LoggingOptions;
///
/// let options = LoggingOptions::new().redact_headers(["Authorization", "Cookie"]);
/// let predicate = options.redact_predicate().unwrap();
/// assert!(predicate(&AUTHORIZATION));
/// assert!(!predicate(&ACCEPT));
/// ```
#[derive(Clone, Default)]
pub struct LoggingOptions {
    redact: Option<RedactPredicate>,
}

impl LoggingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides the values of every header for which `predicate` returns true.
    /// Replaces any predicate set before.
    ///
    /// `name == "Authorization"` matches regardless of case.
    pub fn redact_with(mut self, predicate: impl Fn(&HeaderName) -> bool + Send + Sync + 'static) -> Self {
        self.redact = Some(Arc::new(predicate));
        self
    }

    /// Hides the values of the named headers, compared case-insensitively.
    /// Replaces any predicate set before.
    pub fn redact_headers<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_owned()).collect();
        self.redact_with(move |header| names.iter().any(|n| header == n.as_str()))
    }

    pub fn redact_predicate(&self) -> Option<&RedactPredicate> {
        self.redact.as_ref()
    }

    /// The configured predicate, or one that never redacts.
    pub(crate) fn resolve_redaction(&self) -> RedactPredicate {
        match &self.redact {
            Some(predicate) => Arc::clone(predicate),
            None => Arc::new(never_redact),
        }
    }
}

impl fmt::Debug for LoggingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingOptions")
            .field("redact", &self.redact.as_ref().map(|_| ".."))
            .finish()
    }
}
