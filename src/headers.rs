//! Lazily rendered header dumps with per-header redaction.

use std::fmt;
use std::sync::Arc;

use http::header::{HeaderMap, HeaderName};

/// Replaces every value of a redacted header.
pub const REDACTED: &str = "*";

/// Decides, by header name, whether a header's values must be hidden.
///
/// Compare against the `http::header` constants or a plain string:
/// `HeaderName == &str` ignores ASCII case, so `name == "Authorization"`
/// matches the lower-cased names [`HeaderMap`] stores.
pub type RedactPredicate = Arc<dyn Fn(&HeaderName) -> bool + Send + Sync>;

/// Which side of the exchange a dump describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Request,
    Response,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Self::Request => "Request Headers:",
            Self::Response => "Response Headers:",
        }
    }
}

/// A header dump that renders only when formatted.
///
/// Building one costs a few pointer copies. The redaction predicate runs
/// and the text is produced inside [`fmt::Display::fmt`], which only a sink
/// that actually records the event calls.
pub struct HeadersLogValue<'a> {
    kind: Kind,
    headers: &'a HeaderMap,
    content: Option<&'a HeaderMap>,
    redact: &'a (dyn Fn(&HeaderName) -> bool + Send + Sync),
}

impl<'a> HeadersLogValue<'a> {
    pub fn new(
        kind: Kind,
        headers: &'a HeaderMap,
        content: Option<&'a HeaderMap>,
        redact: &'a (dyn Fn(&HeaderName) -> bool + Send + Sync),
    ) -> Self {
        Self { kind, headers, content, redact }
    }

    pub fn kind(&self) -> Kind { self.kind }

    fn write_section(&self, f: &mut fmt::Formatter<'_>, headers: &HeaderMap) -> fmt::Result {
        for name in headers.keys() {
            write!(f, "{name}: ")?;
            let hidden = (self.redact)(name);
            for (i, value) in headers.get_all(name).iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                if hidden {
                    f.write_str(REDACTED)?;
                } else {
                    f.write_str(&String::from_utf8_lossy(value.as_bytes()))?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl fmt::Display for HeadersLogValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind.label())?;
        self.write_section(f, self.headers)?;
        if let Some(content) = self.content {
            f.write_str("Content Headers:\n")?;
            self.write_section(f, content)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HeadersLogValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadersLogValue")
            .field("kind", &self.kind)
            .field("headers", &self.headers.len())
            .field("content", &self.content.map(HeaderMap::len))
            .finish()
    }
}

/// The predicate used when none is configured.
pub(crate) fn never_redact(_: &HeaderName) -> bool {
    false
}
