//! Incoming movie query: sanitization and coercion of the raw request params.

use lazy_static::lazy_static;
use regex::Regex;

use crate::movies::LookupError;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// A sanitized movie lookup query.
///
/// `title` is guaranteed non-empty. `year` is 0 when the caller did not
/// supply one (or supplied something non-numeric).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub title: String,
    pub year: u32,
}

impl MovieQuery {
    /// Build a query from the raw request parameters.
    ///
    /// Both params go through [`sanitize`]. A missing or empty title is a
    /// caller error, surfaced before any upstream call is made.
    pub fn from_params(title: Option<&str>, year: Option<&str>) -> Result<Self, LookupError> {
        let title = sanitize(title.unwrap_or(""));
        if title.is_empty() {
            return Err(LookupError::InvalidRequest);
        }

        let year = sanitize(year.unwrap_or(""))
            .parse::<u32>()
            .unwrap_or(0);

        Ok(Self { title, year })
    }
}

/// Trim, strip HTML tags, then escape HTML-special characters.
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = HTML_TAG.replace_all(trimmed, "");
    escape_html(&stripped)
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
