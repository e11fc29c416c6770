//! Placeholder parsing.
//!
//! Template text carries placeholders in two surface forms:
//!
//! * short: `$name__upper__snake$`
//! * long: `$name;format="upper,snake"$`
//!
//! Both are parsed into the same [`PlaceholderExpression`]. A backslash right before a `$`
//! produces a literal `$` that never starts a placeholder. Everything else is kept as literal
//! bytes, so text without placeholders comes back unchanged.

use std::fmt;

use crate::error::{Error, Result};

const DELIMITER: u8 = b'$';
const ESCAPE: u8 = b'\\';
const LONG_MARKER: &[u8] = b";format=";
const SHORT_SEPARATOR: &str = "__";

/// One placeholder occurrence: a field piped through filters, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderExpression {
    pub field: String,
    pub filters: Vec<String>,
}

impl PlaceholderExpression {
    pub fn new<S: Into<String>>(field: S, filters: Vec<String>) -> Self {
        Self { field: field.into(), filters }
    }
}

/// Canonical directive form, e.g. `{{ name | normalize | lower }}`.
impl fmt::Display for PlaceholderExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{ {}", self.field)?;
        for filter in &self.filters {
            write!(f, " | {filter}")?;
        }
        write!(f, " }}}}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(Vec<u8>),
    Placeholder(PlaceholderExpression),
}

/// Template text after transcoding: literal runs and placeholders in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTemplate {
    segments: Vec<Segment>,
}

impl CanonicalTemplate {
    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Iterates over the placeholders only.
    pub fn placeholders(&self) -> impl Iterator<Item = &PlaceholderExpression> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(expr) => Some(expr),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Flattens back to bytes, placeholders written in canonical directive form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => bytes.extend_from_slice(literal),
                Segment::Placeholder(expr) => bytes.extend_from_slice(expr.to_string().as_bytes()),
            }
        }
        bytes
    }
}

impl fmt::Display for CanonicalTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes))?,
                Segment::Placeholder(expr) => write!(f, "{expr}")?,
            }
        }
        Ok(())
    }
}

/// Parses raw template text into its canonical form.
///
/// # Errors
/// * `Error::Syntax` when a `$field;format=` span is not completed by a quoted,
///   non-empty filter list and a closing `$`, or when its field name is empty
pub fn transcode(text: &[u8]) -> Result<CanonicalTemplate> {
    let mut segments = Vec::new();
    let mut literal = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        match text[pos] {
            ESCAPE if text.get(pos + 1) == Some(&DELIMITER) => {
                literal.push(DELIMITER);
                pos += 2;
            }
            DELIMITER => match parse_placeholder(text, pos)? {
                Some((expr, end)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(expr));
                    pos = end;
                }
                None => {
                    literal.push(DELIMITER);
                    pos += 1;
                }
            },
            byte => {
                literal.push(byte);
                pos += 1;
            }
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(CanonicalTemplate { segments })
}

/// Tries to read a placeholder starting at the `$` found at `start`.
/// Returns the expression and the index just past its closing `$`.
fn parse_placeholder(text: &[u8], start: usize) -> Result<Option<(PlaceholderExpression, usize)>> {
    let body_start = start + 1;
    let ident_len = text[body_start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    let ident_end = body_start + ident_len;
    // Identifier bytes are ASCII, so this cannot fail.
    let ident = String::from_utf8_lossy(&text[body_start..ident_end]).into_owned();

    if text[ident_end..].starts_with(LONG_MARKER) {
        return parse_long(text, start, ident, ident_end + LONG_MARKER.len()).map(Some);
    }
    if text.get(ident_end) == Some(&DELIMITER) {
        return Ok(parse_short(&ident).map(|expr| (expr, ident_end + 1)));
    }
    Ok(None)
}

/// `name__filter1__filter2`. Anything that does not fit is not a placeholder.
fn parse_short(body: &str) -> Option<PlaceholderExpression> {
    let mut parts = body.split(SHORT_SEPARATOR);
    let field = parts.next()?;
    if field.is_empty() || field.starts_with('_') || field.ends_with('_') {
        return None;
    }

    let filters: Vec<String> = parts.map(str::to_string).collect();
    let valid_filters = filters
        .iter()
        .all(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_alphanumeric()));
    if !valid_filters {
        return None;
    }

    Some(PlaceholderExpression::new(field, filters))
}

/// `name;format="filter1,filter2"`; `pos` points just past `format=`.
fn parse_long(
    text: &[u8],
    start: usize,
    field: String,
    pos: usize,
) -> Result<(PlaceholderExpression, usize)> {
    let syntax = |message: &str| Error::Syntax { message: message.to_string(), offset: start };

    if field.is_empty() {
        return Err(syntax("placeholder has an empty field name"));
    }
    if text.get(pos) != Some(&b'"') {
        return Err(syntax("expected '\"' after 'format='"));
    }
    let list_start = pos + 1;
    let list_len = text[list_start..]
        .iter()
        .position(|b| *b == b'"')
        .ok_or_else(|| syntax("unbalanced quote in format list"))?;
    let list_end = list_start + list_len;
    if text.get(list_end + 1) != Some(&DELIMITER) {
        return Err(syntax("expected closing '$' after format list"));
    }

    let list = std::str::from_utf8(&text[list_start..list_end])
        .map_err(|_| syntax("format list is not valid UTF-8"))?;
    let filters: Vec<String> = list.split(',').map(|f| f.trim().to_string()).collect();
    if filters.iter().any(String::is_empty) {
        return Err(syntax("empty filter name in format list"));
    }

    Ok((PlaceholderExpression::new(field, filters), list_end + 2))
}
