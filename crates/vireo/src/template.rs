//! Interpolation markers in text content.

use crate::options::Delimiters;

/// A piece of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through as-is.
    Literal(String),
    /// The raw expression between a pair of delimiters (untrimmed).
    Marker(String),
}

/// Text split into literal and marker segments.
///
/// Markers are matched left to right and non-greedily, so `{{a}} and {{b}}` holds two
/// markers. A marker needs at least one character between its delimiters; an opener
/// with no matching closer is literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Split `text` on `delimiters`.
    pub fn parse(text: &str, delimiters: &Delimiters) -> Self {
        let mut segments = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let Some((start, inner, end)) = find_marker(rest, delimiters) else {
                segments.push(Segment::Literal(rest.to_string()));
                break;
            };
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            segments.push(Segment::Marker(inner.to_string()));
            rest = &rest[end..];
        }
        Self { segments }
    }

    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if at least one marker was found.
    pub fn has_markers(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Marker(_)))
    }

    /// Marker expressions in order of appearance, duplicates included.
    pub fn expressions(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Marker(expression) => Some(expression.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render the whole text, replacing every marker with `resolve(expression)`.
    pub fn render(&self, mut resolve: impl FnMut(&str) -> String) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Marker(expression) => out.push_str(&resolve(expression)),
            }
        }
        out
    }
}

/// Locate the first marker: (opener offset, inner text, offset past the closer).
fn find_marker<'a>(text: &'a str, delimiters: &Delimiters) -> Option<(usize, &'a str, usize)> {
    let (open, close) = (delimiters.open.as_str(), delimiters.close.as_str());
    if open.is_empty() || close.is_empty() {
        return None;
    }
    let start = text.find(open)?;
    let after = &text[start + open.len()..];
    // The inner text is at least one character long.
    let first = after.chars().next()?.len_utf8();
    let inner_len = first + after[first..].find(close)?;
    let end = start + open.len() + inner_len + close.len();
    Some((start, &after[..inner_len], end))
}
