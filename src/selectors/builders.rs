//! Selector construction and media fragment helpers

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::{
    FragmentSelector, Selector, SelectorValue, TextPositionSelector, TextQuoteSelector,
    MEDIA_FRAGMENTS_SPEC,
};

/// Default number of context characters kept on each side of a quote
pub const DEFAULT_CONTEXT_LENGTH: usize = 50;

static MEDIA_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^t=([0-9.]+),([0-9.]+)$").expect("valid media fragment regex"));

/// Errors raised while constructing selectors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Invalid text range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },
}

/// A parsed media time range, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTimeRange {
    pub start_time: f64,
    pub end_time: f64,
}

impl MediaTimeRange {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// A user-made media selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSelectionInfo {
    pub start_time: f64,
    pub end_time: f64,
    pub fragment_selector: FragmentSelector,
}

/// Create a TextQuoteSelector, trimming context to `context_length` characters.
///
/// The prefix keeps its last characters and the suffix its first ones, since
/// those are the characters adjacent to the quote.
pub fn create_text_quote_selector(
    exact: &str,
    prefix: Option<&str>,
    suffix: Option<&str>,
    context_length: usize,
) -> TextQuoteSelector {
    TextQuoteSelector {
        exact: exact.to_string(),
        prefix: prefix.map(|p| last_chars(p, context_length).to_string()),
        suffix: suffix.map(|s| first_chars(s, context_length).to_string()),
    }
}

/// Create a TextPositionSelector from character offsets
pub fn create_text_position_selector(
    start: usize,
    end: usize,
) -> Result<TextPositionSelector, SelectorError> {
    if start > end {
        return Err(SelectorError::InvalidRange { start, end });
    }
    Ok(TextPositionSelector { start, end })
}

/// Create a FragmentSelector for a media time range
///
/// Both bounds are always written, with three decimal places.
pub fn create_media_fragment_selector(start_time: f64, end_time: f64) -> FragmentSelector {
    FragmentSelector {
        conforms_to: MEDIA_FRAGMENTS_SPEC.to_string(),
        value: format!("t={:.3},{:.3}", start_time, end_time),
    }
}

/// Build the selection info for a media range
pub fn media_selection(start_time: f64, end_time: f64) -> MediaSelectionInfo {
    MediaSelectionInfo {
        start_time,
        end_time,
        fragment_selector: create_media_fragment_selector(start_time, end_time),
    }
}

/// Parse the time range of a media FragmentSelector.
///
/// Returns `None` when the value is not exactly `t=<num>,<num>`.
pub fn parse_media_fragment(selector: &FragmentSelector) -> Option<MediaTimeRange> {
    let captures = MEDIA_FRAGMENT_RE.captures(&selector.value)?;
    let start_time: f64 = captures.get(1)?.as_str().parse().ok()?;
    let end_time: f64 = captures.get(2)?.as_str().parse().ok()?;

    if !start_time.is_finite() || !end_time.is_finite() {
        return None;
    }

    Some(MediaTimeRange {
        start_time,
        end_time,
    })
}

/// Whether a FragmentSelector describes a media time range
pub fn is_media_fragment_selector(selector: &FragmentSelector) -> bool {
    selector.conforms_to == MEDIA_FRAGMENTS_SPEC && selector.value.starts_with("t=")
}

/// Duration of a media fragment in seconds
pub fn fragment_duration(selector: &FragmentSelector) -> Option<f64> {
    parse_media_fragment(selector).map(|range| range.duration())
}

/// Format a media fragment for display, e.g. `1:05 - 1:30`
pub fn format_fragment_time_range(selector: &FragmentSelector) -> Option<String> {
    let range = parse_media_fragment(selector)?;
    Some(format!(
        "{} - {}",
        format_timestamp(range.start_time),
        format_timestamp(range.end_time)
    ))
}

/// Format seconds as `M:SS`, or `H:MM:SS` from one hour on
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Widen a media fragment by `expand_seconds` on each side.
///
/// The start never drops below zero; the end is clamped to `max_duration`
/// when one is given. Unparseable selectors are returned unchanged.
pub fn expand_media_fragment(
    selector: &FragmentSelector,
    expand_seconds: f64,
    max_duration: Option<f64>,
) -> FragmentSelector {
    let Some(range) = parse_media_fragment(selector) else {
        return selector.clone();
    };

    let start = (range.start_time - expand_seconds).max(0.0);
    let end = match max_duration {
        Some(max) => max.min(range.end_time + expand_seconds),
        None => range.end_time + expand_seconds,
    };

    create_media_fragment_selector(start, end)
}

/// Pull the TextQuoteSelector out of a stored selector value
pub fn extract_text_quote_selector(value: &SelectorValue) -> Option<&TextQuoteSelector> {
    match value {
        SelectorValue::Combined(combined) => Some(&combined.text_quote),
        SelectorValue::Single(Selector::TextQuote(quote)) => Some(quote),
        SelectorValue::Single(_) => None,
    }
}

/// Pull the TextPositionSelector out of a stored selector value
pub fn extract_text_position_selector(value: &SelectorValue) -> Option<&TextPositionSelector> {
    match value {
        SelectorValue::Combined(combined) => Some(&combined.text_position),
        SelectorValue::Single(Selector::TextPosition(position)) => Some(position),
        SelectorValue::Single(_) => None,
    }
}

fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
