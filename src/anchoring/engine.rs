//! Selector anchoring
//!
//! Resolves stored selectors back to ranges in a document root. Quote
//! selectors are tried first because they survive edits; position selectors
//! are the fallback.

use serde::{Deserialize, Serialize};

use super::quote::resolve_quote;
use crate::document::{AnchorRoot, ResolvedRange};
use crate::selectors::{
    create_text_quote_selector, CombinedTextSelector, TextPositionSelector, TextQuoteSelector,
};

/// Error message reported when no selector resolves
pub const ANCHOR_FAILURE_MESSAGE: &str = "Could not anchor annotation to document";

/// Options for anchoring selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnchorOptions {
    /// Try the quote selector before the position selector
    pub prefer_quote: bool,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self { prefer_quote: true }
    }
}

/// Which selector produced the range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsedSelector {
    Quote,
    Position,
    None,
}

/// Outcome of anchoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorResult {
    pub range: Option<ResolvedRange>,
    /// Whether the resolved text equals the stored quote
    pub exact: bool,
    pub used_selector: UsedSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnchorResult {
    pub fn anchored(range: ResolvedRange, exact: bool, used_selector: UsedSelector) -> Self {
        Self {
            range: Some(range),
            exact,
            used_selector,
            error: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            range: None,
            exact: false,
            used_selector: UsedSelector::None,
            error: Some(ANCHOR_FAILURE_MESSAGE.to_string()),
        }
    }

    pub fn is_anchored(&self) -> bool {
        self.range.is_some()
    }
}

/// Selectors captured from a range of a root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnchors {
    pub quote: TextQuoteSelector,
    pub position: TextPositionSelector,
    pub text: String,
}

impl TextAnchors {
    pub fn into_combined(self) -> CombinedTextSelector {
        CombinedTextSelector::new(self.quote, self.position)
    }
}

/// Anchor a quote and/or position selector to `root`.
///
/// Never fails: when nothing resolves the result carries no range,
/// `used_selector = None` and [`ANCHOR_FAILURE_MESSAGE`].
pub fn anchor_selectors<R: AnchorRoot + ?Sized>(
    root: &R,
    quote: Option<&TextQuoteSelector>,
    position: Option<&TextPositionSelector>,
    options: AnchorOptions,
) -> AnchorResult {
    let index = root.text_index();
    let hint = position.map(|p| p.start);

    let by_quote = |quote: &TextQuoteSelector| {
        resolve_quote(index, quote, hint).map(|range| {
            let exact = range.text == quote.exact;
            AnchorResult::anchored(range, exact, UsedSelector::Quote)
        })
    };

    if options.prefer_quote {
        if let Some(result) = quote.and_then(by_quote) {
            tracing::debug!(start = ?result.range.as_ref().map(|r| r.start), "Anchored by quote");
            return result;
        }
    }

    if let Some(position) = position {
        if let Some(range) = index.range(position.start, position.end) {
            let exact = quote.map_or(true, |q| range.text == q.exact);
            tracing::debug!(
                start = position.start,
                end = position.end,
                exact,
                "Anchored by position"
            );
            return AnchorResult::anchored(range, exact, UsedSelector::Position);
        }
    }

    if !options.prefer_quote {
        if let Some(result) = quote.and_then(by_quote) {
            tracing::debug!("Anchored by quote after position failed");
            return result;
        }
    }

    tracing::debug!(
        has_quote = quote.is_some(),
        has_position = position.is_some(),
        text_len = index.len(),
        "Failed to anchor selectors"
    );
    AnchorResult::failed()
}

/// Whether the selectors still anchor exactly to `root`
pub fn validate_selectors<R: AnchorRoot + ?Sized>(
    root: &R,
    quote: Option<&TextQuoteSelector>,
    position: Option<&TextPositionSelector>,
) -> bool {
    let result = anchor_selectors(root, quote, position, AnchorOptions::default());
    result.is_anchored() && result.exact
}

/// Capture quote and position selectors for `[start, end)` of `root`.
///
/// Returns `None` for an empty, inverted or out of bounds range. Empty context
/// (a range at the very start or end) is left unset.
pub fn create_selectors_from_range<R: AnchorRoot + ?Sized>(
    root: &R,
    start: usize,
    end: usize,
    context_length: usize,
) -> Option<TextAnchors> {
    let index = root.text_index();
    let range = index.range(start, end)?;

    let prefix = index.before(start);
    let suffix = index.after(end);
    let quote = create_text_quote_selector(
        &range.text,
        (!prefix.is_empty()).then_some(prefix),
        (!suffix.is_empty()).then_some(suffix),
        context_length,
    );

    Some(TextAnchors {
        quote,
        position: TextPositionSelector { start, end },
        text: range.text,
    })
}
