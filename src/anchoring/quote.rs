//! Quote search over flattened text
//!
//! Every occurrence of the exact text is a candidate. Candidates are ranked by
//! how much of the stored prefix/suffix context matches around them, then by
//! distance to an optional position hint, then by offset.

use crate::document::{ResolvedRange, TextIndex};
use crate::selectors::TextQuoteSelector;

/// A scored quote candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuoteMatch {
    pub start: usize,
    pub end: usize,
    /// Matched context characters (prefix + suffix)
    pub score: usize,
}

/// Find the best placement of `quote` in `index`
pub(crate) fn find_quote(
    index: &TextIndex,
    quote: &TextQuoteSelector,
    hint: Option<usize>,
) -> Option<QuoteMatch> {
    if quote.exact.is_empty() {
        return None;
    }
    let exact_len = quote.exact.chars().count();

    let mut best: Option<(QuoteMatch, usize)> = None;
    for start in index.occurrences(&quote.exact) {
        let end = start + exact_len;
        let score = quote
            .prefix
            .as_deref()
            .map_or(0, |prefix| common_suffix_len(prefix, index.before(start)))
            + quote
                .suffix
                .as_deref()
                .map_or(0, |suffix| common_prefix_len(suffix, index.after(end)));
        let distance = hint.map_or(0, |hint| hint.abs_diff(start));

        let better = match &best {
            None => true,
            Some((current, current_distance)) => {
                score > current.score || (score == current.score && distance < *current_distance)
            }
        };
        if better {
            best = Some((QuoteMatch { start, end, score }, distance));
        }
    }

    best.map(|(found, _)| found)
}

/// Resolve `quote` to a range
pub(crate) fn resolve_quote(
    index: &TextIndex,
    quote: &TextQuoteSelector,
    hint: Option<usize>,
) -> Option<ResolvedRange> {
    let found = find_quote(index, quote, hint)?;
    index.range(found.start, found.end)
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count()
}
