//! Highlight wrapping for resolved ranges
//!
//! A highlight wraps the text of a [`ResolvedRange`] in `<mark>` elements that
//! carry the annotation id for click dispatch. Three strategies are tried in
//! order:
//!
//! 1. Surround in place - the range sits inside a single text node.
//! 2. Extract and reinsert - both boundaries are sibling text nodes of one
//!    element; everything between them moves into a single marker.
//! 3. Segmented - the range crosses element boundaries; every intersected text
//!    node gets its own marker sharing the same highlight key.
//!
//! Removal unwraps every marker with the highlight's key and merges the text
//! nodes that the wrap split apart.

use serde::Serialize;

use super::text::{AnchorRoot, ResolvedRange};
use super::tree::{element_at_mut, DocumentRoot, Element, Node, TextNodeSpan};

/// CSS class applied to markers when none is given
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "annotation-highlight";
/// Attribute carrying the annotation id
pub const ANNOTATION_ID_ATTRIBUTE: &str = "data-annotation-id";
/// Attribute carrying the per-highlight key used for removal
pub const HIGHLIGHT_KEY_ATTRIBUTE: &str = "data-highlight-key";

const MARKER_TAG: &str = "mark";

/// How a highlight was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WrapStrategy {
    SurroundInPlace,
    ExtractAndReinsert,
    Segmented,
}

/// Errors during highlight wrapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    #[error("Cannot highlight range [{start}, {end}) in a document of {len} characters")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Text node at {0:?} is no longer part of the document")]
    DetachedNode(Vec<usize>),
}

/// Handle to an applied highlight
#[derive(Debug, Clone)]
pub struct Highlight {
    key: String,
    annotation_id: Option<String>,
    strategy: WrapStrategy,
    marker_count: usize,
}

impl Highlight {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn annotation_id(&self) -> Option<&str> {
        self.annotation_id.as_deref()
    }

    pub fn strategy(&self) -> WrapStrategy {
        self.strategy
    }

    /// Number of marker elements inserted
    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    /// Unwrap this highlight's markers and merge the split text back together.
    ///
    /// Safe to call any number of times: returns `true` only when markers were
    /// actually removed.
    pub fn remove(&self, doc: &mut DocumentRoot) -> bool {
        unwrap_markers(doc.root_mut(), &self.key) > 0
    }
}

/// Wrap `range` in marker elements
pub fn highlight_range(
    doc: &mut DocumentRoot,
    range: &ResolvedRange,
    class_name: &str,
    annotation_id: Option<&str>,
) -> Result<Highlight, HighlightError> {
    let len = doc.text_index().len();
    if range.start >= range.end || range.end > len {
        return Err(HighlightError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }

    let spans: Vec<TextNodeSpan> = doc
        .text_nodes()
        .into_iter()
        .filter(|span| span.start < range.end && span.end() > range.start)
        .collect();

    let (Some(first), Some(last)) = (spans.first(), spans.last()) else {
        return Err(HighlightError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    };

    let key = doc.next_highlight_key();
    let marker = new_marker(class_name, annotation_id, &key);

    let (strategy, marker_count) = if spans.len() == 1 {
        surround_in_place(
            doc.root_mut(),
            first,
            range.start - first.start,
            range.end - first.start,
            marker,
        )?;
        (WrapStrategy::SurroundInPlace, 1)
    } else if first.parent().0 == last.parent().0 {
        extract_and_reinsert(
            doc.root_mut(),
            first,
            last,
            range.start - first.start,
            range.end - last.start,
            marker,
        )?;
        (WrapStrategy::ExtractAndReinsert, 1)
    } else {
        // Later nodes first so that splitting never shifts a pending path
        for span in spans.iter().rev() {
            let from = range.start.max(span.start) - span.start;
            let to = range.end.min(span.end()) - span.start;
            surround_in_place(doc.root_mut(), span, from, to, marker.clone())?;
        }
        (WrapStrategy::Segmented, spans.len())
    };

    tracing::debug!(
        key = %key,
        start = range.start,
        end = range.end,
        ?strategy,
        "Applied highlight"
    );

    Ok(Highlight {
        key,
        annotation_id: annotation_id.map(str::to_string),
        strategy,
        marker_count,
    })
}

fn new_marker(class_name: &str, annotation_id: Option<&str>, key: &str) -> Element {
    let mut marker = Element::new(MARKER_TAG).with_attribute("class", class_name);
    if let Some(id) = annotation_id {
        marker.set_attribute(ANNOTATION_ID_ATTRIBUTE, id);
    }
    marker.with_attribute(HIGHLIGHT_KEY_ATTRIBUTE, key)
}

/// Wrap chars `[from, to)` of one text node in `marker`
fn surround_in_place(
    root: &mut Element,
    span: &TextNodeSpan,
    from: usize,
    to: usize,
    mut marker: Element,
) -> Result<(), HighlightError> {
    let (parent_path, idx) = span.parent();
    let parent = element_at_mut(root, parent_path)
        .ok_or_else(|| HighlightError::DetachedNode(span.path.clone()))?;
    let Some(Node::Text(text)) = parent.children.get(idx) else {
        return Err(HighlightError::DetachedNode(span.path.clone()));
    };

    let (head, rest) = split_chars(text, from);
    let (selected, tail) = split_chars(&rest, to - from);

    marker.children = vec![Node::Text(selected)];
    let mut replacement = Vec::with_capacity(3);
    if !head.is_empty() {
        replacement.push(Node::Text(head));
    }
    replacement.push(Node::Element(marker));
    if !tail.is_empty() {
        replacement.push(Node::Text(tail));
    }

    parent.children.splice(idx..=idx, replacement);
    Ok(())
}

/// Move everything from char `from` of `first` to char `to` of `last` (two
/// sibling text nodes) into `marker`
fn extract_and_reinsert(
    root: &mut Element,
    first: &TextNodeSpan,
    last: &TextNodeSpan,
    from: usize,
    to: usize,
    mut marker: Element,
) -> Result<(), HighlightError> {
    let (parent_path, first_idx) = first.parent();
    let (_, last_idx) = last.parent();
    let parent = element_at_mut(root, parent_path)
        .ok_or_else(|| HighlightError::DetachedNode(first.path.clone()))?;

    if last_idx <= first_idx {
        return Err(HighlightError::DetachedNode(last.path.clone()));
    }
    let (Some(Node::Text(first_text)), Some(Node::Text(last_text))) =
        (parent.children.get(first_idx), parent.children.get(last_idx))
    else {
        return Err(HighlightError::DetachedNode(first.path.clone()));
    };

    let (keep_head, moved_head) = split_chars(first_text, from);
    let (moved_tail, keep_tail) = split_chars(last_text, to);

    let mut extracted: Vec<Node> = parent.children.drain(first_idx..=last_idx).collect();

    let inner_len = extracted.len() - 1;
    let between: Vec<Node> = extracted.drain(1..inner_len).collect();

    marker.children.push(Node::Text(moved_head));
    marker.children.extend(between);
    if !moved_tail.is_empty() {
        marker.children.push(Node::Text(moved_tail));
    }

    let mut replacement = Vec::with_capacity(3);
    if !keep_head.is_empty() {
        replacement.push(Node::Text(keep_head));
    }
    replacement.push(Node::Element(marker));
    if !keep_tail.is_empty() {
        replacement.push(Node::Text(keep_tail));
    }

    parent.children.splice(first_idx..first_idx, replacement);
    Ok(())
}

fn is_marker(node: &Node, key: &str) -> bool {
    matches!(node, Node::Element(el) if el.attribute(HIGHLIGHT_KEY_ATTRIBUTE) == Some(key))
}

/// Unwrap markers with `key` below `el`; returns how many were removed
fn unwrap_markers(el: &mut Element, key: &str) -> usize {
    let mut removed = 0;
    for child in el.children.iter_mut() {
        if let Node::Element(child_el) = child {
            removed += unwrap_markers(child_el, key);
        }
    }

    if el.children.iter().any(|child| is_marker(child, key)) {
        let children = std::mem::take(&mut el.children);
        for child in children {
            match child {
                Node::Element(marker) if marker.attribute(HIGHLIGHT_KEY_ATTRIBUTE) == Some(key) => {
                    removed += 1;
                    el.children.extend(marker.children);
                }
                other => el.children.push(other),
            }
        }
        normalize_children(el);
    }

    removed
}

/// Merge adjacent text children and drop empty ones
fn normalize_children(el: &mut Element) {
    let children = std::mem::take(&mut el.children);
    for child in children {
        match child {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => match el.children.last_mut() {
                Some(Node::Text(previous)) => previous.push_str(&text),
                _ => el.children.push(Node::Text(text)),
            },
            other => el.children.push(other),
        }
    }
}

fn split_chars(text: &str, at: usize) -> (String, String) {
    let idx = text
        .char_indices()
        .nth(at)
        .map_or(text.len(), |(idx, _)| idx);
    (text[..idx].to_string(), text[idx..].to_string())
}
