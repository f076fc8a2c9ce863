//! Highlight injection for rendered documents
//!
//! Anchors each annotation's selectors against a document and wraps the
//! resolved ranges in marker elements, producing HTML ready for display.

use serde::{Deserialize, Serialize};

use crate::anchoring::{anchor_selectors, AnchorCache, AnchorOptions, AnchorResult, UsedSelector};
use crate::document::{
    highlight_range, DocumentRoot, Highlight, HighlightError, DEFAULT_HIGHLIGHT_CLASS,
};
use crate::selectors::{TextPositionSelector, TextQuoteSelector};

/// Configuration for highlight injection
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// CSS class applied to every marker
    pub class_name: String,
    /// Options passed to the anchoring engine
    pub anchor_options: AnchorOptions,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_HIGHLIGHT_CLASS.to_string(),
            anchor_options: AnchorOptions::default(),
        }
    }
}

/// One annotation to highlight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRequest {
    pub annotation_id: String,
    #[serde(default)]
    pub quote: Option<TextQuoteSelector>,
    #[serde(default)]
    pub position: Option<TextPositionSelector>,
}

/// Result of highlight injection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionResult {
    /// The document HTML with markers applied
    pub html: String,
    /// Annotations that were highlighted
    pub injected: Vec<String>,
    /// Annotations that could not be anchored
    pub orphaned: Vec<String>,
    /// Highlighted annotations whose text no longer matches the stored quote
    pub inexact: Vec<String>,
    #[serde(skip)]
    pub highlights: Vec<Highlight>,
}

impl InjectionResult {
    pub fn injected_count(&self) -> usize {
        self.injected.len()
    }
}

/// Anchor and highlight every request in `doc`
pub fn inject_highlights(
    doc: &mut DocumentRoot,
    requests: &[HighlightRequest],
    config: &HighlightConfig,
) -> Result<InjectionResult, HighlightError> {
    inject_with(doc, requests, config, |doc, request| {
        anchor_selectors(
            doc,
            request.quote.as_ref(),
            request.position.as_ref(),
            config.anchor_options,
        )
    })
}

/// Same as [`inject_highlights`], anchoring through `cache`
pub fn inject_highlights_cached(
    doc: &mut DocumentRoot,
    requests: &[HighlightRequest],
    config: &HighlightConfig,
    cache: &AnchorCache,
) -> Result<InjectionResult, HighlightError> {
    inject_with(doc, requests, config, |doc, request| {
        cache.anchor(
            doc,
            request.quote.as_ref(),
            request.position.as_ref(),
            config.anchor_options,
        )
    })
}

fn inject_with<F>(
    doc: &mut DocumentRoot,
    requests: &[HighlightRequest],
    config: &HighlightConfig,
    anchor: F,
) -> Result<InjectionResult, HighlightError>
where
    F: Fn(&DocumentRoot, &HighlightRequest) -> AnchorResult,
{
    let mut result = InjectionResult {
        html: String::new(),
        injected: Vec::new(),
        orphaned: Vec::new(),
        inexact: Vec::new(),
        highlights: Vec::new(),
    };

    for request in requests {
        let anchored = anchor(&*doc, request);
        let Some(range) = anchored.range else {
            tracing::warn!(
                annotation_id = %request.annotation_id,
                "Annotation could not be anchored, leaving it orphaned"
            );
            result.orphaned.push(request.annotation_id.clone());
            continue;
        };

        let highlight = highlight_range(
            doc,
            &range,
            &config.class_name,
            Some(&request.annotation_id),
        )?;

        if !anchored.exact {
            tracing::debug!(
                annotation_id = %request.annotation_id,
                used = ?anchored.used_selector,
                "Highlighted annotation with drifted text"
            );
            result.inexact.push(request.annotation_id.clone());
        } else if anchored.used_selector == UsedSelector::Position {
            tracing::debug!(annotation_id = %request.annotation_id, "Highlighted by position");
        }

        result.injected.push(request.annotation_id.clone());
        result.highlights.push(highlight);
    }

    result.html = doc.to_html();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    fn quote(exact: &str, prefix: Option<&str>) -> Option<TextQuoteSelector> {
        Some(TextQuoteSelector {
            exact: exact.to_string(),
            prefix: prefix.map(str::to_string),
            suffix: None,
        })
    }

    #[test]
    fn test_inject_single_highlight() {
        let mut doc = DocumentRoot::new(Element::new("p").with_text("Hello world, this is a test."));
        let request = HighlightRequest {
            annotation_id: "ann-1".to_string(),
            quote: quote("world", Some("Hello ")),
            position: None,
        };

        let result = inject_highlights(&mut doc, &[request], &HighlightConfig::default()).unwrap();

        assert_eq!(result.injected_count(), 1);
        assert_eq!(
            result.html,
            "<p>Hello <mark class=\"annotation-highlight\" data-annotation-id=\"ann-1\" \
             data-highlight-key=\"hl-1\">world</mark>, this is a test.</p>"
        );
    }

    #[test]
    fn test_inject_no_annotations() {
        let mut doc = DocumentRoot::new(Element::new("p").with_text("Hello world"));
        let result = inject_highlights(&mut doc, &[], &HighlightConfig::default()).unwrap();

        assert_eq!(result.injected_count(), 0);
        assert_eq!(result.html, "<p>Hello world</p>");
    }

    #[test]
    fn test_orphans_and_drift_reported() {
        let mut doc = DocumentRoot::from_text("The quick brown fox");
        let requests = vec![
            HighlightRequest {
                annotation_id: "gone".to_string(),
                quote: quote("lazy dog", None),
                position: None,
            },
            HighlightRequest {
                annotation_id: "drifted".to_string(),
                quote: quote("slow", None),
                position: Some(TextPositionSelector { start: 4, end: 9 }),
            },
        ];

        let result = inject_highlights(&mut doc, &requests, &HighlightConfig::default()).unwrap();

        assert_eq!(result.orphaned, vec!["gone".to_string()]);
        assert_eq!(result.injected, vec!["drifted".to_string()]);
        assert_eq!(result.inexact, vec!["drifted".to_string()]);
    }

    #[test]
    fn test_overlapping_highlights_and_cleanup() {
        let mut doc = DocumentRoot::from_text("alpha beta gamma");
        let original = doc.root().clone();
        let requests = vec![
            HighlightRequest {
                annotation_id: "a".to_string(),
                quote: quote("alpha beta", None),
                position: None,
            },
            HighlightRequest {
                annotation_id: "b".to_string(),
                quote: quote("beta gamma", None),
                position: None,
            },
        ];

        let cache = AnchorCache::new(16);
        let result =
            inject_highlights_cached(&mut doc, &requests, &HighlightConfig::default(), &cache)
                .unwrap();
        assert_eq!(result.injected_count(), 2);
        assert_eq!(cache.stats().misses, 2);

        for highlight in result.highlights.iter().rev() {
            assert!(highlight.remove(&mut doc));
        }
        assert_eq!(doc.root(), &original);
    }
}
