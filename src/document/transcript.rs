//! Transcript layout
//!
//! Cues are rendered into a `div.transcript`, one `div.cue` per cue, with a
//! newline text node between consecutive cues. The flattened text is therefore
//! the cue texts joined with `"\n"`, which is what stored text selectors are
//! measured against.

use serde::{Deserialize, Serialize};

use super::text::{AnchorRoot, TextIndex};
use super::tree::{DocumentRoot, Element};
use crate::anchoring::create_selectors_from_range;
use crate::selectors::{CombinedTextSelector, TextPositionSelector, TextQuoteSelector};

/// Text inserted between consecutive cues
pub const CUE_SEPARATOR: &str = "\n";

/// A timed transcript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptCue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

/// A user's text selection in a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelectionInfo {
    pub text: String,
    pub text_quote_selector: TextQuoteSelector,
    pub text_position_selector: TextPositionSelector,
    pub selected_cue_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl TextSelectionInfo {
    /// The stored selector value for this selection
    pub fn combined_selector(&self) -> CombinedTextSelector {
        CombinedTextSelector::new(
            self.text_quote_selector.clone(),
            self.text_position_selector,
        )
    }
}

/// Char span of a cue in the flattened text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueSpan {
    pub start: usize,
    pub end: usize,
}

/// Cues laid out as a highlightable document
#[derive(Debug, Clone)]
pub struct TranscriptDocument {
    cues: Vec<TranscriptCue>,
    spans: Vec<CueSpan>,
    document: DocumentRoot,
}

impl TranscriptDocument {
    pub fn new(cues: Vec<TranscriptCue>) -> Self {
        let separator_len = CUE_SEPARATOR.chars().count();
        let mut root = Element::new("div").with_attribute("class", "transcript");
        let mut spans = Vec::with_capacity(cues.len());
        let mut offset = 0;

        for (idx, cue) in cues.iter().enumerate() {
            if idx > 0 {
                root = root.with_text(CUE_SEPARATOR);
                offset += separator_len;
            }

            let mut el = Element::new("div")
                .with_attribute("class", "cue")
                .with_attribute("data-cue-index", idx.to_string())
                .with_attribute("data-start", cue.start_time.to_string())
                .with_attribute("data-end", cue.end_time.to_string());
            if let Some(speaker) = &cue.speaker {
                el.set_attribute("data-speaker", speaker);
            }
            root = root.with_child(el.with_text(&cue.text));

            let len = cue.text.chars().count();
            spans.push(CueSpan {
                start: offset,
                end: offset + len,
            });
            offset += len;
        }

        Self {
            cues,
            spans,
            document: DocumentRoot::new(root),
        }
    }

    pub fn cues(&self) -> &[TranscriptCue] {
        &self.cues
    }

    pub fn document(&self) -> &DocumentRoot {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut DocumentRoot {
        &mut self.document
    }

    pub fn into_document(self) -> DocumentRoot {
        self.document
    }

    pub fn cue_span(&self, index: usize) -> Option<CueSpan> {
        self.spans.get(index).copied()
    }

    /// Indices of cues whose text intersects `[start, end)`
    pub fn cues_in_range(&self, start: usize, end: usize) -> Vec<usize> {
        self.spans
            .iter()
            .enumerate()
            .filter(|(_, span)| span.start < end && span.end > start)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// First cue playing at `time` (both bounds inclusive)
    pub fn active_cue(&self, time: f64) -> Option<usize> {
        self.cues
            .iter()
            .position(|cue| time >= cue.start_time && time <= cue.end_time)
    }

    /// Describe a selection of `[start, end)`: selectors, touched cues and the
    /// time span they cover.
    pub fn selection_info(
        &self,
        start: usize,
        end: usize,
        context_length: usize,
    ) -> Option<TextSelectionInfo> {
        let anchors = create_selectors_from_range(&self.document, start, end, context_length)?;
        let selected = self.cues_in_range(start, end);

        let start_time = selected.first().map(|&idx| self.cues[idx].start_time);
        let end_time = selected.last().map(|&idx| self.cues[idx].end_time);

        Some(TextSelectionInfo {
            text: anchors.text,
            text_quote_selector: anchors.quote,
            text_position_selector: anchors.position,
            selected_cue_indices: selected,
            start_time,
            end_time,
        })
    }
}

impl AnchorRoot for TranscriptDocument {
    fn text_index(&self) -> &TextIndex {
        self.document.text_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: f64, end: f64, text: &str) -> TranscriptCue {
        TranscriptCue {
            id: None,
            start_time: start,
            end_time: end,
            text: text.to_string(),
            speaker: None,
        }
    }

    fn sample() -> TranscriptDocument {
        TranscriptDocument::new(vec![
            cue(0.0, 2.5, "Welcome to the study."),
            cue(2.5, 6.0, "Tell me about your day."),
            cue(6.0, 9.0, "It was long."),
        ])
    }

    #[test]
    fn test_flattened_text_joins_cues() {
        let transcript = sample();
        assert_eq!(
            transcript.text_index().as_str(),
            "Welcome to the study.\nTell me about your day.\nIt was long."
        );
        assert_eq!(transcript.cue_span(1), Some(CueSpan { start: 22, end: 45 }));
    }

    #[test]
    fn test_selection_within_one_cue() {
        let transcript = sample();
        let info = transcript.selection_info(30, 35, 50).unwrap();
        assert_eq!(info.text, "about");
        assert_eq!(info.selected_cue_indices, vec![1]);
        assert_eq!(info.start_time, Some(2.5));
        assert_eq!(info.end_time, Some(6.0));
        assert_eq!(info.text_position_selector, TextPositionSelector { start: 30, end: 35 });
    }

    #[test]
    fn test_selection_across_cues() {
        let transcript = sample();
        let info = transcript.selection_info(15, 26, 50).unwrap();
        assert_eq!(info.text, "study.\nTell");
        assert_eq!(info.selected_cue_indices, vec![0, 1]);
        assert_eq!(info.start_time, Some(0.0));
        assert_eq!(info.end_time, Some(6.0));
    }

    #[test]
    fn test_separator_only_selection_has_no_cues() {
        let transcript = sample();
        let info = transcript.selection_info(21, 22, 50).unwrap();
        assert_eq!(info.text, "\n");
        assert!(info.selected_cue_indices.is_empty());
        assert!(info.start_time.is_none());
    }

    #[test]
    fn test_active_cue() {
        let transcript = sample();
        assert_eq!(transcript.active_cue(1.0), Some(0));
        assert_eq!(transcript.active_cue(2.5), Some(0));
        assert_eq!(transcript.active_cue(7.0), Some(2));
        assert_eq!(transcript.active_cue(12.0), None);
    }

    #[test]
    fn test_cue_markup() {
        let mut cues = vec![cue(0.0, 1.0, "Hi & bye")];
        cues[0].speaker = Some("P1".to_string());
        let html = TranscriptDocument::new(cues).document().to_html();
        assert_eq!(
            html,
            "<div class=\"transcript\"><div class=\"cue\" data-cue-index=\"0\" data-start=\"0\" \
             data-end=\"1\" data-speaker=\"P1\">Hi &amp; bye</div></div>"
        );
    }

    #[test]
    fn test_cue_wire_format() {
        let parsed: TranscriptCue =
            serde_json::from_str(r#"{"startTime": 1.5, "endTime": 3.0, "text": "hello"}"#).unwrap();
        assert_eq!(parsed, cue(1.5, 3.0, "hello"));
    }
}
