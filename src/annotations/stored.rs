//! Stored annotation shapes
//!
//! The flat records persisted by the annotation store. Selector payloads are
//! kept as raw JSON next to their declared type and decoded on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::serialization::SerializationError;
use crate::document::TextSelectionInfo;
use crate::motivation::Motivation;
use crate::selectors::{
    extract_text_position_selector, extract_text_quote_selector, CombinedTextSelector,
    CssSelector, FragmentSelector, MediaSelectionInfo, RangeSelector, Selector, SelectorType,
    SelectorValue, TextPositionSelector, TextQuoteSelector, XPathSelector,
};

/// One target of a stored annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnnotationTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub file_ref_id: String,
    pub selector_type: SelectorType,
    pub selector_value: Value,
    #[serde(default)]
    pub exact_text: Option<String>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
}

impl StoredAnnotationTarget {
    /// Target for a transcript text selection, stored in the combined format
    pub fn from_text_selection(file_ref_id: impl Into<String>, selection: &TextSelectionInfo) -> Self {
        let combined = selection.combined_selector();
        Self {
            id: None,
            file_ref_id: file_ref_id.into(),
            selector_type: SelectorType::TextQuoteSelector,
            selector_value: serde_json::to_value(&combined).unwrap_or(Value::Null),
            exact_text: Some(selection.text.clone()),
            start_time: selection.start_time,
            end_time: selection.end_time,
        }
    }

    /// Target for a media time range selection
    pub fn from_media_selection(file_ref_id: impl Into<String>, selection: &MediaSelectionInfo) -> Self {
        let selector = Selector::Fragment(selection.fragment_selector.clone());
        Self {
            id: None,
            file_ref_id: file_ref_id.into(),
            selector_type: SelectorType::FragmentSelector,
            selector_value: serde_json::to_value(&selector).unwrap_or(Value::Null),
            exact_text: None,
            start_time: Some(selection.start_time),
            end_time: Some(selection.end_time),
        }
    }

    /// Decode the stored payload according to its declared type.
    ///
    /// A `TextQuoteSelector` payload may be the combined quote + position
    /// format. Any `type` key inside the payload is ignored; the declared type
    /// wins.
    pub fn selector_value(&self) -> Result<SelectorValue, SerializationError> {
        let value = &self.selector_value;
        let selector = match self.selector_type {
            SelectorType::TextQuoteSelector => {
                if is_combined(value) {
                    return self
                        .decode::<CombinedTextSelector>()
                        .map(SelectorValue::Combined);
                }
                Selector::TextQuote(self.decode::<TextQuoteSelector>()?)
            }
            SelectorType::TextPositionSelector => {
                Selector::TextPosition(self.decode::<TextPositionSelector>()?)
            }
            SelectorType::FragmentSelector => Selector::Fragment(self.decode::<FragmentSelector>()?),
            SelectorType::CssSelector => Selector::Css(self.decode::<CssSelector>()?),
            SelectorType::XPathSelector => Selector::XPath(self.decode::<XPathSelector>()?),
            SelectorType::RangeSelector => Selector::Range(self.decode::<RangeSelector>()?),
        };
        Ok(SelectorValue::Single(selector))
    }

    /// The quote selector, if the payload holds one
    pub fn text_quote(&self) -> Option<TextQuoteSelector> {
        let value = self.selector_value().ok()?;
        extract_text_quote_selector(&value).cloned()
    }

    /// The position selector, if the payload holds one
    pub fn text_position(&self) -> Option<TextPositionSelector> {
        let value = self.selector_value().ok()?;
        extract_text_position_selector(&value).copied()
    }

    fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, SerializationError> {
        T::deserialize(&self.selector_value).map_err(|e| SerializationError::InvalidSelectorValue {
            selector_type: self.selector_type,
            reason: e.to_string(),
        })
    }
}

fn is_combined(value: &Value) -> bool {
    value.get("textQuote").is_some() && value.get("textPosition").is_some()
}

/// An annotation as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnnotation {
    pub id: String,
    #[serde(default)]
    pub motivation: Vec<Motivation>,
    #[serde(default)]
    pub body_text: Option<String>,
    pub targets: Vec<StoredAnnotationTarget>,
    #[serde(default)]
    pub creator_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub participant_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

impl StoredAnnotation {
    /// A new annotation with a fresh id, stamped now
    pub fn new(motivation: Vec<Motivation>, targets: Vec<StoredAnnotationTarget>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            motivation,
            body_text: None,
            targets,
            creator_id: None,
            created_at: now,
            modified_at: now,
            study_id: None,
            participant_id: None,
            session_id: None,
            tag_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::{create_text_quote_selector, media_selection};
    use serde_json::json;

    fn target(selector_type: SelectorType, selector_value: Value) -> StoredAnnotationTarget {
        StoredAnnotationTarget {
            id: Some("t-1".to_string()),
            file_ref_id: "file-1".to_string(),
            selector_type,
            selector_value,
            exact_text: None,
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn test_combined_value_decodes() {
        let stored = target(
            SelectorType::TextQuoteSelector,
            json!({
                "textQuote": {"exact": "hello", "suffix": " world"},
                "textPosition": {"start": 0, "end": 5}
            }),
        );

        assert!(stored.selector_value().unwrap().is_combined());
        assert_eq!(stored.text_quote().unwrap().exact, "hello");
        assert_eq!(stored.text_position(), Some(TextPositionSelector { start: 0, end: 5 }));
    }

    #[test]
    fn test_untyped_position_value_decodes() {
        let stored = target(SelectorType::TextPositionSelector, json!({"start": 4, "end": 9}));
        assert_eq!(
            stored.selector_value().unwrap(),
            SelectorValue::Single(Selector::TextPosition(TextPositionSelector { start: 4, end: 9 }))
        );
        assert!(stored.text_quote().is_none());
    }

    #[test]
    fn test_mismatched_value_is_error() {
        let stored = target(SelectorType::FragmentSelector, json!({"start": 4, "end": 9}));
        let err = stored.selector_value().unwrap_err();
        assert!(matches!(
            err,
            SerializationError::InvalidSelectorValue {
                selector_type: SelectorType::FragmentSelector,
                ..
            }
        ));
    }

    #[test]
    fn test_from_text_selection() {
        let selection = TextSelectionInfo {
            text: "world".to_string(),
            text_quote_selector: create_text_quote_selector("world", Some("hello "), None, 50),
            text_position_selector: TextPositionSelector { start: 6, end: 11 },
            selected_cue_indices: vec![0],
            start_time: Some(1.0),
            end_time: Some(2.0),
        };

        let stored = StoredAnnotationTarget::from_text_selection("file-9", &selection);
        assert_eq!(stored.selector_value["textQuote"]["prefix"], "hello ");
        assert_eq!(stored.selector_value["textPosition"]["end"], 11);
        assert_eq!(stored.exact_text.as_deref(), Some("world"));
        assert_eq!(stored.start_time, Some(1.0));
    }

    #[test]
    fn test_from_media_selection() {
        let stored = StoredAnnotationTarget::from_media_selection("file-2", &media_selection(5.0, 7.5));
        assert_eq!(stored.selector_type, SelectorType::FragmentSelector);
        assert_eq!(stored.selector_value["type"], "FragmentSelector");
        assert_eq!(stored.selector_value["value"], "t=5.000,7.500");
        assert!(stored.selector_value().is_ok());
    }

    #[test]
    fn test_stored_wire_format() {
        let stored: StoredAnnotation = serde_json::from_value(json!({
            "id": "abc",
            "motivation": ["highlighting"],
            "bodyText": null,
            "targets": [],
            "creatorId": "u-1",
            "createdAt": "2024-01-15T10:30:00Z",
            "modifiedAt": "2024-01-15T10:30:00Z",
            "tagIds": []
        }))
        .unwrap();
        assert_eq!(stored.motivation, vec![Motivation::Highlighting]);
        assert!(stored.study_id.is_none());
    }
}
