//! Selector types following the W3C Web Annotation Data Model
//!
//! Reference: <https://www.w3.org/TR/annotation-model/#selectors>

use serde::{Deserialize, Serialize};

/// Media Fragments URI specification, used as `conformsTo` for time ranges
pub const MEDIA_FRAGMENTS_SPEC: &str = "http://www.w3.org/TR/media-frags/";

/// Identifies text by its exact content plus surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextQuoteSelector {
    /// The exact text that was selected
    pub exact: String,
    /// Text immediately before the selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Text immediately after the selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Identifies text by half-open character offsets `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPositionSelector {
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

impl TextPositionSelector {
    /// Number of characters covered, zero for inverted ranges
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identifies a sub-part of a resource with URI fragment syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentSelector {
    /// The fragment specification the value conforms to
    #[serde(rename = "conformsTo")]
    pub conforms_to: String,
    /// The fragment value, e.g. `t=30.000,45.000`
    pub value: String,
}

/// Identifies elements with a CSS selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CssSelector {
    pub value: String,
}

/// Identifies elements with an XPath expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XPathSelector {
    pub value: String,
}

/// A range between two other selectors
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSelector {
    pub start_selector: Box<Selector>,
    pub end_selector: Box<Selector>,
}

/// Any W3C selector, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    #[serde(rename = "TextQuoteSelector")]
    TextQuote(TextQuoteSelector),
    #[serde(rename = "TextPositionSelector")]
    TextPosition(TextPositionSelector),
    #[serde(rename = "FragmentSelector")]
    Fragment(FragmentSelector),
    #[serde(rename = "CssSelector")]
    Css(CssSelector),
    #[serde(rename = "XPathSelector")]
    XPath(XPathSelector),
    #[serde(rename = "RangeSelector")]
    Range(RangeSelector),
}

impl Selector {
    /// The discriminator of this selector
    pub fn selector_type(&self) -> SelectorType {
        match self {
            Selector::TextQuote(_) => SelectorType::TextQuoteSelector,
            Selector::TextPosition(_) => SelectorType::TextPositionSelector,
            Selector::Fragment(_) => SelectorType::FragmentSelector,
            Selector::Css(_) => SelectorType::CssSelector,
            Selector::XPath(_) => SelectorType::XPathSelector,
            Selector::Range(_) => SelectorType::RangeSelector,
        }
    }

    pub fn as_text_quote(&self) -> Option<&TextQuoteSelector> {
        match self {
            Selector::TextQuote(quote) => Some(quote),
            _ => None,
        }
    }

    pub fn as_text_position(&self) -> Option<&TextPositionSelector> {
        match self {
            Selector::TextPosition(position) => Some(position),
            _ => None,
        }
    }

    pub fn as_fragment(&self) -> Option<&FragmentSelector> {
        match self {
            Selector::Fragment(fragment) => Some(fragment),
            _ => None,
        }
    }
}

/// Discriminator values of [`Selector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorType {
    TextQuoteSelector,
    TextPositionSelector,
    FragmentSelector,
    CssSelector,
    XPathSelector,
    RangeSelector,
}

impl SelectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorType::TextQuoteSelector => "TextQuoteSelector",
            SelectorType::TextPositionSelector => "TextPositionSelector",
            SelectorType::FragmentSelector => "FragmentSelector",
            SelectorType::CssSelector => "CssSelector",
            SelectorType::XPathSelector => "XPathSelector",
            SelectorType::RangeSelector => "RangeSelector",
        }
    }
}

impl std::fmt::Display for SelectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage format for text highlights: quote and position kept together
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedTextSelector {
    pub text_quote: TextQuoteSelector,
    pub text_position: TextPositionSelector,
}

impl CombinedTextSelector {
    pub fn new(text_quote: TextQuoteSelector, text_position: TextPositionSelector) -> Self {
        Self {
            text_quote,
            text_position,
        }
    }

    /// Whether the position span still covers as many characters as the quote.
    ///
    /// Holds for freshly constructed pairs; the anchoring engine never relies on it.
    pub fn is_consistent(&self) -> bool {
        self.text_position.start <= self.text_position.end
            && self.text_position.len() == self.text_quote.exact.chars().count()
    }
}

/// A stored selector payload: either the combined text format or a single selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorValue {
    Combined(CombinedTextSelector),
    Single(Selector),
}

impl SelectorValue {
    pub fn is_combined(&self) -> bool {
        matches!(self, SelectorValue::Combined(_))
    }
}

impl From<CombinedTextSelector> for SelectorValue {
    fn from(value: CombinedTextSelector) -> Self {
        SelectorValue::Combined(value)
    }
}

impl From<Selector> for SelectorValue {
    fn from(value: Selector) -> Self {
        SelectorValue::Single(value)
    }
}
