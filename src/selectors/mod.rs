//! Selector module
//!
//! W3C selector types and the helpers that build them from user selections.
//!
//! # Features
//!
//! - Selector family for robust anchoring:
//!   - TextQuote - exact text with leading/trailing context
//!   - TextPosition - character offsets into flattened text
//!   - Fragment - media time ranges (`t=start,end`)
//!   - Css, XPath, Range - carried through serialization untouched
//!
//! - Combined text storage format (quote + position for one highlight)

mod builders;
mod types;

pub use builders::{
    create_media_fragment_selector, create_text_position_selector, create_text_quote_selector,
    expand_media_fragment, extract_text_position_selector, extract_text_quote_selector,
    format_fragment_time_range, format_timestamp, fragment_duration, is_media_fragment_selector,
    media_selection, parse_media_fragment, MediaSelectionInfo, MediaTimeRange, SelectorError,
    DEFAULT_CONTEXT_LENGTH,
};
pub use types::{
    CombinedTextSelector, CssSelector, FragmentSelector, RangeSelector, Selector, SelectorType,
    SelectorValue, TextPositionSelector, TextQuoteSelector, XPathSelector, MEDIA_FRAGMENTS_SPEC,
};
