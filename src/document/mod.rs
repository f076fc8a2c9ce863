//! Document module
//!
//! The structures selectors are anchored against:
//!
//! - [`TextIndex`] - flattened text with char addressing
//! - [`DocumentRoot`] - a node tree that highlights can be wrapped into
//! - [`TranscriptDocument`] - timed cues laid out as a document

mod highlight;
mod text;
mod transcript;
mod tree;

pub use highlight::{
    highlight_range, Highlight, HighlightError, WrapStrategy, ANNOTATION_ID_ATTRIBUTE,
    DEFAULT_HIGHLIGHT_CLASS, HIGHLIGHT_KEY_ATTRIBUTE,
};
pub use text::{AnchorRoot, Occurrences, ResolvedRange, TextIndex};
pub use transcript::{
    CueSpan, TextSelectionInfo, TranscriptCue, TranscriptDocument, CUE_SEPARATOR,
};
pub use tree::{DocumentRoot, Element, Node, TextNodeSpan};
