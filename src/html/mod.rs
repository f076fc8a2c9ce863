//! HTML output module
//!
//! Server-side highlight injection into rendered documents.

mod highlight_injector;

pub use highlight_injector::{
    inject_highlights, inject_highlights_cached, HighlightConfig, HighlightRequest,
    InjectionResult,
};
