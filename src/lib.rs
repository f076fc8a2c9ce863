//! Cluster Anchor
//!
//! W3C Web Annotation support for research transcripts and documents:
//! selector construction, re-anchoring of stored selectors, DOM-style
//! highlighting and JSON-LD serialization. The HTTP server binary is in
//! main.rs.
//!
//! # Modules
//!
//! - `selectors`: W3C selector types and builders
//! - `document`: text index, node tree, highlights, transcript layout
//! - `anchoring`: quote/position anchoring with an LRU cache
//! - `annotations`: JSON-LD model and stored-annotation conversion
//! - `motivation`: W3C and research motivation vocabulary

pub mod anchoring;
pub mod annotations;
pub mod config;
pub mod document;
pub mod error;
pub mod html;
pub mod motivation;
pub mod routes;
pub mod selectors;
pub mod state;
