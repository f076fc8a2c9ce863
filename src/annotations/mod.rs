//! Annotation module
//!
//! W3C Web Annotation support for research highlights.
//!
//! # Features
//!
//! - JSON-LD model: annotations, bodies, targets, collections
//! - Stored (database) shapes with raw selector payloads
//! - Conversion from stored annotations to JSON-LD, and validation of imports

mod serialization;
mod stored;
mod types;

pub use serialization::{
    build_selector, create_web_annotation, export_as_collection, extract_body_text,
    extract_selectors, generate_annotation_id, is_valid_annotation, parse_annotation,
    to_json_ld, CreateAnnotationOptions, JsonLdOptions, SerializationError,
    DEFAULT_COLLECTION_LABEL,
};
pub use stored::{StoredAnnotation, StoredAnnotationTarget};
pub use types::{
    Agent, AgentType, Annotation, AnnotationBody, AnnotationCollection, AnnotationPage,
    AnnotationTarget, BodyType, CollectionType, OneOrMany, PageType, ResourceType,
    SpecificResource, TextualBody, ANNOTATION_CONTEXT, ANNOTATION_TYPE,
    RESEARCH_ANNOTATION_CONTEXT,
};
