//! Conversion between stored annotations and W3C JSON-LD

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::stored::{StoredAnnotation, StoredAnnotationTarget};
use super::types::{
    Agent, Annotation, AnnotationBody, AnnotationCollection, AnnotationPage, AnnotationTarget,
    CollectionType, OneOrMany, PageType, SpecificResource, TextualBody, ANNOTATION_CONTEXT,
    ANNOTATION_TYPE, RESEARCH_ANNOTATION_CONTEXT, RESERVED_KEYS,
};
use crate::motivation::Motivation;
use crate::selectors::{Selector, SelectorType, SelectorValue};

/// Label used when a collection is exported without one
pub const DEFAULT_COLLECTION_LABEL: &str = "Annotation Collection";

/// Errors during annotation serialization
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("Stored value does not match selector type {selector_type}: {reason}")]
    InvalidSelectorValue {
        selector_type: SelectorType,
        reason: String,
    },

    #[error("Annotation has no targets")]
    NoTargets,

    #[error("Not a valid W3C annotation")]
    InvalidAnnotation,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for [`create_web_annotation`]
#[derive(Debug, Clone)]
pub struct CreateAnnotationOptions {
    /// Annotation id; a `urn:uuid:` id is generated when absent
    pub id: Option<String>,
    /// Defaults to `highlighting` when empty
    pub motivation: Vec<Motivation>,
    pub body_text: Option<String>,
    /// Body format, `text/plain` unless set
    pub body_format: String,
    pub target_source: String,
    pub selectors: Vec<Selector>,
    pub creator: Option<Agent>,
    pub include_research_context: bool,
    /// Extra top-level properties; keys owned by the model are ignored
    pub additional_properties: Map<String, Value>,
}

impl Default for CreateAnnotationOptions {
    fn default() -> Self {
        Self {
            id: None,
            motivation: Vec::new(),
            body_text: None,
            body_format: "text/plain".to_string(),
            target_source: String::new(),
            selectors: Vec::new(),
            creator: None,
            include_research_context: false,
            additional_properties: Map::new(),
        }
    }
}

/// Generate an annotation id in URN form
pub fn generate_annotation_id() -> String {
    format!("urn:uuid:{}", Uuid::new_v4())
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn contexts(include_research: bool) -> Vec<String> {
    let mut context = vec![ANNOTATION_CONTEXT.to_string()];
    if include_research {
        context.push(RESEARCH_ANNOTATION_CONTEXT.to_string());
    }
    context
}

fn plain_body(text: Option<&str>, format: &str) -> Option<OneOrMany<AnnotationBody>> {
    let text = text.filter(|t| !t.is_empty())?;
    let mut body = TextualBody::plain(text);
    body.format = Some(format.to_string());
    Some(OneOrMany::One(AnnotationBody::Textual(body)))
}

fn without_reserved(mut properties: Map<String, Value>) -> Map<String, Value> {
    properties.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
    properties
}

/// Build a W3C annotation from scratch
pub fn create_web_annotation(options: CreateAnnotationOptions) -> Annotation {
    let motivation = if options.motivation.is_empty() {
        vec![Motivation::Highlighting]
    } else {
        options.motivation
    };

    let target = if options.selectors.is_empty() {
        AnnotationTarget::Iri(options.target_source)
    } else {
        AnnotationTarget::Specific(SpecificResource::new(
            options.target_source,
            Some(OneOrMany::from_vec(options.selectors)),
        ))
    };

    Annotation {
        context: OneOrMany::from_vec(contexts(options.include_research_context)),
        id: options.id.unwrap_or_else(generate_annotation_id),
        annotation_type: OneOrMany::One(ANNOTATION_TYPE.to_string()),
        motivation: Some(OneOrMany::from_vec(motivation)),
        creator: options.creator,
        created: Some(timestamp(Utc::now())),
        modified: None,
        generated: None,
        generator: None,
        body: plain_body(options.body_text.as_deref(), &options.body_format),
        target: OneOrMany::One(target),
        extensions: without_reserved(options.additional_properties),
    }
}

/// Options for [`to_json_ld`]
#[derive(Debug, Clone)]
pub struct JsonLdOptions {
    /// Prefix for file and study IRIs
    pub base_url: String,
    pub include_research_context: bool,
}

impl Default for JsonLdOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            include_research_context: true,
        }
    }
}

/// Convert a stored annotation to W3C JSON-LD
pub fn to_json_ld(
    stored: &StoredAnnotation,
    options: &JsonLdOptions,
) -> Result<Annotation, SerializationError> {
    let base_url = options.base_url.trim_end_matches('/');

    let targets = stored
        .targets
        .iter()
        .map(|target| {
            Ok(AnnotationTarget::Specific(SpecificResource::new(
                format!("{}/files/{}", base_url, target.file_ref_id),
                Some(build_selector(target)?),
            )))
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    if targets.is_empty() {
        return Err(SerializationError::NoTargets);
    }

    let mut extensions = Map::new();
    if let Some(study_id) = stored.study_id.as_deref().filter(|s| !s.is_empty()) {
        extensions.insert(
            "research:study".to_string(),
            Value::String(format!("{}/studies/{}", base_url, study_id)),
        );
    }
    if let Some(participant) = stored.participant_id.as_deref().filter(|s| !s.is_empty()) {
        extensions.insert(
            "research:participant".to_string(),
            Value::String(participant.to_string()),
        );
    }
    if let Some(session) = stored.session_id.as_deref().filter(|s| !s.is_empty()) {
        extensions.insert(
            "research:session".to_string(),
            Value::String(session.to_string()),
        );
    }

    Ok(Annotation {
        context: OneOrMany::Many(contexts(options.include_research_context)),
        id: format!("urn:uuid:{}", stored.id),
        annotation_type: OneOrMany::One(ANNOTATION_TYPE.to_string()),
        motivation: Some(OneOrMany::Many(stored.motivation.clone())),
        creator: None,
        created: Some(timestamp(stored.created_at)),
        modified: Some(timestamp(stored.modified_at)),
        generated: None,
        generator: None,
        body: plain_body(stored.body_text.as_deref(), "text/plain"),
        target: OneOrMany::from_vec(targets),
        extensions,
    })
}

/// Build the W3C selector(s) for a stored target.
///
/// The combined text format expands to a quote selector followed by a
/// position selector; every other payload maps to a single selector.
pub fn build_selector(
    target: &StoredAnnotationTarget,
) -> Result<OneOrMany<Selector>, SerializationError> {
    Ok(match target.selector_value()? {
        SelectorValue::Combined(combined) => OneOrMany::Many(vec![
            Selector::TextQuote(combined.text_quote),
            Selector::TextPosition(combined.text_position),
        ]),
        SelectorValue::Single(selector) => OneOrMany::One(selector),
    })
}

/// Text of the first body, when it is an embedded textual body
pub fn extract_body_text(annotation: &Annotation) -> Option<&str> {
    match annotation.body.as_ref()?.first()? {
        AnnotationBody::Textual(body) => Some(&body.value),
        AnnotationBody::Specific(_) | AnnotationBody::Iri(_) => None,
    }
}

/// Every selector across all targets, in order
pub fn extract_selectors(annotation: &Annotation) -> Vec<&Selector> {
    annotation
        .target
        .iter()
        .filter_map(|target| match target {
            AnnotationTarget::Specific(resource) => Some(resource.selectors()),
            AnnotationTarget::Iri(_) => None,
        })
        .flatten()
        .collect()
}

/// JavaScript-style truthiness of a JSON value
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Structural check for a W3C annotation
pub fn is_valid_annotation(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    if !obj.get("@context").is_some_and(truthy) {
        return false;
    }
    if !obj
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty())
    {
        return false;
    }
    if !obj.get("target").is_some_and(truthy) {
        return false;
    }

    match obj.get("type") {
        Some(Value::String(t)) => t == ANNOTATION_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t == ANNOTATION_TYPE),
        _ => false,
    }
}

/// Validate and decode an imported annotation
pub fn parse_annotation(value: Value) -> Result<Annotation, SerializationError> {
    if !is_valid_annotation(&value) {
        return Err(SerializationError::InvalidAnnotation);
    }
    Ok(serde_json::from_value(value)?)
}

/// Wrap annotations in a single-page collection
pub fn export_as_collection(
    annotations: Vec<Annotation>,
    collection_id: impl Into<String>,
    label: Option<&str>,
) -> AnnotationCollection {
    let label = label
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_COLLECTION_LABEL);

    AnnotationCollection {
        context: OneOrMany::One(ANNOTATION_CONTEXT.to_string()),
        id: collection_id.into(),
        collection_type: CollectionType::AnnotationCollection,
        label: Some(label.to_string()),
        total: Some(annotations.len()),
        first: Some(AnnotationPage {
            context: None,
            id: None,
            page_type: PageType::AnnotationPage,
            part_of: None,
            next: None,
            prev: None,
            start_index: None,
            items: annotations,
        }),
        last: None,
    }
}
