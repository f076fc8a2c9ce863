//! Annotation types following the W3C Web Annotation Data Model
//!
//! Reference: <https://www.w3.org/TR/annotation-model/>

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::motivation::Motivation;
use crate::selectors::Selector;

/// W3C annotation JSON-LD context
pub const ANNOTATION_CONTEXT: &str = "http://www.w3.org/ns/anno.jsonld";
/// Research extension context
pub const RESEARCH_ANNOTATION_CONTEXT: &str = "https://research-annotations.io/ns/research.jsonld";

/// Type tag of an annotation
pub const ANNOTATION_TYPE: &str = "Annotation";

/// JSON-LD properties that may hold a single value or an array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapse to a bare value when there is exactly one
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return OneOrMany::One(item);
            }
        }
        OneOrMany::Many(items)
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

/// Agent kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentType {
    Person,
    Organization,
    Software,
}

/// Creator or generator of an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl Agent {
    pub fn person(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            agent_type: AgentType::Person,
            name: None,
            nickname: None,
            email: None,
            homepage: None,
        }
    }
}

/// Marker for the `TextualBody` type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    TextualBody,
}

/// Marker for the `SpecificResource` type tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    #[default]
    SpecificResource,
}

/// Marker for the `AnnotationCollection` type tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    #[default]
    AnnotationCollection,
}

/// Marker for the `AnnotationPage` type tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageType {
    #[default]
    AnnotationPage,
}

/// Text embedded in the annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextualBody {
    #[serde(rename = "type")]
    pub body_type: BodyType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Motivation>,
}

impl TextualBody {
    /// A `text/plain` body
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            body_type: BodyType::TextualBody,
            value: value.into(),
            format: Some("text/plain".to_string()),
            language: None,
            purpose: None,
        }
    }
}

/// A resource refined by selectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificResource {
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Motivation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<OneOrMany<Selector>>,
}

impl SpecificResource {
    pub fn new(source: impl Into<String>, selector: Option<OneOrMany<Selector>>) -> Self {
        Self {
            resource_type: ResourceType::SpecificResource,
            source: source.into(),
            purpose: None,
            selector,
        }
    }

    pub fn selectors(&self) -> &[Selector] {
        self.selector.as_ref().map(OneOrMany::as_slice).unwrap_or_default()
    }
}

/// Annotation body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationBody {
    Textual(TextualBody),
    Specific(SpecificResource),
    Iri(String),
}

/// Annotation target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationTarget {
    Specific(SpecificResource),
    Iri(String),
}

impl AnnotationTarget {
    pub fn source(&self) -> &str {
        match self {
            AnnotationTarget::Specific(resource) => &resource.source,
            AnnotationTarget::Iri(iri) => iri,
        }
    }
}

/// A complete W3C annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "@context")]
    pub context: OneOrMany<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub annotation_type: OneOrMany<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<OneOrMany<Motivation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<OneOrMany<AnnotationBody>>,
    pub target: OneOrMany<AnnotationTarget>,
    /// Extension properties such as `research:study`
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Annotation {
    /// Motivations in declaration order
    pub fn motivations(&self) -> &[Motivation] {
        self.motivation.as_ref().map(OneOrMany::as_slice).unwrap_or_default()
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }
}

/// Keys owned by [`Annotation`]'s typed fields
pub(crate) const RESERVED_KEYS: &[&str] = &[
    "@context",
    "id",
    "type",
    "motivation",
    "creator",
    "created",
    "modified",
    "generated",
    "generator",
    "body",
    "target",
];

/// A page of annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPage {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub page_type: PageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    pub items: Vec<Annotation>,
}

/// An ordered collection of annotation pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationCollection {
    #[serde(rename = "@context")]
    pub context: OneOrMany<String>,
    pub id: String,
    #[serde(rename = "type", default)]
    pub collection_type: CollectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<AnnotationPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<AnnotationPage>,
}
