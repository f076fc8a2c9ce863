//! W3C annotation export and import endpoints

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotations::{
    export_as_collection, extract_body_text, extract_selectors, generate_annotation_id,
    is_valid_annotation, parse_annotation, to_json_ld, Annotation, AnnotationCollection,
    StoredAnnotation,
};
use crate::error::Result;
use crate::motivation::{primary_motivation, Motivation};
use crate::selectors::Selector;
use crate::state::AppState;

/// Create the annotations router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jsonld", post(export_json_ld))
        .route("/collection", post(export_collection))
        .route("/validate", post(validate))
        .route("/import", post(import))
}

async fn export_json_ld(
    State(state): State<AppState>,
    Json(stored): Json<StoredAnnotation>,
) -> Result<Json<Annotation>> {
    let annotation = to_json_ld(&stored, &state.json_ld_options())?;
    Ok(Json(annotation))
}

#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    pub annotations: Vec<StoredAnnotation>,
}

async fn export_collection(
    State(state): State<AppState>,
    Json(req): Json<CollectionRequest>,
) -> Result<Json<AnnotationCollection>> {
    let options = state.json_ld_options();
    let annotations = req
        .annotations
        .iter()
        .map(|stored| to_json_ld(stored, &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::info!(count = annotations.len(), "Exporting annotation collection");

    let id = req.id.unwrap_or_else(generate_annotation_id);
    Ok(Json(export_as_collection(
        annotations,
        id,
        req.label.as_deref(),
    )))
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

async fn validate(Json(value): Json<Value>) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: is_valid_annotation(&value),
    })
}

/// What an imported annotation carries, flattened for the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub id: String,
    pub motivations: Vec<Motivation>,
    pub primary_motivation: Motivation,
    pub body_text: Option<String>,
    pub selectors: Vec<Selector>,
    pub target_sources: Vec<String>,
}

async fn import(Json(value): Json<Value>) -> Result<Json<ImportSummary>> {
    let annotation = parse_annotation(value)?;

    let summary = ImportSummary {
        id: annotation.id.clone(),
        motivations: annotation.motivations().to_vec(),
        primary_motivation: primary_motivation(annotation.motivations()),
        body_text: extract_body_text(&annotation).map(str::to_string),
        selectors: extract_selectors(&annotation).into_iter().cloned().collect(),
        target_sources: annotation
            .target
            .iter()
            .map(|target| target.source().to_string())
            .collect(),
    };

    tracing::debug!(id = %summary.id, selectors = summary.selectors.len(), "Imported annotation");
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::post_json;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn stored(targets: Value) -> Value {
        json!({
            "id": "abc",
            "motivation": ["highlighting", "research:insight"],
            "bodyText": "Key moment",
            "targets": targets,
            "createdAt": "2024-01-15T10:30:00Z",
            "modifiedAt": "2024-01-15T10:30:00Z",
            "studyId": "study-1"
        })
    }

    fn text_target() -> Value {
        json!([{
            "fileRefId": "file-1",
            "selectorType": "TextQuoteSelector",
            "selectorValue": {
                "textQuote": {"exact": "hello", "prefix": "say "},
                "textPosition": {"start": 4, "end": 9}
            }
        }])
    }

    #[tokio::test]
    async fn test_export_json_ld() {
        let (status, body) = post_json("/api/v1/annotations/jsonld", stored(text_target())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "urn:uuid:abc");
        assert_eq!(body["type"], "Annotation");
        assert_eq!(body["created"], "2024-01-15T10:30:00.000Z");
        assert_eq!(body["research:study"], "http://localhost:3000/studies/study-1");
        assert_eq!(body["body"]["value"], "Key moment");

        let target = &body["target"];
        assert_eq!(target["source"], "http://localhost:3000/files/file-1");
        assert_eq!(target["selector"][0]["type"], "TextQuoteSelector");
        assert_eq!(target["selector"][1]["type"], "TextPositionSelector");
        assert_eq!(target["selector"][1]["end"], 9);
    }

    #[tokio::test]
    async fn test_export_without_targets_is_rejected() {
        let (status, body) = post_json("/api/v1/annotations/jsonld", stored(json!([]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "serialization_error");
    }

    #[tokio::test]
    async fn test_export_collection() {
        let (status, body) = post_json(
            "/api/v1/annotations/collection",
            json!({
                "id": "urn:uuid:collection-1",
                "annotations": [stored(text_target()), stored(text_target())]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "AnnotationCollection");
        assert_eq!(body["id"], "urn:uuid:collection-1");
        assert_eq!(body["label"], "Annotation Collection");
        assert_eq!(body["total"], 2);
        assert_eq!(body["first"]["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validate_and_import() {
        let annotation = json!({
            "@context": "http://www.w3.org/ns/anno.jsonld",
            "id": "urn:uuid:imported",
            "type": "Annotation",
            "motivation": ["research:quote", "commenting"],
            "body": {"type": "TextualBody", "value": "Worth citing"},
            "target": {
                "source": "http://example.com/files/f-2",
                "selector": {"type": "FragmentSelector",
                             "conformsTo": "http://www.w3.org/TR/media-frags/",
                             "value": "t=1.000,2.000"}
            }
        });

        let (_, body) = post_json("/api/v1/annotations/validate", annotation.clone()).await;
        assert_eq!(body["valid"], true);

        let (status, body) = post_json("/api/v1/annotations/import", annotation).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primaryMotivation"], "commenting");
        assert_eq!(body["bodyText"], "Worth citing");
        assert_eq!(body["selectors"][0]["value"], "t=1.000,2.000");
        assert_eq!(body["targetSources"], json!(["http://example.com/files/f-2"]));
    }

    #[tokio::test]
    async fn test_import_rejects_invalid() {
        let (_, body) = post_json("/api/v1/annotations/validate", json!({"id": "x"})).await;
        assert_eq!(body["valid"], false);

        let (status, _) = post_json(
            "/api/v1/annotations/import",
            json!({"@context": "x", "id": "x", "type": "Note", "target": "y"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
