//! Anchoring endpoints
//!
//! Re-locate stored selectors in a supplied document, validate them, and
//! render highlighted HTML.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::DocumentInput;
use crate::anchoring::{AnchorOptions, AnchorResult};
use crate::document::DEFAULT_HIGHLIGHT_CLASS;
use crate::error::Result;
use crate::html::{inject_highlights_cached, HighlightConfig, HighlightRequest};
use crate::selectors::{TextPositionSelector, TextQuoteSelector};
use crate::state::AppState;

/// Create the anchoring router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(anchor))
        .route("/validate", post(validate))
        .route("/highlight", post(highlight))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRequest {
    pub document: DocumentInput,
    #[serde(default)]
    pub quote: Option<TextQuoteSelector>,
    #[serde(default)]
    pub position: Option<TextPositionSelector>,
    #[serde(flatten)]
    pub options: AnchorOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorResponse {
    #[serde(flatten)]
    pub result: AnchorResult,
    /// Transcript cues covered by the range
    pub cue_indices: Vec<usize>,
}

async fn anchor(
    State(state): State<AppState>,
    Json(req): Json<AnchorRequest>,
) -> Json<AnchorResponse> {
    let document = req.document.load();
    let result = state.anchor_cache().anchor(
        &document,
        req.quote.as_ref(),
        req.position.as_ref(),
        req.options,
    );
    let cue_indices = document.cues_for(&result);

    Json(AnchorResponse {
        result,
        cue_indices,
    })
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

async fn validate(
    State(state): State<AppState>,
    Json(req): Json<AnchorRequest>,
) -> Json<ValidateResponse> {
    let document = req.document.load();
    let result = state.anchor_cache().anchor(
        &document,
        req.quote.as_ref(),
        req.position.as_ref(),
        AnchorOptions::default(),
    );

    Json(ValidateResponse {
        valid: result.is_anchored() && result.exact,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightDocumentRequest {
    pub document: DocumentInput,
    pub annotations: Vec<HighlightRequest>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(flatten)]
    pub options: AnchorOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightResponse {
    pub html: String,
    pub injected: Vec<String>,
    pub orphaned: Vec<String>,
    pub inexact: Vec<String>,
}

async fn highlight(
    State(state): State<AppState>,
    Json(req): Json<HighlightDocumentRequest>,
) -> Result<Json<HighlightResponse>> {
    let mut document = req.document.load();
    let config = HighlightConfig {
        class_name: req
            .class_name
            .unwrap_or_else(|| DEFAULT_HIGHLIGHT_CLASS.to_string()),
        anchor_options: req.options,
    };

    let result = inject_highlights_cached(
        document.document_mut(),
        &req.annotations,
        &config,
        state.anchor_cache(),
    )?;

    tracing::debug!(
        injected = result.injected.len(),
        orphaned = result.orphaned.len(),
        "Rendered highlights"
    );

    Ok(Json(HighlightResponse {
        html: result.html,
        injected: result.injected,
        orphaned: result.orphaned,
        inexact: result.inexact,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::post_json;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_anchor_by_quote() {
        let (status, body) = post_json(
            "/api/v1/anchor",
            json!({
                "document": {"text": "The participant said the onboarding was confusing."},
                "quote": {"exact": "onboarding", "prefix": "said the "},
                "position": {"start": 0, "end": 3}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["usedSelector"], "quote");
        assert_eq!(body["exact"], true);
        assert_eq!(body["range"]["start"], 25);
        assert_eq!(body["range"]["text"], "onboarding");
    }

    #[tokio::test]
    async fn test_anchor_prefer_position_in_transcript() {
        let (status, body) = post_json(
            "/api/v1/anchor",
            json!({
                "document": {"cues": [
                    {"startTime": 0.0, "endTime": 1.0, "text": "yes"},
                    {"startTime": 1.0, "endTime": 2.0, "text": "yes"}
                ]},
                "quote": {"exact": "yes"},
                "position": {"start": 4, "end": 7},
                "preferQuote": false
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["usedSelector"], "position");
        assert_eq!(body["cueIndices"], json!([1]));
    }

    #[tokio::test]
    async fn test_anchor_failure_is_not_an_error() {
        let (status, body) = post_json(
            "/api/v1/anchor",
            json!({"document": {"text": "abc"}, "quote": {"exact": "xyz"}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["range"], serde_json::Value::Null);
        assert_eq!(body["usedSelector"], "none");
        assert_eq!(body["error"], "Could not anchor annotation to document");
    }

    #[tokio::test]
    async fn test_validate() {
        let (_, body) = post_json(
            "/api/v1/anchor/validate",
            json!({
                "document": {"text": "hello world"},
                "quote": {"exact": "world"},
                "position": {"start": 6, "end": 11}
            }),
        )
        .await;
        assert_eq!(body["valid"], true);

        let (_, body) = post_json(
            "/api/v1/anchor/validate",
            json!({
                "document": {"text": "hello there"},
                "quote": {"exact": "world"},
                "position": {"start": 6, "end": 11}
            }),
        )
        .await;
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_highlight_document() {
        let (status, body) = post_json(
            "/api/v1/anchor/highlight",
            json!({
                "document": {"text": "a <b> c"},
                "className": "hl",
                "annotations": [
                    {"annotationId": "ann-1", "quote": {"exact": "<b>"}},
                    {"annotationId": "ann-2", "quote": {"exact": "missing"}}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["html"],
            "<div>a <mark class=\"hl\" data-annotation-id=\"ann-1\" data-highlight-key=\"hl-1\">&lt;b&gt;</mark> c</div>"
        );
        assert_eq!(body["injected"], json!(["ann-1"]));
        assert_eq!(body["orphaned"], json!(["ann-2"]));
    }
}
