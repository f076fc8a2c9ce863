//! Selector construction endpoints
//!
//! Turn user selections (text ranges, media time ranges) into W3C selectors.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::DocumentInput;
use crate::document::TextSelectionInfo;
use crate::error::{AppError, Result};
use crate::selectors::{
    format_fragment_time_range, media_selection, parse_media_fragment, FragmentSelector,
    MediaSelectionInfo,
};
use crate::state::AppState;

/// Create the selectors router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/text", post(text_selection))
        .route("/media", post(media_selection_handler))
        .route("/media/parse", post(parse_fragment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelectionRequest {
    pub document: DocumentInput,
    pub start: usize,
    pub end: usize,
    /// Overrides the configured context length
    pub context_length: Option<usize>,
}

async fn text_selection(
    State(state): State<AppState>,
    Json(req): Json<TextSelectionRequest>,
) -> Result<Json<TextSelectionInfo>> {
    let context_length = req
        .context_length
        .unwrap_or(state.config().anchoring.context_length);
    let document = req.document.load();

    let info = document
        .selection_info(req.start, req.end, context_length)
        .ok_or_else(|| {
            AppError::Unprocessable(format!(
                "Selection [{}, {}) is empty or outside the document",
                req.start, req.end
            ))
        })?;

    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSelectionRequest {
    pub start_time: f64,
    pub end_time: f64,
}

async fn media_selection_handler(
    Json(req): Json<MediaSelectionRequest>,
) -> Result<Json<MediaSelectionInfo>> {
    let valid = req.start_time.is_finite()
        && req.end_time.is_finite()
        && req.start_time >= 0.0
        && req.end_time >= req.start_time;
    if !valid {
        return Err(AppError::BadRequest(format!(
            "Invalid media range: {} to {}",
            req.start_time, req.end_time
        )));
    }

    Ok(Json(media_selection(req.start_time, req.end_time)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFragmentResponse {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub label: String,
}

async fn parse_fragment(
    Json(selector): Json<FragmentSelector>,
) -> Result<Json<ParsedFragmentResponse>> {
    let range = parse_media_fragment(&selector).ok_or_else(|| {
        AppError::Unprocessable(format!("Not a media time range: {}", selector.value))
    })?;
    let label = format_fragment_time_range(&selector).unwrap_or_default();

    Ok(Json(ParsedFragmentResponse {
        start_time: range.start_time,
        end_time: range.end_time,
        duration: range.duration(),
        label,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::post_json;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_text_selection_from_transcript() {
        let (status, body) = post_json(
            "/api/v1/selectors/text",
            json!({
                "document": {"cues": [
                    {"startTime": 0.0, "endTime": 2.0, "text": "First line here."},
                    {"startTime": 2.0, "endTime": 4.0, "text": "Second line."}
                ]},
                "start": 6,
                "end": 10
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "line");
        assert_eq!(body["textQuoteSelector"]["prefix"], "First ");
        assert_eq!(body["textPositionSelector"], json!({"start": 6, "end": 10}));
        assert_eq!(body["selectedCueIndices"], json!([0]));
        assert_eq!(body["startTime"], 0.0);
    }

    #[tokio::test]
    async fn test_text_selection_out_of_range() {
        let (status, body) = post_json(
            "/api/v1/selectors/text",
            json!({"document": {"text": "tiny"}, "start": 2, "end": 9}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "unprocessable");
    }

    #[tokio::test]
    async fn test_media_selection() {
        let (status, body) = post_json(
            "/api/v1/selectors/media",
            json!({"startTime": 30.0, "endTime": 45.5}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fragmentSelector"]["value"], "t=30.000,45.500");
        assert_eq!(
            body["fragmentSelector"]["conformsTo"],
            "http://www.w3.org/TR/media-frags/"
        );

        let (status, _) = post_json(
            "/api/v1/selectors/media",
            json!({"startTime": 10.0, "endTime": 5.0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_fragment() {
        let (status, body) = post_json(
            "/api/v1/selectors/media/parse",
            json!({"conformsTo": "http://www.w3.org/TR/media-frags/", "value": "t=65.000,90.000"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["duration"], 25.0);
        assert_eq!(body["label"], "1:05 - 1:30");

        let (status, _) = post_json(
            "/api/v1/selectors/media/parse",
            json!({"conformsTo": "http://www.w3.org/TR/media-frags/", "value": "t=5,abc"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
