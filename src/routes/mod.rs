//! Route modules for the Cluster anchoring server

pub mod anchor;
pub mod annotations;
pub mod health;
pub mod motivations;
pub mod selectors;

use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::anchoring::{create_selectors_from_range, AnchorResult};
use crate::document::{
    AnchorRoot, DocumentRoot, TextIndex, TextSelectionInfo, TranscriptCue, TranscriptDocument,
};
use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/health", health::router())
        .nest("/api/v1/selectors", selectors::router())
        .nest("/api/v1/anchor", anchor::router())
        .nest("/api/v1/annotations", annotations::router())
        .nest("/api/v1/motivations", motivations::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// A document supplied in a request body: transcript cues or plain text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocumentInput {
    Transcript { cues: Vec<TranscriptCue> },
    Text { text: String },
}

impl DocumentInput {
    pub fn load(self) -> LoadedDocument {
        match self {
            DocumentInput::Transcript { cues } => {
                LoadedDocument::Transcript(TranscriptDocument::new(cues))
            }
            DocumentInput::Text { text } => LoadedDocument::Plain(DocumentRoot::from_text(&text)),
        }
    }
}

/// A request document ready for anchoring and highlighting
pub enum LoadedDocument {
    Transcript(TranscriptDocument),
    Plain(DocumentRoot),
}

impl LoadedDocument {
    pub fn document_mut(&mut self) -> &mut DocumentRoot {
        match self {
            LoadedDocument::Transcript(transcript) => transcript.document_mut(),
            LoadedDocument::Plain(doc) => doc,
        }
    }

    /// Selection info for `[start, end)`; plain documents report no cues
    pub fn selection_info(
        &self,
        start: usize,
        end: usize,
        context_length: usize,
    ) -> Option<TextSelectionInfo> {
        match self {
            LoadedDocument::Transcript(transcript) => {
                transcript.selection_info(start, end, context_length)
            }
            LoadedDocument::Plain(doc) => {
                let anchors = create_selectors_from_range(doc, start, end, context_length)?;
                Some(TextSelectionInfo {
                    text: anchors.text,
                    text_quote_selector: anchors.quote,
                    text_position_selector: anchors.position,
                    selected_cue_indices: Vec::new(),
                    start_time: None,
                    end_time: None,
                })
            }
        }
    }

    /// Cue indices covered by an anchoring result
    pub fn cues_for(&self, result: &AnchorResult) -> Vec<usize> {
        match (self, &result.range) {
            (LoadedDocument::Transcript(transcript), Some(range)) => {
                transcript.cues_in_range(range.start, range.end)
            }
            _ => Vec::new(),
        }
    }
}

impl AnchorRoot for LoadedDocument {
    fn text_index(&self) -> &TextIndex {
        match self {
            LoadedDocument::Transcript(transcript) => transcript.text_index(),
            LoadedDocument::Plain(doc) => doc.text_index(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::app;
    use crate::state::AppState;

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app(AppState::default()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // extractor rejections come back as plain text
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::get_json;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_endpoints() {
        for uri in ["/health", "/api/v1/health"] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["service"], "cluster-anchor");
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get_json("/api/v1/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
