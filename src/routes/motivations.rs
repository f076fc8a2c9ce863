//! Motivation metadata endpoints

use axum::{
    extract::Query,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::motivation::{
    all_motivation_info, motivation_info, primary_motivation, Motivation, MotivationInfo,
};
use crate::state::AppState;

/// Create the motivations router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_motivations))
        .route("/primary", get(primary))
}

async fn list_motivations() -> Json<Vec<&'static MotivationInfo>> {
    Json(all_motivation_info())
}

#[derive(Debug, Deserialize)]
pub struct PrimaryQuery {
    /// Comma separated motivation ids
    #[serde(default)]
    pub motivations: String,
}

#[derive(Debug, Serialize)]
pub struct PrimaryResponse {
    pub primary: Motivation,
    pub info: Option<&'static MotivationInfo>,
}

async fn primary(Query(query): Query<PrimaryQuery>) -> Result<Json<PrimaryResponse>> {
    let motivations = query
        .motivations
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Motivation>)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let primary = primary_motivation(&motivations);
    Ok(Json(PrimaryResponse {
        primary,
        info: motivation_info(primary),
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::get_json;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_motivations() {
        let (status, body) = get_json("/api/v1/motivations").await;

        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 19);
        assert_eq!(list[0]["id"], "assessing");
        assert_eq!(list[18]["isExtension"], true);
    }

    #[tokio::test]
    async fn test_primary_motivation() {
        let (status, body) =
            get_json("/api/v1/motivations/primary?motivations=research:theme,tagging").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primary"], "tagging");
        assert_eq!(body["info"]["label"], "Tag");

        let (_, body) = get_json("/api/v1/motivations/primary").await;
        assert_eq!(body["primary"], "commenting");
    }

    #[tokio::test]
    async fn test_unknown_motivation() {
        let (status, body) = get_json("/api/v1/motivations/primary?motivations=shouting").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_motivation");
    }
}
