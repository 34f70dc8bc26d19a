use crate::api::SharedState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

const SWAGGER_UI_VERSION: &str = "5.17.14";

pub async fn index() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Feed Search API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{v}/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@{v}/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "/api/docs/json", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##,
        v = SWAGGER_UI_VERSION
    ))
}

/// Serves the OpenAPI document from `docs.spec_path`.
pub async fn json(State(state): State<SharedState>) -> Response {
    match tokio::fs::read_to_string(&state.docs.spec_path).await {
        Ok(content) => ([(header::CONTENT_TYPE, "application/json")], content).into_response(),
        Err(e) => {
            tracing::warn!("OpenAPI document {} unavailable: {}", state.docs.spec_path, e);
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Swagger JSON file not found" })),
            )
                .into_response()
        }
    }
}
