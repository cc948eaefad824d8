//! Relay of uploaded CSV files to the external analysis backend.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{ErrorBody, RelayError},
    model::AnalysisResult,
    state::AppState,
    upload::UploadSelection,
};

pub const FILE_FIELD: &str = "file";
const FALLBACK_FILE_NAME: &str = "upload.csv";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Multipart request accepted by `/api/analyze`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Stakeholder comments as CSV.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Forwards uploads to the analysis backend. Cheap to clone.
#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    backend_url: String,
}

impl RelayClient {
    pub fn new(backend_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RelayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            backend_url: backend_url.into(),
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Re-wraps `upload` as a fresh multipart body and posts it to the
    /// backend. The backend JSON comes back as-is, without schema checks.
    /// Failures are logged here with full detail.
    pub async fn forward(&self, upload: &UploadSelection) -> Result<Value, RelayError> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            file = %upload.name,
            bytes = upload.size(),
            "Relaying upload to {}",
            self.backend_url
        );

        let result = self.send(upload).await;
        match &result {
            Ok(_) => info!(%request_id, "Analysis received"),
            Err(e) => error!(%request_id, "Analysis error: {e}"),
        }
        result
    }

    async fn send(&self, upload: &UploadSelection) -> Result<Value, RelayError> {
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.name.clone())
            .mime_str(&upload.content_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.backend_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::BackendStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Pulls the `file` field out of a multipart request. Other fields are
/// skipped.
pub async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadSelection>, RelayError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or(FALLBACK_FILE_NAME).to_string();
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;
        return Ok(Some(UploadSelection::new(name, content_type, bytes)));
    }
    Ok(None)
}

/// Relay a CSV upload to the analysis backend
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "analysis",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Backend analysis, passed through unmodified", body = AnalysisResult),
        (status = 400, description = "No file field in the upload", body = ErrorBody),
        (status = 500, description = "Backend unreachable or failed", body = ErrorBody)
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, RelayError> {
    let mut multipart = multipart.map_err(|e| log_rejected(e.into()))?;
    let upload = read_file_field(&mut multipart)
        .await
        .map_err(log_rejected)?
        .ok_or(RelayError::MissingFile)?;

    let analysis = state.relay.forward(&upload).await?;
    Ok(Json(analysis))
}

fn log_rejected(e: RelayError) -> RelayError {
    error!("Analysis error: {e}");
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_for, json_body, multipart_body, spawn_backend, text_body, upload_request};
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
        response::IntoResponse,
        routing::post,
        Router,
    };
    use serde_json::json;
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    fn sample_result() -> Value {
        json!({
            "sentimentAnalysis": {"positive": 1, "negative": 0, "neutral": 0, "totalComments": 1},
            "summaries": [{
                "id": "0",
                "originalComment": "Clear and helpful guidance.",
                "summary": "Guidance is helpful.",
                "sentiment": "positive",
                "sentimentScore": 0.97,
                "urgency": "Not Applicable"
            }],
            "wordCloud": {"image": "", "format": "base64"},
            "urgencyAnalysis": {"critical": 0, "moderate": 0, "minor": 0, "notApplicable": 1},
            "averageSentimentScore": 0.97
        })
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let app = app_for("http://127.0.0.1:9/analyze");
        let body = multipart_body("comments", "comments.csv", "text/csv", "review\nok");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "No file provided"}));
    }

    #[tokio::test]
    async fn test_success_passes_backend_json_through() {
        let backend = Router::new().route("/analyze", post(|| async { Json(sample_result()) }));
        let app = app_for(&spawn_backend(backend).await);
        let body = multipart_body("file", "comments.csv", "text/csv", "review\nClear and helpful guidance.");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, sample_result());
    }

    #[tokio::test]
    async fn test_backend_key_order_is_preserved() {
        const BODY: &str = r#"{"sentimentAnalysis":{"totalComments":0,"positive":0,"negative":0,"neutral":0},"summaries":[],"averageSentimentScore":0.0}"#;
        let backend = Router::new().route(
            "/analyze",
            post(|| async { ([(CONTENT_TYPE, "application/json")], BODY) }),
        );
        let app = app_for(&spawn_backend(backend).await);
        let body = multipart_body("file", "comments.csv", "text/csv", "review\nfine");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_body(response).await, BODY);
    }

    #[tokio::test]
    async fn test_backend_receives_same_file_under_file_field() {
        async fn echo(mut multipart: Multipart) -> Json<Value> {
            let mut fields = Vec::new();
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let text = field.text().await.unwrap();
                fields.push(json!({
                    "name": name,
                    "fileName": file_name,
                    "contentType": content_type,
                    "text": text
                }));
            }
            Json(json!({ "fields": fields }))
        }

        let backend = Router::new().route("/analyze", post(echo));
        let app = app_for(&spawn_backend(backend).await);
        let body = multipart_body("file", "consultation.csv", "text/csv", "review\nToo slow");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"fields": [{
                "name": "file",
                "fileName": "consultation.csv",
                "contentType": "text/csv",
                "text": "review\nToo slow"
            }]})
        );
    }

    #[tokio::test]
    async fn test_backend_error_status_is_generic_failure() {
        let backend = Router::new().route(
            "/analyze",
            post(|| async {
                (StatusCode::BAD_GATEWAY, "model crashed: CUDA out of memory").into_response()
            }),
        );
        let app = app_for(&spawn_backend(backend).await);
        let body = multipart_body("file", "comments.csv", "text/csv", "review\nfine");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Analysis failed"}));
    }

    #[tokio::test]
    async fn test_malformed_backend_json_is_generic_failure() {
        let backend = Router::new().route("/analyze", post(|| async { "<html>tunnel offline</html>" }));
        let app = app_for(&spawn_backend(backend).await);
        let body = multipart_body("file", "comments.csv", "text/csv", "review\nfine");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Analysis failed"}));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_generic_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let app = app_for(&format!("http://{addr}/analyze"));
        let body = multipart_body("file", "comments.csv", "text/csv", "review\nfine");

        let response = app.oneshot(upload_request("/api/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Analysis failed"}));
    }

    #[tokio::test]
    async fn test_non_multipart_request_is_generic_failure() {
        let app = app_for("http://127.0.0.1:9/analyze");
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Analysis failed"}));
    }
}
