//! JSON bodies exchanged with the generation backend.

use draw_core::GenerationResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    /// PNG data URL (or bare base64) of the drawing.
    pub image: &'a str,
}

/// Successful `POST /api/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Task identifier.
    #[serde(default)]
    pub task_id: String,
    /// GLB location, usually relative to the backend root.
    #[serde(default)]
    pub model_url: String,
    /// STL location, usually relative to the backend root.
    #[serde(default)]
    pub stl_url: String,
    /// Human readable status message.
    #[serde(default)]
    pub message: Option<String>,
}

impl From<GenerateResponse> for GenerationResult {
    fn from(response: GenerateResponse) -> Self {
        Self {
            task_id: response.task_id,
            model_url: response.model_url,
            stl_url: response.stl_url,
            message: response.message,
        }
    }
}

/// Error body. FastAPI-style backends send a string `detail`, or a list of
/// validation errors for rejected request bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Error detail.
    #[serde(default)]
    pub detail: Value,
}

impl ErrorBody {
    /// Detail as display text.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        match self.detail {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// Progress of a generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Both GLB and STL exist.
    Completed,
    /// GLB exists, STL conversion pending.
    Processing,
    /// Nothing produced yet.
    Pending,
}

/// `GET /api/status/{task_id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Task progress.
    pub status: TaskState,
    /// Human readable status message.
    #[serde(default)]
    pub message: String,
}

/// `GET /` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when the service is up.
    pub status: String,
    /// Human readable banner.
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    /// Whether the backend reports itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "boom"})).expect("body");
        assert_eq!(body.into_message().as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_body_structured_detail() {
        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"loc": ["body", "image"]}]})).expect("body");
        let message = body.into_message().expect("message");
        assert!(message.contains("image"));
    }

    #[test]
    fn test_error_body_without_detail() {
        let body: ErrorBody = serde_json::from_value(json!({})).expect("body");
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn test_task_status_parses() {
        let status: TaskStatus =
            serde_json::from_value(json!({"status": "processing", "message": "converting"}))
                .expect("status");
        assert_eq!(status.status, TaskState::Processing);
    }

    #[test]
    fn test_generate_response_keeps_urls_verbatim() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "task_id": "ab12cd34",
            "model_url": "/outputs/ab12cd34_model.glb",
            "stl_url": "/outputs/ab12cd34_model.stl",
            "message": "done"
        }))
        .expect("response");
        let result = GenerationResult::from(response);
        assert_eq!(result.model_url, "/outputs/ab12cd34_model.glb");
        assert_eq!(result.message.as_deref(), Some("done"));
    }
}
