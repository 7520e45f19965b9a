//! Asynchronous client for the generation backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use draw_core::GenerationResult;
use reqwest::{Client, Response};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::wire::{ErrorBody, GenerateRequest, GenerateResponse, HealthStatus, TaskStatus};

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default request timeout. Generation runs a model on the server, so this is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Operations the app needs from the backend.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Submit a drawing and receive the generated model locations.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Backend`] when the backend rejects the drawing,
    /// or a transport error.
    async fn generate_3d_model(&self, image: &str) -> ClientResult<GenerationResult>;

    /// Download the STL file for a task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingTaskId`] for an empty id.
    async fn download_stl(&self, task_id: &str) -> ClientResult<Vec<u8>>;

    /// Fetch model bytes from a URL returned by [`GenerationApi::generate_3d_model`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the download fails.
    async fn fetch_model(&self, url: &str) -> ClientResult<Vec<u8>>;

    /// Address a user can open for a URL returned by
    /// [`GenerationApi::generate_3d_model`]. Returned verbatim by default.
    fn model_link(&self, url: &str) -> String {
        url.to_string()
    }

    /// Query the progress of a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn task_status(&self, task_id: &str) -> ClientResult<TaskStatus>;

    /// Check the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    async fn health(&self) -> ClientResult<HealthStatus>;
}

/// HTTP implementation of [`GenerationApi`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is malformed.
    /// Returns [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> ClientResult<Self> {
        let mut base =
            Url::parse(base_url.as_ref()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{base} cannot be a base URL")));
        }

        // Keep any path prefix when joining endpoint paths.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(concat!("kids-draw/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient { http, base }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// Resolve an endpoint path or a backend-returned URL.
    ///
    /// Absolute URLs are kept; root-relative ones (`/outputs/...`) resolve
    /// against the backend host.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the result is not a valid URL.
    pub fn resolve(&self, path: &str) -> ClientResult<Url> {
        self.inner
            .base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Turn a non-success response into [`ClientError::Backend`].
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        Err(ClientError::Backend {
            status: status.as_u16(),
            detail,
        })
    }

    async fn get_bytes(&self, url: Url) -> ClientResult<Vec<u8>> {
        let response = self.inner.http.get(url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T>(&self, url: Url) -> ClientResult<T>
    where
        for<'de> T: serde::Deserialize<'de>,
    {
        let bytes = self.get_bytes(url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// URL of a per-task endpoint, with the id as one escaped path segment.
    fn task_url(&self, endpoint: &str, task_id: &str) -> ClientResult<Url> {
        let task_id = require_task_id(task_id)?;
        let mut url = self.resolve(endpoint)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{endpoint}: cannot hold a task id")))?
            .pop_if_empty()
            .push(task_id);
        Ok(url)
    }
}

fn require_task_id(task_id: &str) -> ClientResult<&str> {
    let task_id = task_id.trim();
    if task_id.is_empty() {
        Err(ClientError::MissingTaskId)
    } else {
        Ok(task_id)
    }
}

#[async_trait]
impl GenerationApi for ApiClient {
    async fn generate_3d_model(&self, image: &str) -> ClientResult<GenerationResult> {
        let url = self.resolve("api/generate")?;
        info!(bytes = image.len(), "Submitting drawing for 3D generation");

        let response = self
            .inner
            .http
            .post(url)
            .json(&GenerateRequest { image })
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body: GenerateResponse = serde_json::from_slice(&response.bytes().await?)?;

        if body.model_url.trim().is_empty() {
            return Err(ClientError::UnexpectedResponse(
                "response did not contain a model URL".to_string(),
            ));
        }
        debug!(task_id = %body.task_id, model_url = %body.model_url, "Generation finished");
        Ok(body.into())
    }

    async fn download_stl(&self, task_id: &str) -> ClientResult<Vec<u8>> {
        let url = self.task_url("api/download", task_id)?;
        debug!(%url, "Downloading STL");
        self.get_bytes(url).await
    }

    async fn fetch_model(&self, url: &str) -> ClientResult<Vec<u8>> {
        let url = self.resolve(url)?;
        debug!(%url, "Fetching model");
        self.get_bytes(url).await
    }

    fn model_link(&self, url: &str) -> String {
        self.resolve(url).map_or_else(|_| url.to_string(), String::from)
    }

    async fn task_status(&self, task_id: &str) -> ClientResult<TaskStatus> {
        let url = self.task_url("api/status", task_id)?;
        self.get_json(url).await
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        let url = self.resolve("")?;
        self.get_json(url).await
    }
}
