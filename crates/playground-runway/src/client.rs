use std::{pin::pin, time::Duration};

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use playground_core::{model::EndpointKind, provider::DownloadedMedia};
use reqwest::{
    Client as HttpClient, RequestBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    api_v1::{CreateTaskResponse, OrganizationDetails, OrganizationUsage, Task, TaskStatus, UsageQuery},
    error::RunwayError,
};

pub const DEFAULT_BASE_URL: &str = "https://api.dev.runwayml.com/v1";
pub const API_VERSION: &str = "2024-11-06";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(10 * 60);

const VERSION_HEADER: &str = "x-runway-version";

/// Minimal HTTP client for the Runway task API.
///
/// * Every generation endpoint creates a task; the client polls
///   `GET /tasks/{id}` until the task reaches a terminal status.
/// * Accepts and returns the `api_v1` request / response structs defined
///   in this crate.
/// * Shares a single `reqwest::Client`, so cloning `RunwayClient` is cheap.
#[derive(Clone)]
pub struct RunwayClient {
    api_key: String,
    http: HttpClient,
    base: String,
    poll_interval: Duration,
    task_timeout: Duration,
}

impl RunwayClient {
    /// Convenience constructor building a default `reqwest` client with a
    /// 60 s per-request timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RunwayError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_http(api_key, http, None))
    }

    /// Build with a custom `reqwest::Client` and, optionally, another API
    /// origin (staging, a mock server, …).
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self {
            api_key: api_key.into(),
            http,
            base: base.trim_end_matches('/').to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Duration) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn headers(&self) -> Result<HeaderMap, RunwayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| RunwayError::Format("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RunwayError> {
        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RunwayError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Submit a generation job and return its task id.
    pub async fn create_task<B>(&self, endpoint: EndpointKind, body: &B) -> Result<String, RunwayError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base, endpoint.as_str());
        tracing::debug!(%endpoint, "creating Runway task");

        let created: CreateTaskResponse =
            Self::send(self.http.post(url).headers(self.headers()?).json(body)).await?;
        Ok(created.id)
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task, RunwayError> {
        let url = format!("{}/tasks/{task_id}", self.base);
        Self::send(self.http.get(url).headers(self.headers()?)).await
    }

    /// Cancel a running task, or delete a finished one.
    pub async fn cancel_task(&self, task_id: &str) -> Result<(), RunwayError> {
        let url = format!("{}/tasks/{task_id}", self.base);
        let resp = self.http.delete(url).headers(self.headers()?).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RunwayError::Api { status, body });
        }
        Ok(())
    }

    /// Poll a task, yielding every snapshot until one is terminal.
    pub fn task_updates<'a>(
        &'a self,
        task_id: &'a str,
    ) -> impl Stream<Item = Result<Task, RunwayError>> + 'a {
        try_stream! {
            loop {
                let task = self.get_task(task_id).await?;
                let done = task.status.is_terminal();
                tracing::debug!(task_id, status = %task.status, progress = ?task.progress, "polled Runway task");
                yield task;

                if done {
                    break;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }

    /// Suspend until the task succeeds and return its final snapshot.
    ///
    /// # Errors
    ///
    /// * [`RunwayError::TaskFailed`] – the task ended `FAILED` or `CANCELLED`.
    /// * [`RunwayError::TaskTimedOut`] – still running after the task timeout.
    pub async fn wait_for_task_output(&self, task_id: &str) -> Result<Task, RunwayError> {
        let poll = async {
            let mut updates = pin!(self.task_updates(task_id));
            let mut last = None;
            while let Some(task) = updates.next().await {
                last = Some(task?);
            }
            last.ok_or_else(|| RunwayError::Format(format!("task {task_id} yielded no status")))
        };

        let task = tokio::time::timeout(self.task_timeout, poll)
            .await
            .map_err(|_| RunwayError::TaskTimedOut {
                task_id: task_id.to_owned(),
                seconds: self.task_timeout.as_secs(),
            })??;

        match task.status {
            TaskStatus::Succeeded => Ok(task),
            status => {
                tracing::warn!(task_id, %status, failure = ?task.failure, "Runway task did not succeed");
                Err(RunwayError::TaskFailed {
                    task_id: task.id,
                    status: status.as_str(),
                    failure: task
                        .failure
                        .unwrap_or_else(|| format!("task ended as {status}")),
                    code: task.failure_code,
                })
            }
        }
    }

    /// Create a task and wait for it to succeed.
    pub async fn run_task<B>(&self, endpoint: EndpointKind, body: &B) -> Result<Task, RunwayError>
    where
        B: Serialize + ?Sized,
    {
        let task_id = self.create_task(endpoint, body).await?;
        self.wait_for_task_output(&task_id).await
    }

    pub async fn organization(&self) -> Result<OrganizationDetails, RunwayError> {
        let url = format!("{}/organization", self.base);
        Self::send(self.http.get(url).headers(self.headers()?)).await
    }

    pub async fn organization_usage(&self, query: &UsageQuery) -> Result<OrganizationUsage, RunwayError> {
        let url = format!("{}/organization/usage", self.base);
        Self::send(self.http.post(url).headers(self.headers()?).json(query)).await
    }

    /// Fetch an output URL. Output URLs are pre-signed, so no credentials
    /// are sent.
    pub async fn download(&self, url: &str) -> Result<DownloadedMedia, RunwayError> {
        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RunwayError::Api { status, body });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let data = resp.bytes().await?;

        Ok(DownloadedMedia { data, content_type })
    }
}
