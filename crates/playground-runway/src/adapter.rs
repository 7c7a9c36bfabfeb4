use std::{env, sync::Arc, time::Duration};

use playground_core::{
    error::{PlaygroundError, Result},
    provider::BackendFactory,
};

use crate::{
    api_v1::{OrganizationDetails, OrganizationUsage, RETIRED_MODELS, UsageQuery},
    client::RunwayClient,
    strategies::StrategyTable,
};

/// Wires the HTTP client [`RunwayClient`] and the [`StrategyTable`] into a
/// value that implements [`playground_core::provider::GenerationProvider`].
///
/// The adapter is bound to one API key. Multi-tenant callers build one per
/// request through [`RunwayBackendFactory`].
pub struct RunwayAdapter {
    pub(crate) client: Arc<RunwayClient>,
    pub(crate) strategies: Arc<StrategyTable>,
}

impl RunwayAdapter {
    pub fn client(&self) -> &RunwayClient {
        &self.client
    }

    pub fn strategies(&self) -> &StrategyTable {
        &self.strategies
    }

    /// Organization tier and daily usage, without retired models.
    pub async fn organization_details(&self) -> Result<OrganizationDetails> {
        let details = self.client.organization().await?;
        Ok(details.without_models(RETIRED_MODELS))
    }

    /// Credit usage for `query`, without retired models.
    pub async fn organization_usage(&self, query: UsageQuery) -> Result<OrganizationUsage> {
        let usage = self.client.organization_usage(&query).await?;
        Ok(usage.without_models(RETIRED_MODELS))
    }
}

/// Builder for [`RunwayAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use playground_runway::RunwayAdapterBuilder;
///
/// let backend = RunwayAdapterBuilder::new_from_env()
///     .build()
///     .expect("RUNWAYML_API_SECRET must be set");
/// ```
#[derive(Debug, Default, Clone)]
pub struct RunwayAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) poll_interval: Option<Duration>,
    pub(crate) task_timeout: Option<Duration>,
}

impl RunwayAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `RUNWAYML_API_SECRET`, `RUNWAYML_BASE_URL` and
    /// `RUNWAY_POLL_INTERVAL_MS` from the environment.
    ///
    /// Never panics. A missing key only surfaces during [`Self::build`]; an
    /// unparsable poll interval is ignored.
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var("RUNWAYML_API_SECRET").ok(),
            base_url: env::var("RUNWAYML_BASE_URL").ok(),
            poll_interval: env::var("RUNWAY_POLL_INTERVAL_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis),
            task_timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Duration) -> Self {
        self.task_timeout = Some(task_timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`PlaygroundError::Invalid`] – if the API key is missing or empty.
    /// * [`PlaygroundError::Backend`] – if the HTTP client can't be built.
    pub fn build(self) -> Result<RunwayAdapter> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(PlaygroundError::Invalid(
                "missing env variable: `RUNWAYML_API_SECRET`".into(),
            ))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(crate::error::RunwayError::from)?;

        let mut client = RunwayClient::with_http(api_key, http, self.base_url);
        if let Some(poll_interval) = self.poll_interval {
            client = client.with_poll_interval(poll_interval);
        }
        if let Some(task_timeout) = self.task_timeout {
            client = client.with_task_timeout(task_timeout);
        }

        Ok(RunwayAdapter {
            client: Arc::new(client),
            strategies: Arc::new(StrategyTable::builtin()),
        })
    }
}

/// Builds a [`RunwayAdapter`] per caller API key, sharing base URL and
/// polling settings.
#[derive(Debug, Default, Clone)]
pub struct RunwayBackendFactory {
    template: RunwayAdapterBuilder,
}

impl RunwayBackendFactory {
    /// Use `template` for everything except the API key.
    pub fn new(template: RunwayAdapterBuilder) -> Self {
        Self { template }
    }

    pub fn from_env() -> Self {
        Self::new(RunwayAdapterBuilder::new_from_env())
    }
}

impl BackendFactory for RunwayBackendFactory {
    type Backend = RunwayAdapter;

    fn connect(&self, api_key: &str) -> Result<RunwayAdapter> {
        self.template.clone().with_api_key(api_key).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_a_key() {
        assert!(matches!(
            RunwayAdapterBuilder::new().build(),
            Err(PlaygroundError::Invalid(_))
        ));
        assert!(RunwayAdapterBuilder::new().with_api_key("").build().is_err());
    }

    #[test]
    fn factory_keeps_template_settings() {
        let factory = RunwayBackendFactory::new(
            RunwayAdapterBuilder::new()
                .with_base_url("http://localhost:9999/v1/")
                .with_poll_interval(Duration::from_millis(10)),
        );

        let adapter = factory.connect("key_abc").unwrap();
        assert_eq!(adapter.client().base_url(), "http://localhost:9999/v1");
        assert_eq!(adapter.strategies().endpoints().count(), 6);
    }
}
