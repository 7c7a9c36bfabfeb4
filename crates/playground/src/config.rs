//! Environment-driven settings for the route handler.

use std::{env, time::Duration};

use playground_core::error::{PlaygroundError, Result};

pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Everything the playground reads from the environment.
///
/// Provider credentials are not stored here: the Runway key belongs to each
/// caller, and the Supabase builder reads its own variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaygroundConfig {
    /// Lifetime of signed URLs handed to the generative API for stored
    /// input media.
    pub signed_url_ttl: Duration,
    pub runway_base_url: Option<String>,
    pub runway_poll_interval: Duration,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub media_bucket: Option<String>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            signed_url_ttl: DEFAULT_SIGNED_URL_TTL,
            runway_base_url: None,
            runway_poll_interval: DEFAULT_POLL_INTERVAL,
            supabase_url: None,
            supabase_anon_key: None,
            media_bucket: None,
        }
    }
}

impl PlaygroundConfig {
    /// Read `PLAYGROUND_SIGNED_URL_TTL_SECS`, `RUNWAYML_BASE_URL`,
    /// `RUNWAY_POLL_INTERVAL_MS`, `SUPABASE_URL`, `SUPABASE_ANON_KEY` and
    /// `SUPABASE_MEDIA_BUCKET`.
    ///
    /// # Errors
    ///
    /// * [`PlaygroundError::Invalid`] – a numeric variable is set but does not
    ///   parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Self::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            signed_url_ttl: parse_duration(&lookup, "PLAYGROUND_SIGNED_URL_TTL_SECS", Duration::from_secs)?
                .unwrap_or(defaults.signed_url_ttl),
            runway_base_url: non_empty(lookup("RUNWAYML_BASE_URL")),
            runway_poll_interval: parse_duration(&lookup, "RUNWAY_POLL_INTERVAL_MS", Duration::from_millis)?
                .unwrap_or(defaults.runway_poll_interval),
            supabase_url: non_empty(lookup("SUPABASE_URL")),
            supabase_anon_key: non_empty(lookup("SUPABASE_ANON_KEY")),
            media_bucket: non_empty(lookup("SUPABASE_MEDIA_BUCKET")),
        })
    }

    /// Factory producing one Runway adapter per caller key.
    #[cfg(feature = "runway")]
    pub fn runway_factory(&self) -> playground_runway::RunwayBackendFactory {
        let mut template = playground_runway::RunwayAdapterBuilder::new()
            .with_poll_interval(self.runway_poll_interval);
        if let Some(base_url) = &self.runway_base_url {
            template = template.with_base_url(base_url.clone());
        }
        playground_runway::RunwayBackendFactory::new(template)
    }

    #[cfg(feature = "supabase")]
    pub fn supabase_store(&self) -> Result<playground_supabase::SupabaseStore> {
        let mut builder = playground_supabase::SupabaseStoreBuilder::new();
        if let Some(url) = &self.supabase_url {
            builder = builder.with_url(url.clone());
        }
        if let Some(anon_key) = &self.supabase_anon_key {
            builder = builder.with_anon_key(anon_key.clone());
        }
        if let Some(bucket) = &self.media_bucket {
            builder = builder.with_bucket(bucket.clone());
        }
        builder.build()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_duration(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    unit: fn(u64) -> Duration,
) -> Result<Option<Duration>> {
    let Some(raw) = non_empty(lookup(name)) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(|value| Some(unit(value)))
        .map_err(|_| PlaygroundError::Invalid(format!("`{name}` must be a whole number, got `{raw}`")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = PlaygroundConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlaygroundConfig::default());
        assert_eq!(config.signed_url_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn reads_overrides() {
        let config = PlaygroundConfig::from_lookup(lookup(&[
            ("PLAYGROUND_SIGNED_URL_TTL_SECS", "120"),
            ("RUNWAY_POLL_INTERVAL_MS", "250"),
            ("SUPABASE_MEDIA_BUCKET", "renders"),
            ("SUPABASE_URL", " "),
        ]))
        .unwrap();

        assert_eq!(config.signed_url_ttl, Duration::from_secs(120));
        assert_eq!(config.runway_poll_interval, Duration::from_millis(250));
        assert_eq!(config.media_bucket.as_deref(), Some("renders"));
        assert_eq!(config.supabase_url, None);
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = PlaygroundConfig::from_lookup(lookup(&[("PLAYGROUND_SIGNED_URL_TTL_SECS", "1h")])).unwrap_err();
        assert!(err.to_string().contains("PLAYGROUND_SIGNED_URL_TTL_SECS"));
    }
}
