use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Models Runway still reports but the playground no longer offers.
pub const RETIRED_MODELS: &[&str] = &["gen3a_turbo", "gemini_2.5_flash", "veo3"];

/// `GET /organization`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetails {
    pub tier: Tier,
    #[serde(default)]
    pub credit_balance: f64,
    #[serde(default)]
    pub usage: OrganizationModelUsage,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    #[serde(default)]
    pub max_monthly_credit_spend: f64,
    #[serde(default)]
    pub models: BTreeMap<String, TierModelLimits>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierModelLimits {
    #[serde(default)]
    pub max_concurrent_generations: u64,
    #[serde(default)]
    pub max_daily_generations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OrganizationModelUsage {
    #[serde(default)]
    pub models: BTreeMap<String, ModelDailyUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDailyUsage {
    #[serde(default)]
    pub daily_generations: u64,
}

impl OrganizationDetails {
    /// Drop `hidden` models from the tier limits and the daily usage.
    pub fn without_models(mut self, hidden: &[&str]) -> Self {
        self.tier.models.retain(|model, _| !hidden.contains(&model.as_str()));
        self.usage.models.retain(|model, _| !hidden.contains(&model.as_str()));
        self
    }
}

/// Body of `POST /organization/usage`. `before_date` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageQuery {
    pub start_date: NaiveDate,
    pub before_date: NaiveDate,
}

impl UsageQuery {
    pub fn new(start_date: NaiveDate, before_date: NaiveDate) -> Self {
        Self {
            start_date,
            before_date,
        }
    }

    /// The thirty days up to and including `today`.
    pub fn trailing_month(today: NaiveDate) -> Self {
        Self::with_defaults(None, None, today)
    }

    /// Fill whichever bound is missing from the trailing month ending
    /// `today`.
    pub fn with_defaults(
        start_date: Option<NaiveDate>,
        before_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self {
            start_date: start_date
                .unwrap_or_else(|| today.checked_sub_days(Days::new(30)).unwrap_or(today)),
            before_date: before_date
                .unwrap_or_else(|| today.checked_add_days(Days::new(1)).unwrap_or(today)),
        }
    }
}

/// `POST /organization/usage` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUsage {
    #[serde(default)]
    pub results: Vec<UsageDay>,
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageDay {
    pub date: String,
    #[serde(default)]
    pub used_credits: Vec<UsedCredits>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UsedCredits {
    pub model: String,
    pub amount: f64,
}

impl OrganizationUsage {
    /// Drop `hidden` models from the model list and every day's breakdown.
    pub fn without_models(mut self, hidden: &[&str]) -> Self {
        for day in &mut self.results {
            day.used_credits
                .retain(|credits| !hidden.contains(&credits.model.as_str()));
        }
        self.models.retain(|model| !hidden.contains(&model.as_str()));
        self
    }
}
