//! # Credit usage report
//!
//! Prints the organization's credit balance and the last month of credit
//! usage per model, with retired models filtered out.
//!
//! ```bash
//! export RUNWAYML_API_SECRET=key_…
//! cargo run -p playground --example organization_usage
//! ```

use chrono::Utc;
use playground::runway::{RunwayAdapterBuilder, api_v1::UsageQuery};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let adapter = RunwayAdapterBuilder::new_from_env().build()?;

    let details = adapter.organization_details().await?;
    println!("credit balance: {}", details.credit_balance);
    println!("monthly cap:    {}", details.tier.max_monthly_credit_spend);

    let query = UsageQuery::trailing_month(Utc::now().date_naive());
    let usage = adapter.organization_usage(query).await?;

    for day in usage.results {
        let total: f64 = day.used_credits.iter().map(|credits| credits.amount).sum();
        println!("{}  {total:>8.1}", day.date);
        for credits in day.used_credits {
            println!("    {:<20} {:>8.1}", credits.model, credits.amount);
        }
    }
    Ok(())
}
