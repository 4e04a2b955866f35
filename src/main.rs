//! Loads the signed-in user's filter menus and decodes a cohort location.
//!
//! Usage: `advising-client [LOCATION]`, e.g.
//! `advising-client "/cohort/filtered?m=Physics&l=Senior"`.

use std::sync::Arc;

use advising_client::filters::cohort_id_from_location;
use advising_client::{
    init_tracing, ApiClient, Config, FilterRegistry, Location, OptionLoader, Session,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Starting advising client");
    tracing::info!("API base URL: {}", config.api_base_url);
    tracing::info!("Download directory: {:?}", config.download_dir);

    if config.api_key.is_none() {
        tracing::warn!("No API key configured (ADVISING_API_KEY). Requests are unauthenticated!");
    }

    let location = Location::parse(
        &std::env::args()
            .nth(1)
            .unwrap_or_else(|| "/cohort/filtered".to_string()),
    )?;

    let client = ApiClient::new(&config)?;
    let session = Session::from_current_user(client.current_user().await?);
    tracing::info!(
        "Signed in as {} with {} curated groups",
        session.uid(),
        session.my_curated_groups().len()
    );

    let registry = FilterRegistry::default();
    let criteria = registry.decode_location(&location);

    let loader = OptionLoader::new(
        Arc::new(client.clone()),
        Arc::new(session.privileges().clone()),
        config.coe_dept_code.clone(),
    );
    let mut definitions = registry.definitions();
    let mut output = serde_json::Value::Null;
    loader
        .load_filter_options(&mut definitions, |loaded| {
            output = serde_json::json!({
                "cohortId": cohort_id_from_location(&location),
                "criteria": criteria,
                "definitions": loaded,
            });
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
