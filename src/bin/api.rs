use std::sync::Arc;

use difytalk::core::config::AppConfig;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    difytalk::setup_logging();

    let config = Arc::new(AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?);

    if config.prefs_origin_from_request() {
        warn!("PREFS_BASE_URL is not set; preferences origin follows client-supplied Host headers");
    }

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let config = Arc::clone(&config);
        async move { difytalk::api::handler(&config, event).await }
    }))
    .await
}
