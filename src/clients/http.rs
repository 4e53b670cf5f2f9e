//! Shared HTTP client and deadline-bounded requests.

use once_cell::sync::Lazy;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::warn;

use crate::errors::HandlerError;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(concat!("difytalk/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Process-wide pooled client. Carries no request timeout of its own;
/// every call sets its deadline through [`fetch_with_timeout`].
pub fn client() -> &'static Client {
    &HTTP_CLIENT
}

/// Status and fully read body of an outbound call.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: String,
}

/// Sends `request` and reads the whole response body, all within `deadline`.
///
/// The in-flight request is aborted when the deadline wins, including
/// an origin that sends its headers and then stalls the body.
///
/// # Errors
///
/// `HandlerError::Timeout` when the deadline elapses, `HandlerError::Http`
/// for transport failures.
pub async fn fetch_with_timeout(
    request: RequestBuilder,
    deadline: Duration,
) -> Result<Fetched, HandlerError> {
    let exchange = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, reqwest::Error>(Fetched { status, body })
    };

    match tokio::time::timeout(deadline, exchange).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            let millis = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
            warn!(deadline_ms = millis, "Outbound request timed out");
            Err(HandlerError::Timeout(millis))
        }
    }
}
