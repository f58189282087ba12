use crate::config::RetryConfig;
use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Delay before attempt `attempt + 1`: base * 2^(attempt - 1) plus up to one
/// base of jitter
fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.backoff_base_ms;
    let exp = base.saturating_mul(1u64 << (attempt - 1).min(16));
    let jitter = rand::random::<u64>() % base.max(1);
    Duration::from_millis(exp.saturating_add(jitter))
}

/// Run one decision-service request, retrying only transient failures.
///
/// Permanent errors (see [`ProviderError::is_transient`]) are returned after
/// the first attempt so they do not eat into the execution budget.
pub async fn retry_transient<F, Fut, T>(
    config: &RetryConfig,
    mut request: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 1;
    loop {
        let err = match request().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_transient() {
            debug!("Not retrying permanent provider error: {}", err);
            return Err(err);
        }
        if attempt >= config.max_attempts {
            if attempt > 1 {
                warn!("Giving up after {} attempts: {}", attempt, err);
            }
            return Err(err);
        }

        let delay = backoff_delay(config, attempt);
        warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}",
            attempt, config.max_attempts, err, delay
        );
        sleep(delay).await;
        attempt += 1;
    }
}
