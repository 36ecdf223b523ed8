//! Randomized pauses between requests

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::HarvestError;
use crate::infrastructure::config::DelayRange;

/// Sleep for a random duration inside `range`, returning early on cancellation
pub async fn polite_pause(range: DelayRange, cancel: &CancellationToken) -> Result<(), HarvestError> {
    if cancel.is_cancelled() {
        return Err(HarvestError::Cancelled);
    }
    if range.is_zero() {
        return Ok(());
    }

    let pause = range.sample();
    debug!("Pausing {:?} before next request", pause);

    tokio::select! {
        () = cancel.cancelled() => Err(HarvestError::Cancelled),
        () = tokio::time::sleep(pause) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn zero_range_returns_immediately() {
        let cancel = CancellationToken::new();
        let started = std::time::Instant::now();
        polite_pause(DelayRange::NONE, &cancel).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn cancellation_interrupts_a_long_pause() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = polite_pause(DelayRange::new(60_000, 60_000), &cancel).await;
        assert!(matches!(result, Err(HarvestError::Cancelled)));
    }

    #[tokio::test]
    async fn already_cancelled_token_fails_fast() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(polite_pause(DelayRange::NONE, &cancel).await.is_err());
    }
}
