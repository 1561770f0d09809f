use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;

use crate::error::{ AppError, Result };

/// Bounded retry with exponential backoff around the storage-call boundary.
///
/// Only transient connectivity failures are retried; validation and not-found
/// outcomes are ordinary values in this codebase and never pass through here.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            backoff_multiplier,
        }
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, DbErr>>,
    {
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => {
                    return Ok(value);
                }
                Err(err) if is_transient(&err) && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Transient database error, retrying in {:?}: {}",
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.mul_f64(self.backoff_multiplier);
                    attempt += 1;
                }
                Err(err) => {
                    return Err(AppError::Database(err));
                }
            }
        }
    }
}

/// Connectivity failures worth retrying; everything else surfaces immediately.
pub fn is_transient(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{ AtomicU32, Ordering };

    use sea_orm::RuntimeErr;

    use super::*;
    use crate::error::AppError;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1), 2.0)
    }

    fn connection_refused() -> DbErr {
        DbErr::Conn(RuntimeErr::Internal("connection refused".to_string()))
    }

    #[tokio::test]
    async fn test_recovers_from_transient_errors() {
        let calls = AtomicU32::new(0);

        let result = policy()
            .run(|| {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call < 2 { Err(connection_refused()) } else { Ok(42) }
                }
            }).await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(connection_refused()) }
            }).await;

        assert!(matches!(result, Err(AppError::Database(DbErr::Conn(_)))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_non_transient_errors() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = policy()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(DbErr::Custom("constraint violation".to_string())) }
            }).await;

        assert!(matches!(result, Err(AppError::Database(DbErr::Custom(_)))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
