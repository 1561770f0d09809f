use std::env;
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_backoff_multiplier: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let retry_max_attempts = env::var("RETRY_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()?;
        let retry_initial_delay_ms = env::var("RETRY_INITIAL_DELAY_MS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()?;
        let retry_backoff_multiplier = env::var("RETRY_BACKOFF_MULTIPLIER")
            .unwrap_or_else(|_| "2.0".to_string())
            .parse()?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            retry_max_attempts,
            retry_initial_delay_ms,
            retry_backoff_multiplier,
        })
    }

    /// Retry policy applied around every persistence call.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_initial_delay_ms),
            self.retry_backoff_multiplier,
        )
    }
}
