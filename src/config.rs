//! Configuration
//!
//! Resolves the effective configuration from CLI flags and environment
//! variables into one immutable value that gets passed into the client,
//! pool, and renderers. Nothing reads ambient global state after startup.

use crate::aggregate::Thresholds;
use crate::azure::http::RetryPolicy;
use crate::pool::clamp_concurrency;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Environment fallbacks for the credential flags.
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";

/// Effective run configuration. Deliberately not Debug: it carries the
/// access token.
#[derive(Clone)]
pub struct Config {
    pub subscription_id: String,
    pub access_token: String,
    /// Admission ceiling for the worker pool. Always >= 1.
    pub max_concurrency: usize,
    pub output_csv: Option<PathBuf>,
    pub porcelain: bool,
    pub list_resources: bool,
    pub retry: RetryPolicy,
    pub thresholds: Thresholds,
}

impl Config {
    /// Resolve configuration from flag values, falling back to environment
    /// variables for the credentials. Fails when either credential is
    /// missing; coerces a sub-1 concurrency to 1.
    pub fn resolve(
        subscription_id: Option<String>,
        access_token: Option<String>,
        max_concurrency: i64,
        output_csv: Option<PathBuf>,
        porcelain: bool,
        list_resources: bool,
    ) -> Result<Self> {
        let subscription_id = subscription_id
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var(ENV_SUBSCRIPTION_ID).ok().filter(|s| !s.is_empty()));
        let Some(subscription_id) = subscription_id else {
            bail!(
                "Subscription ID is required. Set via --subscription-id flag or {} environment variable",
                ENV_SUBSCRIPTION_ID
            );
        };

        let access_token = access_token
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var(ENV_ACCESS_TOKEN).ok().filter(|s| !s.is_empty()));
        let Some(access_token) = access_token else {
            bail!(
                "Access token is required. Set via --access-token flag or {} environment variable",
                ENV_ACCESS_TOKEN
            );
        };

        Ok(Self {
            subscription_id,
            access_token,
            max_concurrency: clamp_concurrency(max_concurrency),
            output_csv,
            porcelain,
            list_resources,
            retry: RetryPolicy::default(),
            thresholds: Thresholds::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subscription_is_an_error() {
        // Only assert when the env fallback isn't set in the test environment.
        if std::env::var(ENV_SUBSCRIPTION_ID).is_err() {
            let result = Config::resolve(None, Some("tok".into()), 10, None, false, false);
            assert!(result.is_err());
        }
    }

    #[test]
    fn sub_one_concurrency_is_coerced() {
        let config = Config::resolve(
            Some("sub".into()),
            Some("tok".into()),
            -3,
            None,
            true,
            false,
        )
        .unwrap();
        assert_eq!(config.max_concurrency, 1);
        assert!(config.porcelain);
    }

    #[test]
    fn empty_flag_values_fall_through_to_env() {
        if std::env::var(ENV_SUBSCRIPTION_ID).is_err() {
            let result =
                Config::resolve(Some(String::new()), Some("tok".into()), 10, None, false, false);
            assert!(result.is_err());
        }
    }
}
