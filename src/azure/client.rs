//! Azure Client
//!
//! Main client for talking to the Azure Resource Manager API, combining
//! the bearer-token credential with the rate-limit-aware HTTP client.

use super::http::{AzureHttpClient, FetchError};
use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::Value;

const MANAGEMENT_BASE: &str = "https://management.azure.com";

/// Main Azure client
#[derive(Clone)]
pub struct AzureClient {
    pub http: AzureHttpClient,
    pub subscription_id: String,
    access_token: String,
}

impl AzureClient {
    /// Create a new Azure client from validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = AzureHttpClient::new(config.retry)
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            subscription_id: config.subscription_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Make a GET request to an ARM endpoint.
    pub async fn get(&self, url: &str) -> Result<Value, FetchError> {
        self.http.get(url, &self.access_token).await
    }

    // =========================================================================
    // ARM URL helpers
    // =========================================================================

    /// Build a subscription-scoped ARM URL.
    pub fn subscription_url(&self, path: &str, api_version: &str) -> String {
        format!(
            "{}/subscriptions/{}/{}?api-version={}",
            MANAGEMENT_BASE, self.subscription_id, path, api_version
        )
    }

    /// URL listing all resource groups in the subscription.
    pub fn resource_groups_url(&self) -> String {
        self.subscription_url("resourcegroups", "2021-04-01")
    }

    /// URL listing the resources inside one resource group, with creation
    /// times expanded.
    pub fn group_resources_url(&self, group_name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/resources?$expand=createdTime&api-version=2019-10-01",
            MANAGEMENT_BASE,
            self.subscription_id,
            urlencoding::encode(group_name)
        )
    }

    /// URL listing all storage accounts in the subscription, with creation
    /// times expanded.
    pub fn storage_accounts_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Storage/storageAccounts?$expand=createdTime&api-version=2021-09-01",
            MANAGEMENT_BASE, self.subscription_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::http::RetryPolicy;
    use crate::config::Config;

    fn test_config() -> Config {
        Config {
            subscription_id: "sub-123".to_string(),
            access_token: "tok".to_string(),
            max_concurrency: 4,
            output_csv: None,
            porcelain: false,
            list_resources: false,
            retry: RetryPolicy::default(),
            thresholds: Default::default(),
        }
    }

    #[test]
    fn resource_groups_url_includes_subscription_and_version() {
        let client = AzureClient::new(&test_config()).unwrap();
        let url = client.resource_groups_url();
        assert!(url.contains("/subscriptions/sub-123/resourcegroups"));
        assert!(url.contains("api-version=2021-04-01"));
    }

    #[test]
    fn group_resources_url_escapes_group_name() {
        let client = AzureClient::new(&test_config()).unwrap();
        let url = client.group_resources_url("my group");
        assert!(url.contains("resourceGroups/my%20group/resources"));
        assert!(url.contains("$expand=createdTime"));
    }
}
