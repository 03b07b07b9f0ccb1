//! Azure Storage Accounts
//!
//! Models and the listing call for storage accounts. The `$expand=createdTime`
//! listing already carries creation times, so no per-account detail fetch is
//! needed; the interesting work happens in the aggregator (per-location
//! tallies and limit analysis).

use super::client::AzureClient;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// One storage account as returned by the ARM listing call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: StorageProperties,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProperties {
    #[serde(default)]
    pub provisioning_state: String,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub primary_endpoints: PrimaryEndpoints,
    #[serde(default)]
    pub account_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryEndpoints {
    #[serde(default)]
    pub blob: String,
    #[serde(default)]
    pub queue: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub file: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    value: Vec<StorageAccount>,
}

impl StorageAccount {
    /// Effective creation time: `properties.creationTime` when present,
    /// falling back to the top-level expanded `createdTime`.
    pub fn effective_created_time(&self) -> Option<DateTime<Utc>> {
        self.properties.creation_time.or(self.created_time)
    }

    /// Account type for display. ARM omits it for some accounts; a plain
    /// `Microsoft.Storage/storageAccounts` resource without one is reported
    /// as inferred Standard_LRS.
    pub fn display_account_type(&self) -> String {
        let raw = self.properties.account_type.as_str();
        if raw.is_empty() || raw == "Unknown" {
            if self.resource_type == "Microsoft.Storage/storageAccounts" {
                return "Standard_LRS".to_string();
            }
            return "Unknown".to_string();
        }
        raw.to_string()
    }

    /// Whether `display_account_type` fell back to the Standard_LRS guess
    /// rather than reporting a type ARM actually returned.
    pub fn account_type_inferred(&self) -> bool {
        let raw = self.properties.account_type.as_str();
        (raw.is_empty() || raw == "Unknown")
            && self.resource_type == "Microsoft.Storage/storageAccounts"
    }

    /// Whether this account consumes a Standard DNS endpoint, the scarce
    /// per-region quota that motivates the limit analysis.
    pub fn is_standard_dns(&self) -> bool {
        self.display_account_type().starts_with("Standard_")
    }

    /// Resource group name parsed out of the resource ID.
    pub fn resource_group(&self) -> String {
        extract_resource_group(&self.id)
    }
}

/// Extract the resource group segment from a full ARM resource ID.
pub fn extract_resource_group(resource_id: &str) -> String {
    let mut parts = resource_id.split('/').peekable();
    while let Some(part) = parts.next() {
        if part.eq_ignore_ascii_case("resourceGroups") {
            if let Some(group) = parts.peek() {
                return (*group).to_string();
            }
        }
    }
    String::new()
}

/// List all storage accounts in the subscription. Like the resource-group
/// listing, a failure here is fatal to the run.
pub async fn list_storage_accounts(client: &AzureClient) -> Result<Vec<StorageAccount>> {
    let url = client.storage_accounts_url();
    let response = client
        .get(&url)
        .await
        .context("failed to fetch storage accounts")?;

    let parsed: ListResponse =
        serde_json::from_value(response).context("failed to parse storage account listing")?;

    tracing::info!("listed {} storage accounts", parsed.value.len());
    Ok(parsed.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(value: serde_json::Value) -> StorageAccount {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn creation_time_prefers_properties_over_expanded_field() {
        let sa = account(json!({
            "name": "sa1",
            "createdTime": "2021-01-01T00:00:00Z",
            "properties": {"creationTime": "2020-05-05T00:00:00Z"}
        }));
        assert_eq!(
            sa.effective_created_time().unwrap(),
            "2020-05-05T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn account_type_is_inferred_for_plain_storage_accounts() {
        let sa = account(json!({
            "name": "sa1",
            "type": "Microsoft.Storage/storageAccounts",
            "properties": {}
        }));
        assert_eq!(sa.display_account_type(), "Standard_LRS");
        assert!(sa.account_type_inferred());
        assert!(sa.is_standard_dns());
    }

    #[test]
    fn explicit_account_type_is_not_inferred() {
        let sa = account(json!({
            "name": "sa1",
            "type": "Microsoft.Storage/storageAccounts",
            "properties": {"accountType": "Standard_GRS"}
        }));
        assert!(!sa.account_type_inferred());
    }

    #[test]
    fn premium_accounts_are_not_standard_dns() {
        let sa = account(json!({
            "name": "sa1",
            "properties": {"accountType": "Premium_LRS"}
        }));
        assert!(!sa.is_standard_dns());
    }

    #[test]
    fn extracts_resource_group_from_id() {
        let id = "/subscriptions/abc/resourceGroups/my-rg/providers/Microsoft.Storage/storageAccounts/sa1";
        assert_eq!(extract_resource_group(id), "my-rg");
        assert_eq!(extract_resource_group("no groups here"), "");
    }
}
