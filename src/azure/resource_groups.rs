//! Azure Resource Groups
//!
//! Models and API calls for resource groups and the resources they contain.
//! The initial listing is the only call whose failure aborts a run; the
//! per-group resource fetch is supplied to the worker pool and its errors
//! stay local to one result slot.

use super::client::AzureClient;
use super::http::FetchError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One resource group as returned by the ARM listing call. Immutable once
/// received; workers only ever read it.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceGroup {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub properties: GroupProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProperties {
    #[serde(default)]
    pub provisioning_state: String,
}

/// A resource inside a resource group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// List all resource groups in the subscription.
///
/// This is the one call allowed to fail the whole run: before the listing
/// succeeds there is no per-entity granularity to recover into.
pub async fn list_resource_groups(client: &AzureClient) -> Result<Vec<ResourceGroup>> {
    let url = client.resource_groups_url();
    let response = client
        .get(&url)
        .await
        .context("failed to fetch resource groups")?;

    let parsed: ListResponse<ResourceGroup> =
        serde_json::from_value(response).context("failed to parse resource group listing")?;

    tracing::info!("listed {} resource groups", parsed.value.len());
    Ok(parsed.value)
}

/// Fetch the resources inside one resource group, creation times expanded.
/// This is the per-item fetch handed to the worker pool.
pub async fn fetch_resources_in_group(
    client: &AzureClient,
    group_name: &str,
) -> Result<Vec<Resource>, FetchError> {
    let url = client.group_resources_url(group_name);
    let response = client.get(&url).await?;

    let parsed: ListResponse<Resource> = serde_json::from_value(response)?;
    Ok(parsed.value)
}

/// Earliest creation time across a set of resources. `None` when no
/// resource reports one, which ARM does for several legacy types.
pub fn earliest_created_time(resources: &[Resource]) -> Option<DateTime<Utc>> {
    resources.iter().filter_map(|r| r.created_time).min()
}
