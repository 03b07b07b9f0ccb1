//! Result aggregation
//!
//! Post-processes the ordered per-entity results after the worker pool has
//! fully drained: applies name classification, derives creation times,
//! tallies per-location counts, and ranks the oldest accounts in locations
//! that are close to their quota. Runs single-threaded on immutable inputs;
//! a per-item fetch failure is carried through as a row-level error, never
//! a failure of the aggregation itself.

use crate::azure::http::FetchError;
use crate::azure::resource_groups::{earliest_created_time, Resource, ResourceGroup};
use crate::azure::storage::StorageAccount;
use crate::classify::{classify, ClassificationInfo};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// How many oldest accounts to surface as deletion candidates.
pub const OLDEST_CANDIDATES: usize = 5;

/// Per-region quota thresholds. Azure allows 250 storage accounts per
/// subscription per region, and roughly 260 Standard DNS endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub region_warning: usize,
    pub region_limit: usize,
    pub dns_warning: usize,
    pub dns_critical: usize,
    pub dns_limit: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            region_warning: 200,
            region_limit: 250,
            dns_warning: 200,
            dns_critical: 240,
            dns_limit: 260,
        }
    }
}

/// How close a tally is to its quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStatus {
    Ok,
    Warning,
    AtLimit,
}

impl LimitStatus {
    fn for_count(count: usize, warning: usize, limit: usize) -> Self {
        if count >= limit {
            Self::AtLimit
        } else if count >= warning {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

// =============================================================================
// Resource groups
// =============================================================================

/// One resource group with everything the renderers need.
#[derive(Debug)]
pub struct GroupRow {
    pub group: ResourceGroup,
    pub classification: ClassificationInfo,
    /// Sub-resources when the fetch succeeded.
    pub resources: Option<Vec<Resource>>,
    /// Earliest creation time across the group's resources.
    pub created_time: Option<DateTime<Utc>>,
    /// Per-item fetch failure, rendered inline so operators can tell
    /// "nothing found" from "could not be fetched".
    pub error: Option<String>,
}

/// Ordered resource-group report. Row order equals listing order.
#[derive(Debug)]
pub struct GroupReport {
    pub rows: Vec<GroupRow>,
}

/// Join the ordered pool results back onto their groups. `groups` and
/// `results` are index-aligned by construction of the pool.
pub fn build_group_report(
    groups: Vec<ResourceGroup>,
    results: Vec<Result<Vec<Resource>, FetchError>>,
) -> GroupReport {
    debug_assert_eq!(groups.len(), results.len());

    let rows = groups
        .into_iter()
        .zip(results)
        .map(|(group, result)| {
            // Classification depends only on the name, so even a failed
            // fetch still gets classified.
            let classification = classify(&group.name);
            match result {
                Ok(resources) => GroupRow {
                    classification,
                    created_time: earliest_created_time(&resources),
                    resources: Some(resources),
                    error: None,
                    group,
                },
                Err(err) => GroupRow {
                    classification,
                    created_time: None,
                    resources: None,
                    error: Some(err.to_string()),
                    group,
                },
            }
        })
        .collect();

    GroupReport { rows }
}

// =============================================================================
// Storage accounts
// =============================================================================

/// One storage account with derived display fields.
#[derive(Debug)]
pub struct AccountRow {
    pub account: StorageAccount,
    pub created_time: Option<DateTime<Utc>>,
    pub account_type: String,
    pub is_standard_dns: bool,
}

/// Per-location tallies and quota analysis.
#[derive(Debug)]
pub struct LocationSummary {
    pub location: String,
    pub by_account_type: BTreeMap<String, usize>,
    pub total: usize,
    pub status: LimitStatus,
    pub standard_dns_count: usize,
    pub dns_status: LimitStatus,
    /// Indexes into the report rows: the oldest Standard DNS accounts in
    /// this location, oldest first, accounts without a timestamp last.
    pub oldest_standard_dns: Vec<usize>,
}

/// Ordered storage-account report plus per-location summaries.
#[derive(Debug)]
pub struct StorageReport {
    pub rows: Vec<AccountRow>,
    pub locations: Vec<LocationSummary>,
    pub thresholds: Thresholds,
}

/// Build the storage report: one linear pass for the tallies, then a ranked
/// copy per hot location for the oldest-N view.
pub fn build_storage_report(accounts: Vec<StorageAccount>, thresholds: Thresholds) -> StorageReport {
    let rows: Vec<AccountRow> = accounts
        .into_iter()
        .map(|account| AccountRow {
            created_time: account.effective_created_time(),
            account_type: account.display_account_type(),
            is_standard_dns: account.is_standard_dns(),
            account,
        })
        .collect();

    // BTreeMap keeps location order deterministic across runs.
    let mut by_location: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        by_location
            .entry(row.account.location.clone())
            .or_default()
            .push(index);
    }

    let locations = by_location
        .into_iter()
        .map(|(location, indexes)| {
            let mut by_account_type: BTreeMap<String, usize> = BTreeMap::new();
            let mut dns_indexes: Vec<usize> = Vec::new();

            for &index in &indexes {
                let row = &rows[index];
                *by_account_type.entry(row.account_type.clone()).or_insert(0) += 1;
                if row.is_standard_dns {
                    dns_indexes.push(index);
                }
            }

            let total = indexes.len();
            let standard_dns_count = dns_indexes.len();

            let oldest_standard_dns =
                oldest_n(&rows, dns_indexes, OLDEST_CANDIDATES);

            LocationSummary {
                status: LimitStatus::for_count(
                    total,
                    thresholds.region_warning,
                    thresholds.region_limit,
                ),
                dns_status: LimitStatus::for_count(
                    standard_dns_count,
                    thresholds.dns_warning,
                    thresholds.dns_critical,
                ),
                location,
                by_account_type,
                total,
                standard_dns_count,
                oldest_standard_dns,
            }
        })
        .collect();

    StorageReport {
        rows,
        locations,
        thresholds,
    }
}

/// Rank the given rows by creation time ascending and take the first `n`.
/// Rows with no timestamp sort after every row with one and never panic a
/// comparison.
fn oldest_n(rows: &[AccountRow], mut indexes: Vec<usize>, n: usize) -> Vec<usize> {
    indexes.sort_by(|&a, &b| match (rows[a].created_time, rows[b].created_time) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    indexes.truncate(n);
    indexes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(name: &str) -> ResourceGroup {
        serde_json::from_value(json!({"name": name, "location": "eastus"})).unwrap()
    }

    fn sa(name: &str, location: &str, account_type: &str, created: Option<&str>) -> StorageAccount {
        let mut value = json!({
            "name": name,
            "location": location,
            "properties": {"accountType": account_type}
        });
        if let Some(ts) = created {
            value["properties"]["creationTime"] = json!(ts);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn failed_fetch_still_gets_classified() {
        let report = build_group_report(
            vec![group("NetworkWatcherRG"), group("my-rg")],
            vec![
                Err(FetchError::Worker("boom".into())),
                Ok(vec![]),
            ],
        );

        assert_eq!(report.rows.len(), 2);
        assert!(report.rows[0].classification.is_default);
        assert_eq!(report.rows[0].error.as_deref(), Some("worker task failed: boom"));
        assert!(report.rows[1].error.is_none());
    }

    #[test]
    fn oldest_ranking_puts_missing_timestamps_last() {
        let accounts = vec![
            sa("t3", "eastus", "Standard_LRS", Some("2022-03-01T00:00:00Z")),
            sa("none", "eastus", "Standard_LRS", None),
            sa("t1", "eastus", "Standard_LRS", Some("2020-01-01T00:00:00Z")),
            sa("t2", "eastus", "Standard_GRS", Some("2021-02-01T00:00:00Z")),
        ];
        let report = build_storage_report(accounts, Thresholds::default());

        let summary = &report.locations[0];
        let names: Vec<&str> = summary
            .oldest_standard_dns
            .iter()
            .map(|&i| report.rows[i].account.name.as_str())
            .collect();

        assert_eq!(names, vec!["t1", "t2", "t3", "none"]);
    }

    #[test]
    fn top_2_oldest_excludes_untimestamped_accounts() {
        let accounts = vec![
            sa("t3", "westus", "Standard_LRS", Some("2022-03-01T00:00:00Z")),
            sa("none", "westus", "Standard_LRS", None),
            sa("t1", "westus", "Standard_LRS", Some("2020-01-01T00:00:00Z")),
            sa("t2", "westus", "Standard_LRS", Some("2021-02-01T00:00:00Z")),
        ];
        let rows: Vec<AccountRow> = accounts
            .into_iter()
            .map(|account| AccountRow {
                created_time: account.effective_created_time(),
                account_type: account.display_account_type(),
                is_standard_dns: account.is_standard_dns(),
                account,
            })
            .collect();

        let top2 = oldest_n(&rows, vec![0, 1, 2, 3], 2);
        assert_eq!(rows[top2[0]].account.name, "t1");
        assert_eq!(rows[top2[1]].account.name, "t2");
    }

    #[test]
    fn location_tallies_and_thresholds() {
        let thresholds = Thresholds {
            region_warning: 3,
            region_limit: 4,
            dns_warning: 2,
            dns_critical: 3,
            dns_limit: 4,
        };

        let accounts = vec![
            sa("a", "eastus", "Standard_LRS", None),
            sa("b", "eastus", "Standard_GRS", None),
            sa("c", "eastus", "Premium_LRS", None),
            sa("d", "westus", "Standard_LRS", None),
        ];
        let report = build_storage_report(accounts, thresholds);

        assert_eq!(report.locations.len(), 2);
        let east = &report.locations[0];
        assert_eq!(east.location, "eastus");
        assert_eq!(east.total, 3);
        assert_eq!(east.by_account_type["Standard_LRS"], 1);
        assert_eq!(east.status, LimitStatus::Warning);
        assert_eq!(east.standard_dns_count, 2);
        assert_eq!(east.dns_status, LimitStatus::Warning);

        let west = &report.locations[1];
        assert_eq!(west.status, LimitStatus::Ok);
        assert_eq!(west.dns_status, LimitStatus::Ok);
    }

    #[test]
    fn at_limit_status_reported() {
        let thresholds = Thresholds {
            region_warning: 1,
            region_limit: 2,
            dns_warning: 1,
            dns_critical: 2,
            dns_limit: 3,
        };
        let accounts = vec![
            sa("a", "eastus", "Standard_LRS", None),
            sa("b", "eastus", "Standard_LRS", None),
        ];
        let report = build_storage_report(accounts, thresholds);
        assert_eq!(report.locations[0].status, LimitStatus::AtLimit);
        assert_eq!(report.locations[0].dns_status, LimitStatus::AtLimit);
    }
}
