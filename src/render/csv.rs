//! CSV file output
//!
//! Writes the aggregated reports as CSV with RFC 4180 quoting. Columns
//! mirror the console output plus the classification metadata, and failed
//! rows carry their error inline instead of being dropped.

use super::created_time_cell;
use crate::aggregate::{GroupReport, StorageReport};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

const GROUP_HEADER: [&str; 8] = [
    "ResourceGroupName",
    "Location",
    "ProvisioningState",
    "CreatedTime",
    "IsDefault",
    "CreatedBy",
    "Description",
    "Resources",
];

const STORAGE_HEADER: [&str; 10] = [
    "StorageAccountName",
    "Location",
    "AccountType",
    "ProvisioningState",
    "CreatedTime",
    "ResourceGroup",
    "BlobEndpoint",
    "QueueEndpoint",
    "TableEndpoint",
    "FileEndpoint",
];

/// Quote a field when it contains a comma, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row(out: &mut String, fields: &[String]) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        out.push_str(&escape(field));
        first = false;
    }
    out.push('\n');
}

fn render_group_rows(report: &GroupReport, list_resources: bool) -> String {
    let mut out = String::new();
    write_row(&mut out, &GROUP_HEADER.map(String::from));

    for row in &report.rows {
        let resources = match (&row.resources, list_resources) {
            (Some(resources), true) => {
                let mut joined = String::new();
                for (i, resource) in resources.iter().enumerate() {
                    if i > 0 {
                        joined.push_str("; ");
                    }
                    let _ = write!(
                        joined,
                        "{} ({}) - Created: {}",
                        resource.name,
                        resource.resource_type,
                        created_time_cell(resource.created_time, None, "Not available")
                    );
                }
                joined
            }
            _ => String::new(),
        };

        write_row(
            &mut out,
            &[
                row.group.name.clone(),
                row.group.location.clone(),
                row.group.properties.provisioning_state.clone(),
                created_time_cell(row.created_time, row.error.as_deref(), "Not available"),
                row.classification.is_default.to_string(),
                row.classification.created_by.to_string(),
                row.classification.description.to_string(),
                resources,
            ],
        );
    }

    out
}

fn render_storage_rows(report: &StorageReport) -> String {
    let mut out = String::new();
    write_row(&mut out, &STORAGE_HEADER.map(String::from));

    for row in &report.rows {
        let endpoints = &row.account.properties.primary_endpoints;
        write_row(
            &mut out,
            &[
                row.account.name.clone(),
                row.account.location.clone(),
                row.account_type.clone(),
                row.account.properties.provisioning_state.clone(),
                created_time_cell(row.created_time, None, "Not available"),
                row.account.resource_group(),
                endpoints.blob.clone(),
                endpoints.queue.clone(),
                endpoints.table.clone(),
                endpoints.file.clone(),
            ],
        );
    }

    out
}

/// Write the resource-group report to a CSV file.
pub fn write_group_csv(report: &GroupReport, list_resources: bool, path: &Path) -> Result<()> {
    std::fs::write(path, render_group_rows(report, list_resources))
        .with_context(|| format!("failed to write CSV file {}", path.display()))
}

/// Write the storage-account report to a CSV file.
pub fn write_storage_csv(report: &StorageReport, path: &Path) -> Result<()> {
    std::fs::write(path, render_storage_rows(report))
        .with_context(|| format!("failed to write CSV file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{build_group_report, build_storage_report, Thresholds};
    use crate::azure::http::FetchError;
    use serde_json::json;

    #[test]
    fn escape_quotes_fields_with_separators() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn group_csv_renders_errors_inline() {
        let groups = vec![
            serde_json::from_value(json!({"name": "rg-ok", "location": "eastus"})).unwrap(),
            serde_json::from_value(json!({"name": "rg-bad", "location": "westus"})).unwrap(),
        ];
        let report = build_group_report(
            groups,
            vec![Ok(vec![]), Err(FetchError::Worker("down".into()))],
        );

        let csv = render_group_rows(&report, false);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ResourceGroupName,"));
        assert!(lines[1].contains("rg-ok"));
        assert!(lines[1].contains("Not available"));
        assert!(lines[2].contains("Error: worker task failed: down"));
    }

    #[test]
    fn storage_csv_has_one_row_per_account() {
        let accounts = vec![
            serde_json::from_value(json!({
                "name": "sa1",
                "location": "eastus",
                "id": "/subscriptions/s/resourceGroups/rg1/providers/Microsoft.Storage/storageAccounts/sa1",
                "properties": {"accountType": "Standard_LRS",
                               "primaryEndpoints": {"blob": "https://sa1.blob.core.windows.net/"}}
            }))
            .unwrap(),
        ];
        let report = build_storage_report(accounts, Thresholds::default());

        let csv = render_storage_rows(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("sa1,eastus,Standard_LRS"));
        assert!(lines[1].contains("rg1"));
        assert!(lines[1].contains("https://sa1.blob.core.windows.net/"));
    }
}
