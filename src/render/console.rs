//! Console output
//!
//! Human-readable blocks and porcelain (tab-separated) rows for both
//! report types.

use super::created_time_cell;
use crate::aggregate::{AccountRow, GroupReport, GroupRow, LimitStatus, StorageReport};

// =============================================================================
// Resource groups
// =============================================================================

/// Print the resource-group report in human-readable form.
pub fn print_group_report(report: &GroupReport, list_resources: bool) {
    for row in &report.rows {
        print_group_row(row, list_resources);
    }
}

fn print_group_row(row: &GroupRow, list_resources: bool) {
    let group = &row.group;
    println!("Resource Group: {}", group.name);
    println!("  Location: {}", group.location);
    println!("  Provisioning State: {}", group.properties.provisioning_state);

    if row.classification.is_default {
        println!("  Default resource group detected");
        println!("  Created By: {}", row.classification.created_by);
        println!("  Description: {}", row.classification.description);
    }

    if let Some(err) = &row.error {
        println!("  Created Time: Error fetching ({err})");
    } else {
        println!(
            "  Created Time: {}",
            created_time_cell(row.created_time, None, "Not available")
        );
    }

    if list_resources {
        match &row.resources {
            Some(resources) if resources.is_empty() => {
                println!("  No resources found in this resource group");
            }
            Some(resources) => {
                println!("  Resources ({}):", resources.len());
                for resource in resources {
                    println!("    - {} ({})", resource.name, resource.resource_type);
                    println!(
                        "      Created: {}",
                        created_time_cell(resource.created_time, None, "Not available")
                    );
                }
            }
            None => {}
        }
    }

    println!();
}

/// Print the resource-group report as tab-separated rows with a header.
pub fn print_group_report_porcelain(report: &GroupReport) {
    println!("NAME\tLOCATION\tPROVISIONING_STATE\tCREATED_TIME\tIS_DEFAULT");
    for row in &report.rows {
        let created = if row.error.is_some() {
            "ERROR".to_string()
        } else {
            created_time_cell(row.created_time, None, "N/A")
        };
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.group.name,
            row.group.location,
            row.group.properties.provisioning_state,
            created,
            row.classification.is_default
        );
    }
}

// =============================================================================
// Storage accounts
// =============================================================================

/// Print the storage-account report: per-location summary, limit analysis,
/// then detailed per-account blocks.
pub fn print_storage_report(report: &StorageReport) {
    println!("=== STORAGE ACCOUNT SUMMARY BY LOCATION ===");
    for summary in &report.locations {
        println!("\nLocation: {}", summary.location);
        for (account_type, count) in &summary.by_account_type {
            println!("  {account_type}: {count} accounts");
        }
        println!("  Total: {} accounts", summary.total);

        match summary.status {
            LimitStatus::Warning => println!(
                "  WARNING: approaching limit of {} storage accounts per region",
                report.thresholds.region_limit
            ),
            LimitStatus::AtLimit => println!(
                "  ERROR: at limit of {} storage accounts per region",
                report.thresholds.region_limit
            ),
            LimitStatus::Ok => {}
        }
    }

    println!("\n=== STANDARD DNS ENDPOINT ANALYSIS ===");
    for summary in &report.locations {
        if summary.standard_dns_count == 0 {
            continue;
        }
        println!(
            "\nLocation: {} - Standard DNS accounts: {}",
            summary.location, summary.standard_dns_count
        );

        match summary.dns_status {
            LimitStatus::AtLimit => println!(
                "  CRITICAL: {} Standard DNS accounts (limit is {})",
                summary.standard_dns_count, report.thresholds.dns_limit
            ),
            LimitStatus::Warning => println!(
                "  WARNING: {} Standard DNS accounts (approaching limit of {})",
                summary.standard_dns_count, report.thresholds.dns_limit
            ),
            LimitStatus::Ok => {}
        }

        if !summary.oldest_standard_dns.is_empty() {
            println!("  Oldest Standard DNS accounts in this location:");
            for &index in &summary.oldest_standard_dns {
                let row = &report.rows[index];
                let created = row
                    .created_time
                    .map(|ts| ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "Not available".to_string());
                println!("    - {} (Created: {})", row.account.name, created);
            }
        }
    }

    println!("\n=== DETAILED STORAGE ACCOUNT INFORMATION ===");
    for row in &report.rows {
        let sa = &row.account;
        println!("\nStorage Account: {}", sa.name);
        println!("  Location: {}", sa.location);
        println!("  Account Type: {}", account_type_label(row));
        println!("  Provisioning State: {}", sa.properties.provisioning_state);
        println!(
            "  Created: {}",
            created_time_cell(row.created_time, None, "Not available")
        );

        let endpoints = &sa.properties.primary_endpoints;
        for (label, value) in [
            ("Blob Endpoint", &endpoints.blob),
            ("Queue Endpoint", &endpoints.queue),
            ("Table Endpoint", &endpoints.table),
            ("File Endpoint", &endpoints.file),
        ] {
            if !value.is_empty() {
                println!("  {label}: {value}");
            }
        }
    }

    println!("\n=== RECOMMENDATIONS ===");
    for line in storage_recommendations(report) {
        println!("{line}");
    }
}

/// Account type with an `(inferred)` marker when the type was guessed
/// rather than returned by ARM. Human output only; porcelain and CSV carry
/// the bare type.
fn account_type_label(row: &AccountRow) -> String {
    if row.account.account_type_inferred() {
        format!("{} (inferred)", row.account_type)
    } else {
        row.account_type.clone()
    }
}

/// Cleanup advice for locations whose tallies crossed a threshold. Returned
/// as lines so the trigger logic is testable apart from stdout.
fn storage_recommendations(report: &StorageReport) -> Vec<String> {
    let mut lines = Vec::new();

    for summary in &report.locations {
        if summary.status == LimitStatus::Ok {
            continue;
        }
        lines.push(format!(
            "Location {} has {} storage accounts:",
            summary.location, summary.total
        ));
        lines.push("  - Consider deleting unused storage accounts".to_string());
        lines.push("  - Review storage accounts created by default services".to_string());
        lines.push("  - Consider using different regions for new storage accounts".to_string());
    }

    for summary in &report.locations {
        if summary.dns_status == LimitStatus::Ok {
            continue;
        }
        lines.push(String::new());
        lines.push(format!(
            "For Standard DNS endpoint issue in {} ({} accounts):",
            summary.location, summary.standard_dns_count
        ));
        lines.push(
            "  - Focus on deleting Standard DNS accounts (Standard_LRS, Standard_GRS, etc.)"
                .to_string(),
        );
        lines.push(
            "  - Check for storage accounts created by Azure services (Cloud Shell, etc.)"
                .to_string(),
        );
        lines.push("  - Consider migrating data to Premium storage accounts if possible".to_string());
        lines.push("  - Use different regions for new Standard DNS storage accounts".to_string());
    }

    lines
}

/// Print the storage-account report as tab-separated rows with a header.
pub fn print_storage_report_porcelain(report: &StorageReport) {
    println!("NAME\tLOCATION\tACCOUNT_TYPE\tPROVISIONING_STATE\tCREATED_TIME");
    for row in &report.rows {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.account.name,
            row.account.location,
            row.account_type,
            row.account.properties.provisioning_state,
            created_time_cell(row.created_time, None, "N/A")
        );
    }
}
