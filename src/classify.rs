//! Resource name classification
//!
//! Recognizes the resource-group names that Azure services create on their
//! own, so operators can tell system-generated groups from their own. Pure
//! string matching against a fixed table; never fails, unknown names simply
//! come back unclassified.

use once_cell::sync::Lazy;
use regex::Regex;

/// Classification of a resource group name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationInfo {
    pub is_default: bool,
    pub created_by: &'static str,
    pub description: &'static str,
}

impl ClassificationInfo {
    const UNCLASSIFIED: Self = Self {
        is_default: false,
        created_by: "",
        description: "",
    };
}

struct KnownPattern {
    matcher: Regex,
    created_by: &'static str,
    description: &'static str,
}

/// Ordered table of recognized default-group patterns. First match wins:
/// some patterns are prefixes of others' domains, so order matters.
/// Compiled once at first use, not per call.
static KNOWN_PATTERNS: Lazy<Vec<KnownPattern>> = Lazy::new(|| {
    let entry = |pattern: &str, created_by, description| KnownPattern {
        matcher: Regex::new(pattern).expect("invalid built-in pattern"),
        created_by,
        description,
    };

    vec![
        entry(
            r"^defaultresourcegroup-",
            "Azure CLI / Cloud Shell / Visual Studio",
            "Common default resource group created for the region, used by Azure CLI, Cloud Shell, and Visual Studio for resource deployment",
        ),
        entry(
            r"^default-[a-z0-9]+(-[a-z0-9]+)*$",
            "Azure Services",
            "Default resource group created by Azure services for regional deployments",
        ),
        entry(
            r"^cloud-shell-storage-[a-z0-9]+$",
            "Azure Cloud Shell",
            "Default storage resource group created by Azure Cloud Shell for persistent storage",
        ),
        entry(
            r"^dynamicsdeployments$",
            "Microsoft Dynamics ERP",
            "Automatically created for Microsoft Dynamics ERP non-production instances",
        ),
        entry(
            r"^mc_.*_.*_.*$",
            "Azure Kubernetes Service (AKS)",
            "Created when deploying an AKS cluster, contains infrastructure resources for the cluster",
        ),
        entry(
            r"^azurebackuprg",
            "Azure Backup",
            "Created by Azure Backup service for backup operations",
        ),
        entry(
            r"^networkwatcherrg$",
            "Azure Network Watcher",
            "Created by Azure Network Watcher service for network monitoring",
        ),
        entry(
            r"^databricks-rg",
            "Azure Databricks",
            "Created by Azure Databricks service for managed workspace resources",
        ),
        entry(
            r"^microsoft-network$",
            "Microsoft Networking Services",
            "Used by Microsoft's networking services",
        ),
        entry(
            r"^loganalyticsdefaultresources$",
            "Azure Log Analytics",
            "Created by Azure Log Analytics service for default workspace resources",
        ),
    ]
});

/// Classify a resource group name. Total and deterministic: any string,
/// including empty or garbage input, yields a value.
pub fn classify(name: &str) -> ClassificationInfo {
    let lowered = name.to_lowercase();

    for pattern in KNOWN_PATTERNS.iter() {
        if pattern.matcher.is_match(&lowered) {
            return ClassificationInfo {
                is_default: true,
                created_by: pattern.created_by,
                description: pattern.description,
            };
        }
    }

    ClassificationInfo::UNCLASSIFIED
}
