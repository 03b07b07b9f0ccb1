//! Azure Resource Manager interaction module
//!
//! This module provides the core functionality for talking to the ARM REST
//! API: the bearer-token client, the rate-limit-aware HTTP layer, and the
//! typed models for the resources we inventory.
//!
//! # Module Structure
//!
//! - [`client`] - Main ARM client and URL builders
//! - [`http`] - HTTP layer with 429 backoff/retry
//! - [`resource_groups`] - Resource group listing and per-group detail
//! - [`storage`] - Storage account listing and quota helpers

pub mod client;
pub mod http;
pub mod resource_groups;
pub mod storage;
