//! azinv - Azure inventory CLI
//!
//! Fetches all resource groups (or storage accounts) in a subscription and
//! their creation times from the ARM API, fanning the per-entity detail
//! fetches out through a bounded worker pool that tolerates individual
//! failures and preserves input order.
//!
//! # Module Structure
//!
//! - [`azure`] - ARM client, rate-limit-aware HTTP, typed models
//! - [`pool`] - Bounded-concurrency fan-out with index-stable results
//! - [`classify`] - System-generated resource group name recognition
//! - [`aggregate`] - Tallies, limit analysis, oldest-N ranking
//! - [`render`] - Console, porcelain, and CSV output
//! - [`config`] - Flag/env resolution into one immutable value
//! - [`spinner`] - Stderr progress indicator

pub mod aggregate;
pub mod azure;
pub mod classify;
pub mod config;
pub mod pool;
pub mod render;
pub mod spinner;
