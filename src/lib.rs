//! Search NIH RePORTER and NSF Awards for active grants held by a principal
//! investigator at a set of institutions, and render them as text reports.

pub mod apis;
pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod error;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod types;

pub use error::{AwardError, Result};
pub use types::{AwardRecord, Registry, SearchCriteria};
