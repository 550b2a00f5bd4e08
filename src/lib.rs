pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod repositories;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::{HttpFetcher, LocalStorage};
pub use crate::config::HarvestConfig;
pub use crate::core::driver::{Driver, RepositoryOutcome, RunReport};
pub use crate::core::etl::{EtlEngine, HarvestSummary};
pub use crate::repositories::{plan_all, Plan, Repository};
pub use crate::utils::error::{HarvestError, Result};
