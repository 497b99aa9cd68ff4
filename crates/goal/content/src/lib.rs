//! Data-driven goal content and loaders.
//!
//! This crate houses the builtin goal catalog and loaders for data files:
//! - Goal type catalogs (RON)
//! - Behavior loadouts per actor kind (RON)
//! - Executor configuration (TOML)
//!
//! All loaders deserialize goal-core types directly through its `serde` feature.

pub mod types;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, LoadResult, LoadoutLoader, LoadoutTable,
    builtin_catalog,
};
