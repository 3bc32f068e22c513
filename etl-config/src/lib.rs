//! Configuration for the snapshot ETL pipeline.
//!
//! Provides the runtime [`environment::Environment`], hierarchical configuration loading through
//! [`load_config`], and the shared configuration types consumed by the `etl` crate and the
//! `etl-runner` binary.

pub mod environment;
mod load;
pub mod shared;

pub use load::{Config, LoadConfigError, load_config, load_config_from};
