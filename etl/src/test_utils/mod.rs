//! Helpers for tests that drive the pipelines against in-memory collaborators.

pub mod fixtures;
pub mod storage;
