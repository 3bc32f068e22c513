//! Postgres access for snapshot extraction.
//!
//! Connection setup lives in [`client`], table naming in [`types`] and the two extraction
//! queries in [`queries`].

pub mod client;
pub mod queries;
pub mod types;
