// Library root: re-exports all modules so integration tests and the CLI
// can access the crate's public API.

pub mod advisor;
pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod names;
pub mod provider;
pub mod rules;
pub mod strategy;
pub mod valuation;
