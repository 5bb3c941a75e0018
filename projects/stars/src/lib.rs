//! GitHub organization star history
//! 
//! - Flat-file star-date cache in `cache/`
//! - Incremental stargazer fetch-and-cache in `sync/`
//! - Date-axis aggregation and SVG charts in `utils/`
//! - HTTP form and chart endpoints in `endpoints/`
//! - Requires GITHUB_TOKEN env var for API access

pub mod app;
pub mod cache;
pub mod config;
pub mod endpoints;
pub mod sync;
pub mod utils;
