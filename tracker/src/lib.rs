//! GitHub organization milestone tracker and activity digests
//!
//! - [`aggregate`]: per-run issue buckets and detail entries
//! - [`report`]: markdown rendering of aggregated state
//! - [`db`] / [`store`]: SQLite event store synced from repository events
//! - [`digest`]: closed-issue and activity digests
//! - [`flows`]: the runs behind the `milestone-tracker`, `closed-digest`
//!   and `activity-digest` binaries

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod db;
pub mod digest;
pub mod flows;
pub mod init;
pub mod report;
pub mod store;

pub use config::TrackerConfig;
pub use init::init_tracing;
