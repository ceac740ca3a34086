//! community-sync: binary-side glue for the community synchronisation run.
//!
//! All decision logic lives in [`community-sync-core`]; this crate adds the
//! concrete HTTP clients (record store, publishing CMS, spreadsheet), YAML
//! config loading with env-injected secrets, and the CLI entrypoint.
//!
//! [`community-sync-core`]: ../../community-sync-core/

pub mod cli;
pub mod error;
pub mod load_config;
pub mod publishing;
pub mod record_store;
pub mod sheets;
