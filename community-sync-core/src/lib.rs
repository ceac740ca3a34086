#![doc = "community-sync-core: core logic library for community-sync."]

//! This crate contains all decision logic and data models for community-sync:
//! the status classifier, the publishing reconciler, the report builder and
//! the contracts the transport crates implement. No HTTP, no filesystem and
//! no secrets live here.
//!
//! # Usage
//! Add this as a dependency for all classification, reconciliation, report
//! and orchestration code. Concrete clients (record store, CMS, spreadsheet)
//! belong in the binary crate.

pub mod classify;
pub mod config;
pub mod contract;
pub mod reconcile;
pub mod report;
pub mod synchronise;
