//! Core library for the `hyperload` CLI.
//!
//! A fixed pool of virtual users issues HTTP requests against one target for
//! a bounded duration. Every outcome is classified and aggregated into
//! counts, latency statistics and a status-code distribution, shown live on
//! a terminal dashboard and summarised once the run ends.
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod load;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod ui;

mod app;
pub mod entry;
mod logger;
