//! Wires a validated run into the controller, the display and the report.
mod banner;
mod progress;
mod report;
mod runner;


pub(crate) use runner::{RunOptions, run_load};
