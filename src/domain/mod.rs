//! Validated run parameters shared by the executor and the controller.
mod run;

pub use run::{GRACE_PERIOD_EXTRA, RunConfig};
