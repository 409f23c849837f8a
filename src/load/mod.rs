//! Virtual users and the controller that runs them for a bounded duration.
mod controller;
mod throttle;
mod virtual_user;
mod window;


pub use controller::{
    INTERRUPT_REPORT_DELAY, LoadController, RunEnd, RunReport, TICK_INTERVAL, TickUpdate,
};
pub use throttle::{MAX_USER_RPS, THROTTLE_PAUSE};
pub use window::RunWindow;
