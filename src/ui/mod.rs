//! Terminal dashboard fed by controller ticks.
pub mod model;
pub mod render;


pub(crate) use render::formatting::{format_millis, format_x100};
