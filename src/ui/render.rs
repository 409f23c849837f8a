mod dashboard;
pub(crate) mod formatting;
mod frame;
mod lifecycle;
mod progress;
pub(crate) mod theme;

pub use dashboard::{Ui, UiActions};
pub use lifecycle::setup_render_ui;
