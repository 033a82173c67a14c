//! Trailing-window selection over a source's snapshot history.

mod window;

pub use window::select_trailing_window;
