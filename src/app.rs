//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, the
//! search prompt and the open filter dropdown.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
