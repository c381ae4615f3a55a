//! Track catalog: the fixed, ordered list of tracks loaded once at startup.
//!
//! A catalog comes either from a TOML file of `[[track]]` tables or from a
//! scan of a music directory.

mod load;
mod model;
mod scan;

pub use model::*;
pub use scan::{UNKNOWN_FIELD, scan};

#[cfg(test)]
mod tests;
