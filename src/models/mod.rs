//! Data models for the advising API.
//!
//! Field names follow the backend's camelCase JSON; unknown fields are kept so
//! that merges and round trips do not lose data.

mod curated_group;
mod lookup;
mod note;

pub use curated_group::*;
pub use lookup::*;
pub use note::*;
