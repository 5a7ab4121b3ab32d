// src/process/mod.rs
//! Pure stage functions. Each takes a dataset by value and returns a new one
//! together with a report of what it did.

pub mod filter;
pub mod join;
pub mod normalize;
pub mod project;
pub mod utils;

pub use filter::{filter_rows, FilterReport, FilterRules, Filtered};
pub use join::{inner_join, JoinReport, Joined};
pub use normalize::{canonical_key, normalize_dataset, normalize_row, NormalizeReport, Normalized};
pub use project::{project, ProjectReport, Projected};
