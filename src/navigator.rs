//! Table navigation engine.
//!
//! - [`model`]: datasets, columns and the active view
//! - [`filter`]: fuzzy filtering of a dataset
//! - [`cursor`]: cursor plus sliding visible window
//! - [`cache`]: secret records and on-demand value resolution
//! - [`controller`]: the state machine tying them together

pub mod cache;
pub mod controller;
pub mod cursor;
pub mod filter;
pub mod model;

pub use controller::{Backends, Effect, Navigator, NavigatorOptions, SearchMode, Status, TableFrame};
