//! Data models for recorded shell history.
//!
//! - [`HistoryEntry`] - A stored command with its execution context
//! - [`NewEntry`] - An insertion candidate before the store assigns an id
//! - [`DedupKey`] - The exact-match key used by the duplicate guard

pub mod history;

pub use history::{DedupKey, HistoryEntry, NewEntry};
