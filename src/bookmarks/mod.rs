//! Bookmark file model: parsing, timestamps and sort order.

pub mod model;
pub mod sort;
pub mod timestamp;
