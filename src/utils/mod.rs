//! Shared utility functions.
//!
//! - [`content_length`] - Size bookkeeping for ranged responses

pub mod content_length;

pub use content_length::{parse_content_length, remaining_length, total_size};
