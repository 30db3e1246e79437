//! Utility functions for fireo-rs.
//!
//! - [`text`]: Collection naming and document key helpers.

pub mod text;

pub use text::{collection_name, document_key, is_valid_id, ref_path, split_key};
