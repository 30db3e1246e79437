//! Field descriptors.
//!
//! This module provides the [`FieldDef`] struct and [`FieldType`] enum that
//! describe model fields: their storage key, default, required flag,
//! validators, and the value shape each variant accepts.

pub mod types;

pub use types::{FieldDef, FieldType, MetaFn};
