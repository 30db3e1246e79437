//! # fireo-db
//!
//! Object-document mapping layer for fireo-rs. Provides the
//! [`Model`](model::Model) trait for declaring models, field descriptors
//! ([`FieldDef`](fields::FieldDef)) that mediate between instance attributes
//! and stored document fields, and [`Collection`](collection::Collection)
//! managers that persist instances through a
//! [`DocumentStore`](store::DocumentStore).
//!
//! ## Module Overview
//!
//! - [`model`] - The [`Model`](model::Model) trait and [`ModelMeta`](model::ModelMeta)
//! - [`fields`] - Field definitions and types
//! - [`instance`] - Per-object field state
//! - [`value`] - The store-agnostic [`Value`](value::Value) enum
//! - [`validators`] - Field validators
//! - [`document`] - Stored document representation
//! - [`store`] - The store trait and an in-memory store
//! - [`collection`] - Create, save, get, fetch, update, and delete

// These clippy lints are intentionally allowed for the ORM crate:
// - cast_precision_loss: i64-to-f64 casts are acceptable for validator comparisons
// - result_large_err: FireoError is the crate-wide error type
// - doc_markdown: backtick requirements for documentation items are too strict
// - needless_pass_by_value: field cleaning takes values by value to normalize them
// - return_self_not_must_use: builder pattern methods are self-documenting
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
// significant_drop_tightening: false positives with async RwLock guards
#![allow(clippy::significant_drop_tightening)]

pub mod collection;
pub mod document;
pub mod fields;
pub mod instance;
pub mod model;
pub mod store;
pub mod validators;
pub mod value;

pub use collection::Collection;
pub use document::Document;
pub use fields::{FieldDef, FieldType};
pub use instance::Instance;
pub use model::{Model, ModelMeta};
pub use store::{DocumentStore, InMemoryStore};
pub use value::Value;
