//! Repository modules implementing CRUD operations for all docsnaps entities.
//!
//! Each module exposes `pub(crate)` functions taking a `libsql::Connection`
//! so the loader can run them inside one transaction, and adds the public
//! read/write methods to `SnapService` via `impl SnapService` blocks.

pub mod company;
pub mod document;
pub mod job;
pub mod language;
pub mod service;
pub mod snapshot;
pub mod transform;
