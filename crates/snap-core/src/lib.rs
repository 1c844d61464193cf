//! # snap-core
//!
//! Core types shared by every docsnaps crate.
//!
//! - Entity structs for the company → service → document → language hierarchy,
//!   snapshot jobs, snapshots, and transform registrations
//! - Plugin module manifests and their validation
//! - Snapshot timestamps and content hashing
//! - CLI response types
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod manifest;
pub mod responses;
pub mod time;

pub use errors::CoreError;
pub use time::{SnapshotTime, content_hash};
