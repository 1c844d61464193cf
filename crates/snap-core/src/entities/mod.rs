//! Entity structs for all docsnaps domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `snap-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema`.

mod company;
mod document;
mod job;
mod language;
mod service;
mod snapshot;
mod transform;

pub use company::Company;
pub use document::Document;
pub use job::{JobDetail, SnapshotJob};
pub use language::Language;
pub use service::Service;
pub use snapshot::{Snapshot, SnapshotSummary};
pub use transform::{Transform, TransformStep};
