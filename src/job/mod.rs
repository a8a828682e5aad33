//! Sync job
//!
//! Converts every discovered profile into the in-memory printer documents and
//! hands the serialized result to a storage client.

mod pipeline;
mod run;
pub mod storage;
mod upload;

pub use pipeline::{Converted, Documents, Pipeline, RunSummary};
pub use run::{RunError, run};
pub use upload::{JobError, upload};
