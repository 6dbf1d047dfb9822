//! Event entities of the knowledge graph.
//!
//! Test runs, failures and healing actions carry a generated ID and a
//! timestamp and are append-only. Reference nodes (elements, locators, test
//! cases, patches, prompts) are identified by their natural key alone, so
//! they are addressed as `(NodeKind, key)` pairs and have no struct here.

mod failure;
mod run;

pub use failure::{Failure, HealingAction};
pub use run::TestRun;
