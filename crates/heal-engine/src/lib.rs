//! # heal-engine
//!
//! The auto-heal decision engine for healgraph.
//!
//! [`HealingEngine`] consults the knowledge graph for the element's most
//! frequent healing strategy. Without healing history it asks a
//! [`SuggestionSource`] for a fresh locator, reruns the test through a
//! [`RerunRunner`], and records the outcome back into the graph.
//!
//! Both collaborators are traits so the HTTP provider and the test command
//! can be swapped for deterministic fakes.

pub mod engine;
pub mod error;
pub mod rerun;
pub mod suggest;

pub use engine::HealingEngine;
pub use error::{EngineError, ErrorClass, RerunError, SuggestionError};
pub use rerun::{CommandRerun, FixedRerun, RandomRerun, RerunRunner};
pub use suggest::{
    OpenAiSuggester, StaticSuggester, Suggestion, SuggestionSource, UnconfiguredSuggester,
};
