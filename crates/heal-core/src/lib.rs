//! # heal-core
//!
//! Core types, ID generation, and error types for healgraph.
//!
//! This crate provides the foundational types shared across all healgraph crates:
//! - Entity structs for the event nodes (test runs, failures, healing actions)
//! - Enums for run results, node kinds, relationships, and healing sources
//! - ID prefix constants, sentinel values, and ID generation
//! - Request and response shapes for the knowledge graph and auto-heal contracts
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod requests;
pub mod responses;
