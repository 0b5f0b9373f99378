//! Shared domain types for Prefill.
//!
//! This crate contains the types used across the workspace: completion
//! requests and responses, conversation turns and transcripts, speaker
//! rosters, configuration, and their error types.
//!
//! No I/O -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
