//! Business logic and provider traits for Prefill.
//!
//! This crate defines the `LlmProvider` port that the infrastructure layer
//! implements, and the conversation loop that drives it. It depends only on
//! `prefill-types` -- never on `prefill-infra` or any network crate.

pub mod chat;
pub mod llm;
