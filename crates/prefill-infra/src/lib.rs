//! Infrastructure layer for Prefill.
//!
//! Contains the implementations of the ports defined in `prefill-core`:
//! the Anthropic Messages API provider and the `config.toml` loader.

pub mod config;
pub mod llm;
