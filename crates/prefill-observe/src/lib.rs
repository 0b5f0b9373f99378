//! Observability for Prefill: tracing subscriber setup and the GenAI
//! span attribute vocabulary.

pub mod genai_attrs;
pub mod tracing_setup;
