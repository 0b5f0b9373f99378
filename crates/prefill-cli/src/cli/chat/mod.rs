//! Interactive chat for Prefill.
//!
//! Each reply is steered by a prefix: a speaker label picked from the
//! roster, or a static prefix. Slash commands, the welcome banner, the
//! thinking spinner and markdown rendering live here; the conversation
//! state itself is owned by `prefill_core::chat::conversation`.
//! Entry point: `loop_runner::run_chat`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
