//! OpenTelemetry GenAI Semantic Convention attribute values.
//!
//! Span field names must be literal in `tracing` macros, so only the
//! values live here. Span naming convention: `"{operation} {model}"`
//! (e.g., `"chat claude-sonnet-4-20250514"`).

// --- Operation name values ---

/// Interactive prefixed chat session.
pub const OP_CHAT: &str = "chat";

/// One-shot prefixed completion.
pub const OP_ASK: &str = "ask";

/// Span name for an operation against a model.
pub fn span_name(operation: &str, model: &str) -> String {
    format!("{operation} {model}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_name() {
        assert_eq!(span_name(OP_CHAT, "claude-sonnet-4-20250514"), "chat claude-sonnet-4-20250514");
    }
}
