//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and are handled locally; they are never sent to
//! the completion service or recorded in the transcript. The bare word
//! `quit` is not a command but the loop's own stop sentinel.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Show the transcript so far, prefixes included.
    History,
    /// Show the speaker roster or static prefix in use.
    Speakers,
    /// Forget the transcript and clear the screen.
    Clear,
    /// End the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/history" | "/hist" => Some(ChatCommand::History),
        "/speakers" | "/who" => Some(ChatCommand::Speakers),
        "/clear" | "/reset" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/history", "Show the conversation so far"),
        ("/speakers", "Show who is talking"),
        ("/clear", "Forget the conversation and start over"),
        ("/exit", "End the chat session"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, about) in rows {
        println!("  {} {}", style(format!("{name:<10}")).cyan(), about);
    }
    println!();
    println!(
        "  {}",
        style("Type quit or press Ctrl+D to exit").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_history_and_speakers() {
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("  /HISTORY  "), Some(ChatCommand::History));
        assert_eq!(parse("/speakers"), Some(ChatCommand::Speakers));
        assert_eq!(parse("/who"), Some(ChatCommand::Speakers));
    }

    #[test]
    fn test_parse_clear_ignores_arguments() {
        assert_eq!(parse("/clear now"), Some(ChatCommand::Clear));
        assert_eq!(parse("/reset"), Some(ChatCommand::Clear));
    }

    #[test]
    fn test_sentinel_is_not_a_command() {
        assert_eq!(parse("quit"), None);
        assert_eq!(parse("hello world"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("/foo".to_string()))
        );
    }
}
