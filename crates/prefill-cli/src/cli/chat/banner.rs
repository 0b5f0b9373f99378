//! Welcome banner for chat sessions.

use console::style;

use prefill_types::config::ChatConfig;

/// Who is answering: the roster, the static prefix, or nobody in particular.
pub fn voice_summary(config: &ChatConfig) -> String {
    match (&config.speakers, config.static_prefix.as_deref()) {
        (Some(roster), _) => format!("Speakers: {}", roster.names().join(", ")),
        (None, Some(prefix)) if !prefix.is_empty() => format!("Replies start with {prefix:?}"),
        _ => "No reply prefix".to_string(),
    }
}

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(config: &ChatConfig, provider: &str, session_id: &str) {
    println!();
    println!("  * {}", style("prefill chat").cyan().bold());
    println!("  {}", style(voice_summary(config)).dim());
    println!();
    println!(
        "  {}    {} {}",
        style("Model:").bold(),
        style(&config.model).dim(),
        style(format!("({provider})")).dim()
    );
    if let Some(system) = &config.system_instruction {
        println!("  {}   {}", style("System:").bold(), style(system).dim());
    }
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, quit or Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefill_types::chat::SpeakerRoster;

    #[test]
    fn test_voice_summary() {
        let base = ChatConfig::new("m", 10);
        assert_eq!(voice_summary(&base), "No reply prefix");

        let prefixed = base.clone().with_static_prefix("Bonjour");
        assert_eq!(voice_summary(&prefixed), "Replies start with \"Bonjour\"");

        let roster = base.with_speakers(SpeakerRoster::new(["Hamlet", "Ophelia"]).unwrap());
        assert_eq!(voice_summary(&roster), "Speakers: Hamlet, Ophelia");
    }
}
