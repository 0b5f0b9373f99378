//! Terminal rendering of replies.
//!
//! `ChatRenderer` renders prose through `termimad` and fenced code blocks
//! through `syntect`. Speaker labels get a stable color per roster slot.

use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use prefill_types::llm::StopReason;

/// Label colors, assigned to speakers by roster position.
const SPEAKER_COLORS: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Green,
];

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new(accent_color: Option<Color>) -> Self {
        let mut skin = MadSkin::default_dark();

        if let Some(color) = accent_color {
            let tc = to_termimad_color(color);
            skin.bold.set_fg(tc);
            skin.headers[0].set_fg(tc);
            skin.headers[1].set_fg(tc);
        }
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a reply as markdown with highlighted code fences.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut code_lang: Option<String> = None;
        let mut code_buf = String::new();

        for line in markdown.lines() {
            match (&code_lang, line.starts_with("```")) {
                (None, true) => {
                    code_lang = Some(line.trim_start_matches('`').trim().to_string());
                    code_buf.clear();
                }
                (Some(lang), true) => {
                    output.push_str(&self.highlight_code(&code_buf, lang));
                    output.push('\n');
                    code_lang = None;
                }
                (Some(_), false) => {
                    code_buf.push_str(line);
                    code_buf.push('\n');
                }
                (None, false) => {
                    output.push_str(&self.skin.term_text(line).to_string());
                }
            }
        }

        // Unclosed fence at the end of a truncated reply
        if let Some(lang) = &code_lang {
            if !code_buf.is_empty() {
                output.push_str(&self.highlight_code(&code_buf, lang));
            }
        }

        output
    }

    /// Print a reply under its speaker label.
    ///
    /// `slot` is the speaker's roster position and picks the label color.
    pub fn print_reply(&self, label: &str, slot: usize, body: &str) {
        let color = speaker_color(slot);
        println!();
        println!("  {}", console::style(label).fg(to_console_color(color)).bold());
        println!("  {}", self.render_final(body).trim());
    }

    /// Print the stats footer after a reply.
    ///
    /// Format: "| {tokens} tokens . {time}s . {model}", with a truncation
    /// marker when the reply hit the token limit.
    pub fn print_stats_footer(
        &self,
        tokens: u32,
        response_ms: u64,
        model: &str,
        stop_reason: StopReason,
    ) {
        let seconds = response_ms as f64 / 1000.0;
        let dot = console::style("\u{00b7}").dim();
        let mut footer = format!(
            "\n  {} {} tokens {dot} {:.1}s {dot} {}",
            console::style("|").dim(),
            console::style(tokens).dim(),
            console::style(seconds).dim(),
            console::style(model).dim(),
        );
        if stop_reason == StopReason::MaxTokens {
            footer.push_str(&format!(" {dot} {}", console::style("truncated").yellow()));
        }
        println!("{footer}");
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!("  {}\n", console::style(format!("--- {lang} ---")).dim()));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

/// Label color for the speaker at roster position `slot`.
pub fn speaker_color(slot: usize) -> Color {
    SPEAKER_COLORS[slot % SPEAKER_COLORS.len()]
}

fn to_termimad_color(color: Color) -> termimad::crossterm::style::Color {
    match color {
        Color::Cyan => termimad::crossterm::style::Color::Cyan,
        Color::Green => termimad::crossterm::style::Color::Green,
        Color::Yellow => termimad::crossterm::style::Color::Yellow,
        Color::Magenta => termimad::crossterm::style::Color::Magenta,
        Color::Blue => termimad::crossterm::style::Color::Blue,
        Color::Red => termimad::crossterm::style::Color::Red,
        Color::Rgb { r, g, b } => termimad::crossterm::style::Color::Rgb { r, g, b },
        _ => termimad::crossterm::style::Color::Cyan,
    }
}

fn to_console_color(color: Color) -> console::Color {
    match color {
        Color::Magenta => console::Color::Magenta,
        Color::Yellow => console::Color::Yellow,
        Color::Blue => console::Color::Blue,
        Color::Green => console::Color::Green,
        Color::Red => console::Color::Red,
        _ => console::Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_colors_cycle() {
        assert_eq!(speaker_color(0), Color::Cyan);
        assert_eq!(speaker_color(1), Color::Magenta);
        assert_eq!(speaker_color(5), Color::Cyan);
    }

    #[test]
    fn test_render_final_strips_code_fences() {
        let renderer = ChatRenderer::new(Some(Color::Cyan));
        let out = renderer.render_final("Here:\n```rust\nfn main() {}\n```\nDone.");
        assert!(!out.contains("```"));
        assert!(out.contains("--- rust ---"));
        assert!(out.contains("main"));
    }

    #[test]
    fn test_render_final_handles_unclosed_fence() {
        let renderer = ChatRenderer::new(None);
        let out = renderer.render_final("```\nlet x = 1;");
        assert!(out.contains("let x"));
    }
}
