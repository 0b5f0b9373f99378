//! Reply prefix construction and stripping.
//!
//! A prefix is sent as a partial assistant turn; the service keeps it
//! verbatim and continues from it. The user is only shown what follows.

use prefill_types::config::ChatConfig;
use prefill_types::error::ChatError;

use super::picker::SpeakerPicker;

/// The prefix chosen for one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPrefix {
    /// Speaker the prefix was built from, when a roster is configured.
    pub speaker: Option<String>,
    pub text: String,
}

/// Prefix for a roleplay speaker: `"<name>: "`.
pub fn speaker_prefix(name: &str) -> String {
    format!("{name}: ")
}

/// Pick the prefix for the next reply.
///
/// With a roster, one speaker is picked through `picker`. Without one the
/// configured static prefix is used, or an empty prefix.
pub fn choose_prefix(config: &ChatConfig, picker: &mut dyn SpeakerPicker) -> ReplyPrefix {
    match &config.speakers {
        Some(roster) => {
            let index = picker.pick(roster.len());
            let name = roster
                .get(index)
                .or_else(|| roster.get(0))
                .unwrap_or_default()
                .to_string();
            ReplyPrefix {
                text: speaker_prefix(&name),
                speaker: Some(name),
            }
        }
        None => ReplyPrefix {
            speaker: None,
            text: config.static_prefix.clone().unwrap_or_default(),
        },
    }
}

/// The part of `full` the user should see: everything after `prefix`.
///
/// Fails with `ContractViolation` when `full` does not start with
/// `prefix`; callers then display `full` unchanged.
pub fn strip_reply<'a>(full: &'a str, prefix: &str) -> Result<&'a str, ChatError> {
    full.strip_prefix(prefix)
        .ok_or_else(|| ChatError::ContractViolation {
            prefix: prefix.to_string(),
            response: full.to_string(),
        })
}

/// Displayed text plus the violation, if any.
pub fn displayed_reply(full: &str, prefix: &str) -> (String, Option<ChatError>) {
    match strip_reply(full, prefix) {
        Ok(rest) => (rest.to_string(), None),
        Err(err) => (full.to_string(), Some(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefill_types::chat::SpeakerRoster;

    struct Always(usize);

    impl SpeakerPicker for Always {
        fn pick(&mut self, _n: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn test_speaker_prefix_format() {
        assert_eq!(speaker_prefix("Shakespeare"), "Shakespeare: ");
    }

    #[test]
    fn test_choose_prefix_uses_picked_speaker() {
        let roster = SpeakerRoster::new(["Hamlet", "Ophelia", "Yorick"]).unwrap();
        let config = ChatConfig::new("m", 10).with_speakers(roster);

        let prefix = choose_prefix(&config, &mut Always(1));
        assert_eq!(prefix.speaker.as_deref(), Some("Ophelia"));
        assert_eq!(prefix.text, "Ophelia: ");
    }

    #[test]
    fn test_choose_prefix_out_of_range_pick_falls_back_to_first() {
        let roster = SpeakerRoster::new(["Hamlet"]).unwrap();
        let config = ChatConfig::new("m", 10).with_speakers(roster);

        let prefix = choose_prefix(&config, &mut Always(9));
        assert_eq!(prefix.text, "Hamlet: ");
    }

    #[test]
    fn test_choose_prefix_static_and_empty() {
        let config = ChatConfig::new("m", 10).with_static_prefix("Bonjour");
        let prefix = choose_prefix(&config, &mut Always(0));
        assert_eq!(prefix.speaker, None);
        assert_eq!(prefix.text, "Bonjour");

        let config = ChatConfig::new("m", 10);
        assert_eq!(choose_prefix(&config, &mut Always(0)).text, "");
    }

    #[test]
    fn test_strip_reply_removes_prefix() {
        assert_eq!(
            strip_reply("Shakespeare: Good morrow!", "Shakespeare: ").unwrap(),
            "Good morrow!"
        );
        assert_eq!(strip_reply("anything", "").unwrap(), "anything");
    }

    #[test]
    fn test_strip_reply_shorter_than_prefix_is_violation() {
        let err = strip_reply("X", "X: ").unwrap_err();
        assert!(matches!(err, ChatError::ContractViolation { .. }));
    }

    #[test]
    fn test_displayed_reply_falls_back_to_full_text() {
        let (shown, err) = displayed_reply("Hello there", "X: ");
        assert_eq!(shown, "Hello there");
        match err {
            Some(ChatError::ContractViolation { prefix, response }) => {
                assert_eq!(prefix, "X: ");
                assert_eq!(response, "Hello there");
            }
            other => panic!("expected ContractViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_strip_reply_is_byte_exact_for_multibyte_prefix() {
        let full = "Éloïse: Ça va ?";
        assert_eq!(strip_reply(full, "Éloïse: ").unwrap(), "Ça va ?");
        // A prefix differing only in case is not a match.
        assert!(strip_reply(full, "éloïse: ").is_err());
    }
}
