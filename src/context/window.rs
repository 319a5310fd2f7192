//! Conversation window manager.
//!
//! Selects the bounded suffix of the conversation history that is sent
//! upstream and maps caller roles onto the provider's role vocabulary.

use crate::llm::types::ChatMessage;

use super::prompt::SYSTEM_PREAMBLE;

/// Number of trailing history turns included in the window, not
/// counting the preamble.
pub const HISTORY_WINDOW: usize = 5;

/// The windowed conversation: the fixed preamble followed by at most
/// [`HISTORY_WINDOW`] of the most recent turns, in original order.
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    messages: Vec<ChatMessage>,
}

impl ConversationWindow {
    /// Builds the window from the full ordered history.
    ///
    /// Never fails and never mutates the input. Content is passed
    /// through unmodified; only roles are rewritten.
    pub fn from_history(history: &[ChatMessage]) -> Self {
        let start = history.len().saturating_sub(HISTORY_WINDOW);

        let mut messages = Vec::with_capacity(history.len() - start + 1);
        messages.push(ChatMessage::new("user", SYSTEM_PREAMBLE));
        for msg in &history[start..] {
            messages.push(ChatMessage::new(provider_role(&msg.role), &msg.content));
        }

        Self { messages }
    }

    /// Preamble-first message sequence, roles already mapped.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Number of history turns in the window (preamble excluded).
    pub fn history_len(&self) -> usize {
        self.messages.len() - 1
    }

    /// Whitespace word count across the preamble and every windowed
    /// turn. Used as the input-token approximation.
    pub fn word_count(&self) -> usize {
        self.messages
            .iter()
            .map(|msg| msg.content.split_whitespace().count())
            .sum()
    }
}

/// Maps a caller role onto the provider vocabulary: `user` stays
/// `user`, every other role speaks for the model.
fn provider_role(role: &str) -> &'static str {
    if role == "user" {
        "user"
    } else {
        "model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> ChatMessage {
        ChatMessage::new(role, content)
    }

    fn history(len: usize) -> Vec<ChatMessage> {
        (1..=len)
            .map(|i| {
                let role = if i % 2 == 1 { "user" } else { "assistant" };
                turn(role, &format!("turn {}", i))
            })
            .collect()
    }

    #[test]
    fn short_history_is_kept_whole() {
        for len in 1..=HISTORY_WINDOW {
            let window = ConversationWindow::from_history(&history(len));
            assert_eq!(window.messages().len(), len + 1);
            assert_eq!(window.history_len(), len);
            for (i, msg) in window.messages().iter().skip(1).enumerate() {
                assert_eq!(msg.content, format!("turn {}", i + 1));
            }
        }
    }

    #[test]
    fn long_history_keeps_only_the_last_five_turns() {
        let window = ConversationWindow::from_history(&history(7));
        assert_eq!(window.messages().len(), HISTORY_WINDOW + 1);

        // turns 3..=7 survive, in order; turns 1 and 2 never appear
        let contents: Vec<&str> = window
            .messages()
            .iter()
            .skip(1)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["turn 3", "turn 4", "turn 5", "turn 6", "turn 7"]
        );
        assert!(!window
            .messages()
            .iter()
            .any(|m| m.content == "turn 1" || m.content == "turn 2"));
    }

    #[test]
    fn preamble_is_always_first_and_uncounted() {
        let window = ConversationWindow::from_history(&history(12));
        assert_eq!(window.messages()[0].role, "user");
        assert!(window.messages()[0].content.starts_with("You are the Retira"));
        assert_eq!(window.history_len(), HISTORY_WINDOW);
    }

    #[test]
    fn non_user_roles_map_to_model() {
        let input = vec![
            turn("user", "a"),
            turn("assistant", "b"),
            turn("system", "c"),
        ];
        let window = ConversationWindow::from_history(&input);
        let roles: Vec<&str> = window
            .messages()
            .iter()
            .skip(1)
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, vec!["user", "model", "model"]);
    }

    #[test]
    fn word_count_covers_preamble_and_windowed_turns() {
        let input = vec![turn("user", "one two three")];
        let window = ConversationWindow::from_history(&input);
        let preamble_words = SYSTEM_PREAMBLE.split_whitespace().count();
        assert_eq!(window.word_count(), preamble_words + 3);
    }

    #[test]
    fn oversized_content_is_not_truncated() {
        let long = "word ".repeat(50_000);
        let input = vec![turn("user", &long)];
        let window = ConversationWindow::from_history(&input);
        assert_eq!(window.messages()[1].content.len(), long.len());
    }
}
