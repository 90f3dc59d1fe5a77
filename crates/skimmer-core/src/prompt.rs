//! Summary styles and chat message construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ChatMessage;

/// System message sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are an expert assistant that reads and summarizes documents.";

/// The selectable summary styles.
///
/// The set is closed: every style maps to exactly one instruction string,
/// and there is no free-form instruction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    Brief,
    Bullets,
    ActionItems,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 3] = [
        SummaryStyle::Brief,
        SummaryStyle::Bullets,
        SummaryStyle::ActionItems,
    ];

    /// Instruction line placed at the top of the user message.
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => "Summarize this document briefly:",
            SummaryStyle::Bullets => "Summarize the document in bullet points:",
            SummaryStyle::ActionItems => "List all key action items from this document:",
        }
    }

    /// Human-readable label shown in selection UIs.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => "Brief Summary",
            SummaryStyle::Bullets => "Bullet Points",
            SummaryStyle::ActionItems => "Extract Action Items",
        }
    }

    /// Short token used on the command line and in form values.
    pub fn token(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => "brief",
            SummaryStyle::Bullets => "bullets",
            SummaryStyle::ActionItems => "actions",
        }
    }
}

impl std::fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone)]
#[error("unknown summary style {0:?} (expected brief, bullets, or actions)")]
pub struct ParseStyleError(String);

impl std::str::FromStr for SummaryStyle {
    type Err = ParseStyleError;

    /// Accepts the short token or the UI label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" | "brief summary" => Ok(SummaryStyle::Brief),
            "bullets" | "bullet points" => Ok(SummaryStyle::Bullets),
            "actions" | "action items" | "extract action items" => Ok(SummaryStyle::ActionItems),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

/// Build the user message: the style instruction, a blank line, then the
/// document text verbatim.
pub fn build_user_message(style: SummaryStyle, text: &str) -> String {
    format!("{}\n\n{}", style.instruction(), text)
}

/// Build the two-message conversation for a summarization request.
pub fn build_messages(style: SummaryStyle, text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_message(style, text)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // ── style mapping ──────────────────────────────────────────────────

    #[test]
    fn brief_instruction() {
        assert_eq!(
            SummaryStyle::Brief.instruction(),
            "Summarize this document briefly:"
        );
    }

    #[test]
    fn bullets_instruction() {
        assert_eq!(
            SummaryStyle::Bullets.instruction(),
            "Summarize the document in bullet points:"
        );
    }

    #[test]
    fn action_items_instruction() {
        assert_eq!(
            SummaryStyle::ActionItems.instruction(),
            "List all key action items from this document:"
        );
    }

    #[test]
    fn labels_match_ui_names() {
        assert_eq!(SummaryStyle::Brief.label(), "Brief Summary");
        assert_eq!(SummaryStyle::Bullets.label(), "Bullet Points");
        assert_eq!(SummaryStyle::ActionItems.label(), "Extract Action Items");
    }

    #[test]
    fn every_style_has_a_distinct_instruction() {
        let instructions: Vec<&str> = SummaryStyle::ALL.iter().map(|s| s.instruction()).collect();
        for (i, a) in instructions.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &instructions[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    // ── parsing ────────────────────────────────────────────────────────

    #[test]
    fn parses_short_tokens() {
        assert_eq!(SummaryStyle::from_str("brief").unwrap(), SummaryStyle::Brief);
        assert_eq!(
            SummaryStyle::from_str("bullets").unwrap(),
            SummaryStyle::Bullets
        );
        assert_eq!(
            SummaryStyle::from_str("actions").unwrap(),
            SummaryStyle::ActionItems
        );
    }

    #[test]
    fn parses_ui_labels_case_insensitively() {
        assert_eq!(
            SummaryStyle::from_str("Brief Summary").unwrap(),
            SummaryStyle::Brief
        );
        assert_eq!(
            SummaryStyle::from_str("BULLET POINTS").unwrap(),
            SummaryStyle::Bullets
        );
        assert_eq!(
            SummaryStyle::from_str("Extract Action Items").unwrap(),
            SummaryStyle::ActionItems
        );
    }

    #[test]
    fn tokens_round_trip() {
        for style in SummaryStyle::ALL {
            assert_eq!(SummaryStyle::from_str(style.token()).unwrap(), style);
        }
    }

    #[test]
    fn rejects_unknown_style() {
        let err = SummaryStyle::from_str("haiku").unwrap_err();
        assert!(err.to_string().contains("haiku"));
    }

    // ── message construction ───────────────────────────────────────────

    #[test]
    fn user_message_is_instruction_blank_line_text() {
        let message = build_user_message(SummaryStyle::Brief, "Hello world.\nSecond page.");
        assert_eq!(
            message,
            "Summarize this document briefly:\n\nHello world.\nSecond page."
        );
    }

    #[test]
    fn user_message_keeps_text_verbatim() {
        let text = "  spaced\n\n\nodd   text\t";
        let message = build_user_message(SummaryStyle::Bullets, text);
        assert!(message.ends_with(text));
    }

    #[test]
    fn conversation_is_system_then_user() {
        let messages = build_messages(SummaryStyle::ActionItems, "body");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
        assert_eq!(
            messages[1].content,
            "List all key action items from this document:\n\nbody"
        );
    }
}
