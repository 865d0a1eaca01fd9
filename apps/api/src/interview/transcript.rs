use serde::{Deserialize, Serialize};

use crate::serde_ext::null_as_empty;

/// Turns of recent history sent when asking for the next question.
pub const RECENT_TURN_WINDOW: usize = 6;

/// One message of a caller-supplied interview history.
/// `role == "ai"` is the interviewer; anything else is the candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewTurn {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl InterviewTurn {
    pub fn speaker(&self) -> &'static str {
        if self.role == "ai" {
            "Interviewer"
        } else {
            "Candidate"
        }
    }
}

/// The last `window` turns, oldest first.
pub fn recent_turns(history: &[InterviewTurn], window: usize) -> &[InterviewTurn] {
    &history[history.len().saturating_sub(window)..]
}

/// Renders turns as `Speaker: content` lines.
pub fn format_transcript(turns: &[InterviewTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}\n", turn.speaker(), turn.content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> InterviewTurn {
        InterviewTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_format_transcript_maps_roles() {
        let history = vec![
            turn("ai", "Tell me about yourself."),
            turn("user", "I build Rust services."),
        ];
        assert_eq!(
            format_transcript(&history),
            "Interviewer: Tell me about yourself.\nCandidate: I build Rust services.\n"
        );
    }

    #[test]
    fn test_unknown_role_is_candidate() {
        assert_eq!(turn("", "hi").speaker(), "Candidate");
        assert_eq!(turn("AI", "hi").speaker(), "Candidate");
    }

    #[test]
    fn test_recent_turns_keeps_tail() {
        let history: Vec<_> = (0..9).map(|i| turn("user", &i.to_string())).collect();
        let recent = recent_turns(&history, RECENT_TURN_WINDOW);
        assert_eq!(recent.len(), 6);
        assert_eq!(recent[0].content, "3");
        assert_eq!(recent[5].content, "8");
    }

    #[test]
    fn test_recent_turns_short_history_is_whole() {
        let history = vec![turn("ai", "q1")];
        assert_eq!(recent_turns(&history, RECENT_TURN_WINDOW).len(), 1);
        assert!(recent_turns(&[], RECENT_TURN_WINDOW).is_empty());
    }

    #[test]
    fn test_turn_deserializes_with_missing_fields() {
        let turn: InterviewTurn = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(turn.role, "");
        assert_eq!(turn.speaker(), "Candidate");
    }
}
