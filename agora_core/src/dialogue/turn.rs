use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persona's contribution to the dialogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueTurn {
    /// Name of the persona who spoke
    pub speaker: String,
    /// Cleaned model output
    pub content: String,
    /// Zero-based position in the transcript
    pub sequence_index: usize,
    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

impl DialogueTurn {
    #[must_use]
    pub fn new(speaker: String, content: String, sequence_index: usize) -> Self {
        Self {
            speaker,
            content,
            sequence_index,
            timestamp: Utc::now(),
        }
    }
}

const QUOTE_PAIRS: [(char, char); 2] = [('"', '"'), ('\u{201C}', '\u{201D}')];

fn strip_outer_quotes(text: &str) -> &str {
    QUOTE_PAIRS
        .iter()
        .find_map(|&(open, close)| text.strip_prefix(open)?.strip_suffix(close))
        .unwrap_or(text)
}

/// Clean a raw model response for `speaker`.
///
/// Drops an echoed `"<speaker>: "` label and one pair of surrounding quotes.
/// The label may sit outside or inside the quotes. Quotes inside the text
/// are preserved.
#[must_use]
pub fn clean_response(raw: &str, speaker: &str) -> String {
    let label = format!("{speaker}: ");
    let strip_label = |text: &str| -> String {
        let text = text.trim();
        text.strip_prefix(label.as_str())
            .unwrap_or(text)
            .trim()
            .to_string()
    };

    let unlabeled = strip_label(raw);
    strip_label(strip_outer_quotes(&unlabeled))
}

/// Render a transcript as markdown.
#[must_use]
pub fn format_dialogue(transcript: &[DialogueTurn]) -> String {
    let mut formatted = String::from("# Persona Dialogue\n\n");
    for turn in transcript {
        formatted.push_str(&format!("### {}\n{}\n\n", turn.speaker, turn.content));
    }
    formatted
}
