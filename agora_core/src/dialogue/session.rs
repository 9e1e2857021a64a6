//! Per-invocation dialogue state.
//!
//! A session owns the transcript and the model-facing history for exactly
//! one `generate_dialogue` call. It is never shared between calls or tasks.

use crate::{ChatMessage, PersonaProfile};

use super::error::{DialogueError, GenerationStage};
use super::prompt;
use super::turn::{DialogueTurn, clean_response, format_dialogue};

#[derive(Debug)]
pub struct DialogueSession<'a> {
    persona_a: &'a PersonaProfile,
    persona_b: &'a PersonaProfile,
    user_concern: &'a str,
    /// `2 * turn_count`: one turn per persona per round
    total_turns: usize,
    final_recommendation: bool,
    transcript: Vec<DialogueTurn>,
    model_history: Vec<ChatMessage>,
}

impl<'a> DialogueSession<'a> {
    /// Validate input and seed the history with the system prompt.
    pub fn new(
        persona_a: &'a PersonaProfile,
        persona_b: &'a PersonaProfile,
        user_concern: &'a str,
        turn_count: usize,
        final_recommendation: bool,
    ) -> Result<Self, DialogueError> {
        if turn_count < 1 {
            return Err(DialogueError::InvalidInput(format!(
                "turn_count must be at least 1, got {turn_count}"
            )));
        }
        let Some(total_turns) = turn_count.checked_mul(2) else {
            return Err(DialogueError::InvalidInput(format!(
                "turn_count {turn_count} is too large"
            )));
        };
        if persona_a.is_absent() {
            return Err(DialogueError::InvalidInput(
                "first persona profile is missing".to_string(),
            ));
        }
        if persona_b.is_absent() {
            return Err(DialogueError::InvalidInput(
                "second persona profile is missing".to_string(),
            ));
        }

        let system = prompt::system_prompt(persona_a, persona_b, user_concern, final_recommendation);

        Ok(Self {
            persona_a,
            persona_b,
            user_concern,
            total_turns,
            final_recommendation,
            transcript: Vec::new(),
            model_history: vec![ChatMessage::system(system)],
        })
    }

    /// Total turns emitted by a complete session.
    #[must_use]
    pub const fn total_turns(&self) -> usize {
        self.total_turns
    }

    /// Index of the next turn to generate.
    #[must_use]
    pub fn next_turn(&self) -> usize {
        self.transcript.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.transcript.len() == self.total_turns()
    }

    /// `(current, counterpart)` for a turn. Persona A takes even turns.
    #[must_use]
    pub const fn speakers(&self, turn: usize) -> (&'a PersonaProfile, &'a PersonaProfile) {
        if turn % 2 == 0 {
            (self.persona_a, self.persona_b)
        } else {
            (self.persona_b, self.persona_a)
        }
    }

    /// Messages for the next turn: the history plus the turn instruction as
    /// a user message. The history itself is left untouched.
    #[must_use]
    pub fn turn_request(&self) -> Vec<ChatMessage> {
        let turn = self.next_turn();
        let (current, counterpart) = self.speakers(turn);

        let mut messages = Vec::with_capacity(self.model_history.len() + 1);
        messages.extend_from_slice(&self.model_history);
        messages.push(ChatMessage::user(prompt::turn_prompt(
            current,
            counterpart,
            turn,
            self.total_turns(),
            self.final_recommendation,
        )));
        messages
    }

    /// Clean and append the response for the next turn.
    ///
    /// The cleaned text goes to the transcript and, as an assistant message,
    /// to the history seen by later turns.
    pub(crate) fn record_turn(&mut self, raw: &str) -> Result<&DialogueTurn, DialogueError> {
        let turn = self.next_turn();
        let stage = GenerationStage::Turn { index: turn };
        if turn >= self.total_turns() {
            return Err(DialogueError::generation(
                stage,
                anyhow::anyhow!("dialogue already has {} turns", self.total_turns()),
            ));
        }

        let (current, _) = self.speakers(turn);
        let content = clean_response(raw, &current.name);
        if content.is_empty() {
            return Err(DialogueError::generation(
                stage,
                anyhow::anyhow!("empty response for {}", current.name),
            ));
        }

        self.model_history.push(ChatMessage::assistant(content.clone()));
        self.transcript
            .push(DialogueTurn::new(current.name.clone(), content, turn));

        let last = self.transcript.len() - 1;
        Ok(&self.transcript[last])
    }

    /// Messages for the summarization call over the full transcript.
    #[must_use]
    pub fn summary_request(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(prompt::SUMMARY_PROMPT),
            ChatMessage::user(prompt::summary_input(
                self.user_concern,
                &format_dialogue(&self.transcript),
            )),
        ]
    }

    #[must_use]
    pub fn transcript(&self) -> &[DialogueTurn] {
        &self.transcript
    }

    #[must_use]
    pub fn model_history(&self) -> &[ChatMessage] {
        &self.model_history
    }

    #[must_use]
    pub fn into_transcript(self) -> Vec<DialogueTurn> {
        self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn pair() -> (PersonaProfile, PersonaProfile) {
        (PersonaProfile::named("A"), PersonaProfile::named("B"))
    }

    #[test]
    fn test_rejects_zero_turns() {
        let (a, b) = pair();
        let result = DialogueSession::new(&a, &b, "concern", 0, true);
        assert!(matches!(result, Err(DialogueError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_absent_persona() {
        let (a, _) = pair();
        let absent = PersonaProfile::default();
        assert!(DialogueSession::new(&a, &absent, "concern", 1, true).is_err());
        assert!(DialogueSession::new(&absent, &a, "concern", 1, true).is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_turn_count_overflow_is_invalid_input() {
        let (a, b) = pair();
        let result = DialogueSession::new(&a, &b, "concern", usize::MAX / 2 + 1, true);
        assert!(matches!(result, Err(DialogueError::InvalidInput(_))));

        let session =
            DialogueSession::new(&a, &b, "concern", usize::MAX / 2, true).expect("largest valid count");
        assert_eq!(session.total_turns(), usize::MAX - 1);
        assert!(!session.is_complete());
        assert!(session.transcript().is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_history_is_seeded_with_system_prompt() {
        let (a, b) = pair();
        let session = DialogueSession::new(&a, &b, "concern", 2, true).expect("valid session");

        assert_eq!(session.total_turns(), 4);
        assert_eq!(session.model_history().len(), 1);
        assert_eq!(session.model_history()[0].role, Role::System);
        assert!(session.transcript().is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_speakers_alternate_starting_with_a() {
        let (a, b) = pair();
        let session = DialogueSession::new(&a, &b, "concern", 3, true).expect("valid session");

        let names: Vec<&str> = (0..session.total_turns())
            .map(|turn| session.speakers(turn).0.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "A", "B", "A", "B"]);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_record_turn_grows_transcript_and_history() {
        let (a, b) = pair();
        let mut session = DialogueSession::new(&a, &b, "concern", 1, true).expect("valid session");

        let request = session.turn_request();
        assert_eq!(request.len(), 2);
        assert_eq!(request[1].role, Role::User);
        assert!(request[1].content.contains("This is turn 1/2."));

        let turn = session.record_turn("A: \"Hello\"").expect("turn recorded");
        assert_eq!(turn.speaker, "A");
        assert_eq!(turn.content, "Hello");
        assert_eq!(turn.sequence_index, 0);

        assert_eq!(session.model_history().len(), 2);
        assert_eq!(session.model_history()[1], ChatMessage::assistant("Hello"));

        let request = session.turn_request();
        assert_eq!(request.len(), 3);
        assert!(request[2].content.starts_with("The current speaker is B."));

        session.record_turn("Goodbye").expect("turn recorded");
        assert!(session.is_complete());
        assert!(session.record_turn("extra").is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_empty_response_is_generation_failure() {
        let (a, b) = pair();
        let mut session = DialogueSession::new(&a, &b, "concern", 1, true).expect("valid session");

        let err = session.record_turn("A: \"\"").expect_err("empty content must fail");
        assert_eq!(err.stage(), Some(GenerationStage::Turn { index: 0 }));
        assert!(session.transcript().is_empty());
        assert_eq!(session.model_history().len(), 1);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_summary_request_carries_transcript() {
        let (a, b) = pair();
        let mut session =
            DialogueSession::new(&a, &b, "Should I change careers?", 1, true).expect("valid session");
        session.record_turn("Take the leap.").expect("turn recorded");
        session.record_turn("Plan first.").expect("turn recorded");

        let request = session.summary_request();
        assert_eq!(request.len(), 2);
        assert_eq!(request[0].content, prompt::SUMMARY_PROMPT);
        assert!(request[1].content.starts_with("User's concern: Should I change careers?"));
        assert!(request[1].content.contains("### A\nTake the leap."));
        assert!(request[1].content.contains("### B\nPlan first."));
    }
}
