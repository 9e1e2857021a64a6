//! Dialogue orchestrator: runs the turn loop and the summary call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{ChatMessage, LLMProvider, PersonaProfile};

use super::error::{DialogueError, GenerationStage};
use super::session::DialogueSession;
use super::turn::DialogueTurn;

/// Configuration for dialogue generation.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Model used for every turn
    pub model: String,
    /// Model used for the summary call (falls back to `model`)
    pub summary_model: Option<String>,
    /// Ask for a final synthesized recommendation in the closing turn
    pub final_recommendation: bool,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            summary_model: None,
            final_recommendation: true,
        }
    }
}

impl DialogueConfig {
    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Set a dedicated summary model.
    #[must_use]
    pub fn with_summary_model(mut self, model: Option<String>) -> Self {
        self.summary_model = model;
        self
    }

    /// Toggle the final-recommendation instruction.
    #[must_use]
    pub const fn with_final_recommendation(mut self, enabled: bool) -> Self {
        self.final_recommendation = enabled;
        self
    }

    fn summary_model(&self) -> &str {
        self.summary_model.as_deref().unwrap_or(&self.model)
    }
}

/// Receives each turn as soon as it is recorded, in `sequence_index` order.
///
/// The orchestrator awaits the observer before requesting the next turn.
#[async_trait]
pub trait TurnObserver: Send + Sync {
    async fn on_turn(&self, turn: &DialogueTurn);
}

#[async_trait]
impl<T: TurnObserver + ?Sized> TurnObserver for Arc<T> {
    async fn on_turn(&self, turn: &DialogueTurn) {
        (**self).on_turn(turn).await;
    }
}

/// Result of a completed session.
#[derive(Debug, Clone)]
pub struct DialogueOutcome {
    pub transcript: Vec<DialogueTurn>,
    pub summary: String,
}

impl DialogueOutcome {
    #[must_use]
    pub fn into_parts(self) -> (Vec<DialogueTurn>, String) {
        (self.transcript, self.summary)
    }
}

/// Drives two personas through an alternating dialogue.
///
/// The provider is injected once and shared by every session; sessions hold
/// no state in the orchestrator, so independent dialogues may run
/// concurrently on one instance.
pub struct DialogueOrchestrator<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    provider: P,
    config: DialogueConfig,
}

impl<P> DialogueOrchestrator<P>
where
    P: LLMProvider + Send + Sync,
{
    pub const fn new(provider: P, config: DialogueConfig) -> Self {
        Self { provider, config }
    }

    #[must_use]
    pub const fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Run a full session: `2 * turn_count` alternating turns, then a summary.
    ///
    /// Any generation failure aborts the session; no partial transcript is
    /// returned. The optional observer sees every turn before the next one is
    /// requested and before the summary call.
    pub async fn generate_dialogue(
        &self,
        persona_a: &PersonaProfile,
        persona_b: &PersonaProfile,
        user_concern: &str,
        turn_count: usize,
        observer: Option<&dyn TurnObserver>,
    ) -> Result<DialogueOutcome, DialogueError> {
        let mut session = DialogueSession::new(
            persona_a,
            persona_b,
            user_concern,
            turn_count,
            self.config.final_recommendation,
        )?;

        let session_id = Uuid::now_v7();
        if persona_a.name == persona_b.name {
            warn!(
                "Dialogue {session_id}: both personas are named {}; output will be degenerate",
                persona_a.name
            );
        }
        info!(
            "Starting dialogue {session_id}: {} vs {}, {} turns",
            persona_a.name,
            persona_b.name,
            session.total_turns()
        );

        while !session.is_complete() {
            let turn = session.next_turn();
            let stage = GenerationStage::Turn { index: turn };
            let speaker = &session.speakers(turn).0.name;
            debug!(
                "Dialogue {session_id}: requesting turn {}/{} speaker={speaker}",
                turn + 1,
                session.total_turns()
            );

            let messages = session.turn_request();
            let raw = self.complete(&messages, &self.config.model, stage).await?;

            let recorded = session.record_turn(&raw)?;
            debug!(
                "Dialogue {session_id}: turn {} recorded, content_len={}",
                turn + 1,
                recorded.content.len()
            );

            if let Some(observer) = observer {
                observer.on_turn(recorded).await;
            }
        }

        info!("Dialogue {session_id}: requesting summary");
        let summary = self
            .complete(
                &session.summary_request(),
                self.config.summary_model(),
                GenerationStage::Summary,
            )
            .await?;

        let summary = summary.trim().to_string();
        if summary.is_empty() {
            return Err(DialogueError::generation(
                GenerationStage::Summary,
                anyhow::anyhow!("empty summary"),
            ));
        }

        info!("Dialogue {session_id} completed");
        Ok(DialogueOutcome {
            transcript: session.into_transcript(),
            summary,
        })
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        stage: GenerationStage,
    ) -> Result<String, DialogueError> {
        match self.provider.chat(messages, model).await {
            Ok(response) => Ok(response.content),
            Err(e) => {
                warn!("Generation failed during {stage}: {e}");
                Err(DialogueError::generation(stage, e))
            }
        }
    }
}
