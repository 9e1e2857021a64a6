use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use agora_broadcast::{RoomEvent, RoomObserver, RoomRegistry};
use agora_config::Config;
use agora_core::{DialogueOrchestrator, DialogueOutcome, PersonaProfile, format_dialogue};
use agora_personas::{FilePersonaSource, HttpPersonaSource, PersonaSource};
use agora_providers::OpenAiProvider;
use anyhow::Context;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_PERSONA_TIMEOUT_SECS: u64 = 30;

/// Input parameters for the Debate command strategy.
#[derive(Debug, Clone)]
pub struct DebateInput {
    /// JSON file path or persona API id of the opening persona
    pub persona_a: String,
    /// JSON file path or persona API id of the closing persona
    pub persona_b: String,
    pub question: String,
    /// Round override; falls back to `dialogue.turn_count`
    pub turns: Option<usize>,
    pub model: Option<String>,
    pub output: Option<PathBuf>,
}

/// Runs one dialogue session and streams its turns to the terminal.
///
/// Turns travel through a `RoomRegistry` room exactly as they would to any
/// other subscriber; the terminal printer is just the room's only listener.
#[derive(Debug, Clone, Copy)]
pub struct DebateStrategy;

impl super::CommandStrategy for DebateStrategy {
    type Input = DebateInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let persona_a = load_persona(&config, &input.persona_a).await?;
        let persona_b = load_persona(&config, &input.persona_b).await?;
        let turn_count = input.turns.unwrap_or(config.dialogue.turn_count);

        let orchestrator =
            DialogueOrchestrator::new(build_provider(&config), config.dialogue_config(input.model));

        let registry = Arc::new(RoomRegistry::new());
        let room_id = Uuid::now_v7();
        let receiver = registry.subscribe(room_id).await;
        let printer = tokio::spawn(print_events(receiver));
        let observer = RoomObserver::new(registry.clone(), room_id);

        println!("🗣️  {} and {} on: {}", persona_a.name, persona_b.name, input.question);

        let result = orchestrator
            .generate_dialogue(
                &persona_a,
                &persona_b,
                &input.question,
                turn_count,
                Some(&observer),
            )
            .await;

        let event = match &result {
            Ok(outcome) => RoomEvent::summary(outcome.summary.clone()),
            Err(e) => RoomEvent::error(e.to_string()),
        };
        registry.publish(room_id, event).await;
        registry.close_room(room_id).await;
        printer.await?;

        let outcome = result?;

        if let Some(path) = input.output {
            tokio::fs::write(&path, render_report(&input.question, &outcome))
                .await
                .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
            info!("Transcript written to {}", path.display());
        }

        Ok(())
    }
}

fn build_provider(config: &Config) -> OpenAiProvider {
    let openai = &config.providers.openai;
    let mut provider = OpenAiProvider::new(openai.api_key.clone())
        .with_default_model(config.agents.defaults.model.clone())
        .with_temperature(config.agents.defaults.temperature)
        .with_max_tokens(config.agents.defaults.max_tokens);
    if let Some(base_url) = &openai.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    provider
}

/// An existing file is read from disk; anything else is a persona API id.
async fn load_persona(config: &Config, key: &str) -> anyhow::Result<PersonaProfile> {
    if Path::new(key).is_file() {
        return FilePersonaSource::new().load(key).await;
    }

    let api_base = config.personas.api_base.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "'{key}' is not a file and personas.api_base is not configured"
        )
    })?;
    let timeout = Duration::from_secs(
        config
            .personas
            .timeout_secs
            .unwrap_or(DEFAULT_PERSONA_TIMEOUT_SECS),
    );
    HttpPersonaSource::with_timeout(api_base, timeout)?
        .load(key)
        .await
}

async fn print_events(mut receiver: Receiver<RoomEvent>) {
    loop {
        match receiver.recv().await {
            Ok(RoomEvent::Turn {
                speaker, content, ..
            }) => println!("\n### {speaker}\n{content}"),
            Ok(RoomEvent::Summary { content, .. }) => println!("\n{content}"),
            Ok(RoomEvent::Error { message }) => eprintln!("\n❌ {message}"),
            Err(RecvError::Lagged(skipped)) => warn!("Printer lagged, {skipped} event(s) dropped"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn render_report(question: &str, outcome: &DialogueOutcome) -> String {
    format!(
        "> {question}\n\n{}---\n\n{}\n",
        format_dialogue(&outcome.transcript),
        outcome.summary
    )
}
