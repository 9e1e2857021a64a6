//! Two-persona dialogue protocol.
//!
//! A session alternates two personas through the text-generation
//! collaborator for a fixed number of rounds, then asks for a structured
//! summary of the whole transcript. Persona A always opens and persona B
//! always closes.

mod error;
mod orchestrator;
mod prompt;
mod session;
mod turn;

pub use error::{DialogueError, GenerationStage};
pub use orchestrator::{DialogueConfig, DialogueOrchestrator, DialogueOutcome, TurnObserver};
pub use session::DialogueSession;
pub use turn::{DialogueTurn, clean_response, format_dialogue};
