use std::fmt;

use thiserror::Error;

/// Where in the protocol a generation call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// Zero-based turn index.
    Turn { index: usize },
    Summary,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turn { index } => write!(f, "turn {}", index + 1),
            Self::Summary => f.write_str("summary"),
        }
    }
}

/// Errors that abort a dialogue session. No partial transcript survives.
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("Invalid dialogue input: {0}")]
    InvalidInput(String),

    #[error("Text generation failed during {stage}: {source}")]
    GenerationFailure {
        stage: GenerationStage,
        #[source]
        source: anyhow::Error,
    },
}

impl DialogueError {
    pub(crate) const fn generation(stage: GenerationStage, source: anyhow::Error) -> Self {
        Self::GenerationFailure { stage, source }
    }

    /// The stage that failed, for generation failures.
    #[must_use]
    pub const fn stage(&self) -> Option<GenerationStage> {
        match self {
            Self::GenerationFailure { stage, .. } => Some(*stage),
            Self::InvalidInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_is_one_based() {
        assert_eq!(GenerationStage::Turn { index: 0 }.to_string(), "turn 1");
        assert_eq!(GenerationStage::Summary.to_string(), "summary");
    }

    #[test]
    fn test_generation_failure_message() {
        let err = DialogueError::generation(
            GenerationStage::Turn { index: 2 },
            anyhow::anyhow!("rate limited"),
        );
        assert_eq!(
            err.to_string(),
            "Text generation failed during turn 3: rate limited"
        );
        assert_eq!(err.stage(), Some(GenerationStage::Turn { index: 2 }));
    }
}
