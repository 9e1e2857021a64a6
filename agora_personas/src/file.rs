use std::path::PathBuf;

use agora_core::{PersonaProfile, PersonaSource};
use anyhow::Context;
use async_trait::async_trait;
use tracing::info;

/// Loads persona records from JSON files. Keys are paths, resolved against
/// an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FilePersonaSource {
    base_dir: Option<PathBuf>,
}

impl FilePersonaSource {
    #[must_use]
    pub const fn new() -> Self {
        Self { base_dir: None }
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: PathBuf) -> Self {
        self.base_dir = Some(base_dir);
        self
    }

    fn resolve(&self, key: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(key),
            None => PathBuf::from(key),
        }
    }
}

#[async_trait]
impl PersonaSource for FilePersonaSource {
    async fn load(&self, key: &str) -> anyhow::Result<PersonaProfile> {
        let path = self.resolve(key);
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read persona file {}", path.display()))?;

        let record: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Persona file {} is not valid JSON", path.display()))?;
        let profile = PersonaProfile::from_record(record)?;

        info!("Loaded persona '{}' from {}", profile.name, path.display());
        Ok(profile)
    }
}
