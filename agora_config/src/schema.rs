use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use agora_core::DialogueConfig;

const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub agents: AgentsConfig,
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub dialogue: DialogueSettings,
    #[serde(default)]
    pub personas: PersonasConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentDefaults {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DialogueSettings {
    /// Round pairs per dialogue
    #[serde(default = "DialogueSettings::default_turn_count")]
    pub turn_count: usize,
    /// Ask the closing persona for a synthesized recommendation
    #[serde(default = "DialogueSettings::default_final_recommendation")]
    pub final_recommendation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_model: Option<String>,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            turn_count: Self::default_turn_count(),
            final_recommendation: Self::default_final_recommendation(),
            summary_model: None,
        }
    }
}

impl DialogueSettings {
    const fn default_turn_count() -> usize {
        3
    }

    const fn default_final_recommendation() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PersonasConfig {
    /// Base URL of the persona API serving `/persons/{id}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

const CONFIG_TEMPLATE: &str = r#"{
  "agents": {
    "defaults": {
      "model": "gpt-4o",
      "max_tokens": 2048,
      "temperature": 0.7
    }
  },
  "providers": {
    "openai": {
      "api_key": "your-openai-api-key-here"
    }
  },
  "dialogue": {
    "turn_count": 3,
    "final_recommendation": true
  },
  "personas": {
    "api_base": "http://localhost:8000",
    "timeout_secs": 30
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("agora"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'agora init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&content)?;
        config.apply_env_api_key(std::env::var(API_KEY_ENV).ok());
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Fill an empty API key from the environment.
    fn apply_env_api_key(&mut self, env_key: Option<String>) {
        if !self.providers.openai.api_key.trim().is_empty() {
            return;
        }
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {API_KEY_ENV}");
            self.providers.openai.api_key = key;
        }
    }

    /// Dialogue orchestration settings, with an optional model override.
    #[must_use]
    pub fn dialogue_config(&self, model_override: Option<String>) -> DialogueConfig {
        DialogueConfig::default()
            .with_model(model_override.unwrap_or_else(|| self.agents.defaults.model.clone()))
            .with_summary_model(self.dialogue.summary_model.clone())
            .with_final_recommendation(self.dialogue.final_recommendation)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your OpenAI API key (or set {API_KEY_ENV})");
        println!("   2. Point personas.api_base at your persona API, or use JSON persona files");
        println!("   3. Run 'agora debate' to start a dialogue");
        println!();
        println!("🔧 Configuration options:");
        println!("   - model: model used for every dialogue turn");
        println!("   - dialogue.turn_count: rounds per dialogue (each persona speaks once per round)");
        println!("   - dialogue.final_recommendation: close with a synthesized recommendation");
        println!();
        Ok(())
    }
}
