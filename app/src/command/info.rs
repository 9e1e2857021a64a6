use agora_config::Config;

/// Prints the loaded configuration with the API key masked.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== agora Configuration ===\n");

        println!("Provider:");
        println!("  OpenAI Key: {}", mask_key(&config.providers.openai.api_key));
        println!(
            "  Base URL: {}",
            config
                .providers
                .openai
                .base_url
                .as_deref()
                .unwrap_or("(default)")
        );
        println!();

        println!("Agent Defaults:");
        println!("  Model: {}", config.agents.defaults.model);
        println!("  Max Tokens: {}", config.agents.defaults.max_tokens);
        println!("  Temperature: {}", config.agents.defaults.temperature);
        println!();

        println!("Dialogue:");
        println!(
            "  Turn Count: {} ({} turns total)",
            config.dialogue.turn_count,
            config.dialogue.turn_count * 2
        );
        println!(
            "  Final Recommendation: {}",
            config.dialogue.final_recommendation
        );
        println!(
            "  Summary Model: {}",
            config
                .dialogue
                .summary_model
                .as_deref()
                .unwrap_or("(same as model)")
        );
        println!();

        println!("Personas:");
        println!(
            "  API Base: {}",
            config
                .personas
                .api_base
                .as_deref()
                .unwrap_or("(not set - file paths only)")
        );
        if let Some(timeout) = config.personas.timeout_secs {
            println!("  Timeout: {timeout}s");
        }

        Ok(())
    }
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}
