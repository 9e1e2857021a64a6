use serde::{Deserialize, Serialize};

/// Canonical persona record.
///
/// Every field defaults to empty so a profile built from partial upstream
/// data still renders. Instances are treated as immutable for the lifetime
/// of a dialogue session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PersonaProfile {
    pub name: String,
    pub birth_death: String,
    pub era: String,
    pub nationality: String,
    pub gender: String,
    pub primary_occupation: String,
    pub other_roles: Vec<String>,
    pub major_achievements: Vec<String>,
    pub education: String,
    pub background: String,
    pub personality_traits: Vec<String>,
    pub influences: Vec<String>,
    pub legacy_impact: String,
    pub legacy_modern_significance: String,
    pub historical_period_background: String,
    pub key_events: Vec<String>,
}

impl PersonaProfile {
    /// Create an otherwise empty profile with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the profile carries no usable identity.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Render the five-section profile block embedded in dialogue prompts.
    ///
    /// Pure and deterministic: identical profiles render byte-identical text.
    #[must_use]
    pub fn prompt_context(&self) -> String {
        format!(
            "=== Persona Profile ===

1. Basic Information
- Name: {name}
- Era: {era}
- Lifespan: {birth_death}
- Nationality: {nationality}
- Gender: {gender}

2. Professional Career
- Primary Occupation: {occupation}
- Other Roles: {other_roles}
- Major Achievements:
{achievements}

3. Personal Background
- Education: {education}
- Background: {background}
- Personality Traits:
{traits}

4. Influence and Legacy
- Historical Impact: {impact}
- Modern Significance: {significance}

5. Historical Context
- Period Background: {period}
- Key Events:
{events}",
            name = self.name,
            era = self.era,
            birth_death = self.birth_death,
            nationality = self.nationality,
            gender = self.gender,
            occupation = self.primary_occupation,
            other_roles = self.other_roles.join(", "),
            achievements = bullet_list(&self.major_achievements),
            education = self.education,
            background = self.background,
            traits = bullet_list(&self.personality_traits),
            impact = self.legacy_impact,
            significance = self.legacy_modern_significance,
            period = self.historical_period_background,
            events = bullet_list(&self.key_events),
        )
    }
}

const BULLET: &str = "  - ";

/// One bullet per item. An empty list still yields a bare bullet.
fn bullet_list(items: &[String]) -> String {
    format!("{BULLET}{}", items.join(&format!("\n{BULLET}")))
}
