//! Normalization of upstream persona records into [`PersonaProfile`].
//!
//! Persona data arrives in several shapes: the sectioned document produced
//! by the profile generator, the flat camelCase payload served by the
//! persona API (lists of objects keyed by field name), and the canonical
//! serialization of [`PersonaProfile`] itself. All of them normalize here,
//! before anything reaches the context builder.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::PersonaProfile;

#[derive(Debug, Error)]
pub enum PersonaRecordError {
    #[error("Persona record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Malformed persona record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Keys that only occur in the flat persona API payload.
const FLAT_MARKERS: [&str; 8] = [
    "birthDeath",
    "professionalInfo",
    "otherRoles",
    "achievements",
    "personalInfo",
    "personalityTraits",
    "historicalContext",
    "keyEvents",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordShape {
    Sectioned,
    Flat,
    Canonical,
}

impl RecordShape {
    fn detect(object: &Map<String, Value>) -> Self {
        if object.contains_key("basic_info") {
            Self::Sectioned
        } else if FLAT_MARKERS.iter().any(|key| object.contains_key(*key)) {
            Self::Flat
        } else {
            Self::Canonical
        }
    }
}

/// A list element: either plain text or an object carrying the text under a
/// field-specific key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEntry {
    Text(String),
    Object(Map<String, Value>),
    Other(Value),
}

impl ListEntry {
    fn into_text(self, key: &str) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Object(object) => object
                .get(key)
                .or_else(|| object.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            Self::Other(_) => None,
        }
    }
}

fn entries(list: Option<Vec<ListEntry>>, key: &str) -> Vec<String> {
    list.unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.into_text(key))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SectionedRecord {
    basic_info: Option<BasicInfo>,
    professional: Option<Professional>,
    personal: Option<Personal>,
    legacy: Option<Legacy>,
    historical_context: Option<HistoricalContext>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BasicInfo {
    name: Option<String>,
    birth_death: Option<String>,
    era: Option<String>,
    nationality: Option<String>,
    gender: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Professional {
    primary_occupation: Option<String>,
    other_roles: Option<Vec<ListEntry>>,
    major_achievements: Option<Vec<ListEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Personal {
    education: Option<String>,
    background: Option<String>,
    personality_traits: Option<Vec<ListEntry>>,
    influences: Option<Vec<ListEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Legacy {
    impact: Option<String>,
    modern_significance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HistoricalContext {
    period_background: Option<String>,
    key_events: Option<Vec<ListEntry>>,
}

impl From<SectionedRecord> for PersonaProfile {
    fn from(record: SectionedRecord) -> Self {
        let basic = record.basic_info.unwrap_or_default();
        let professional = record.professional.unwrap_or_default();
        let personal = record.personal.unwrap_or_default();
        let legacy = record.legacy.unwrap_or_default();
        let history = record.historical_context.unwrap_or_default();

        Self {
            name: basic.name.unwrap_or_default(),
            birth_death: basic.birth_death.unwrap_or_default(),
            era: basic.era.unwrap_or_default(),
            nationality: basic.nationality.unwrap_or_default(),
            gender: basic.gender.unwrap_or_default(),
            primary_occupation: professional.primary_occupation.unwrap_or_default(),
            other_roles: entries(professional.other_roles, "name"),
            major_achievements: entries(professional.major_achievements, "name"),
            education: personal.education.unwrap_or_default(),
            background: personal.background.unwrap_or_default(),
            personality_traits: entries(personal.personality_traits, "name"),
            influences: entries(personal.influences, "name"),
            legacy_impact: legacy.impact.unwrap_or_default(),
            legacy_modern_significance: legacy.modern_significance.unwrap_or_default(),
            historical_period_background: history.period_background.unwrap_or_default(),
            key_events: entries(history.key_events, "name"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FlatRecord {
    name: Option<String>,
    birth_death: Option<String>,
    era: Option<String>,
    nationality: Option<String>,
    gender: Option<String>,
    professional_info: Option<Vec<ListEntry>>,
    other_roles: Option<Vec<ListEntry>>,
    achievements: Option<Vec<ListEntry>>,
    personal_info: Option<FlatPersonal>,
    personality_traits: Option<Vec<ListEntry>>,
    influences: Option<Vec<ListEntry>>,
    legacy: Option<FlatLegacy>,
    historical_context: Option<FlatHistorical>,
    key_events: Option<Vec<ListEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FlatPersonal {
    education: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FlatLegacy {
    impact: Option<String>,
    modern_significance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FlatHistorical {
    period_background: Option<String>,
}

impl From<FlatRecord> for PersonaProfile {
    fn from(record: FlatRecord) -> Self {
        let personal = record.personal_info.unwrap_or_default();
        let legacy = record.legacy.unwrap_or_default();
        let history = record.historical_context.unwrap_or_default();

        Self {
            name: record.name.unwrap_or_default(),
            birth_death: record.birth_death.unwrap_or_default(),
            era: record.era.unwrap_or_default(),
            nationality: record.nationality.unwrap_or_default(),
            gender: record.gender.unwrap_or_default(),
            primary_occupation: entries(record.professional_info, "primaryOccupation").join(", "),
            other_roles: entries(record.other_roles, "roleName"),
            major_achievements: entries(record.achievements, "achievementName"),
            education: personal.education.unwrap_or_default(),
            background: personal.background.unwrap_or_default(),
            personality_traits: entries(record.personality_traits, "traitName"),
            influences: entries(record.influences, "influenceName"),
            legacy_impact: legacy.impact.unwrap_or_default(),
            legacy_modern_significance: legacy.modern_significance.unwrap_or_default(),
            historical_period_background: history.period_background.unwrap_or_default(),
            key_events: entries(record.key_events, "eventDescription"),
        }
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Remove null object members and null list elements at every depth, so a
/// null reads as a missing key in every shape.
fn drop_nulls(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, drop_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(drop_nulls)
                .collect(),
        ),
        other => other,
    }
}

impl PersonaProfile {
    /// Normalize an upstream persona record of any supported shape.
    ///
    /// Missing keys default to empty values; only a non-object document or a
    /// field of the wrong JSON type is rejected.
    pub fn from_record(value: Value) -> Result<Self, PersonaRecordError> {
        let Value::Object(object) = &value else {
            return Err(PersonaRecordError::NotAnObject(kind_of(&value)));
        };
        let shape = RecordShape::detect(object);
        let value = drop_nulls(value);
        debug!("Normalizing persona record as {shape:?}");

        let profile = match shape {
            RecordShape::Sectioned => serde_json::from_value::<SectionedRecord>(value)?.into(),
            RecordShape::Flat => serde_json::from_value::<FlatRecord>(value)?.into(),
            RecordShape::Canonical => serde_json::from_value::<Self>(value)?,
        };

        Ok(profile)
    }
}
