//! Persona profiles and the natural-language context rendered from them.

mod profile;
mod record;

pub use profile::PersonaProfile;
pub use record::PersonaRecordError;
