#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Persona sources: where dialogue participants come from.
//!
//! Both sources hand raw JSON to `PersonaProfile::from_record`, so files and
//! the persona API may use any record shape the normalizer understands.

mod file;
mod http;

pub use agora_core::PersonaSource;
pub use file::FilePersonaSource;
pub use http::HttpPersonaSource;
