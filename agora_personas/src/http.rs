use std::time::Duration;

use agora_core::{PersonaProfile, PersonaSource};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::info;

/// Fetches persona records from a persona API exposing `GET /persons/{id}`.
pub struct HttpPersonaSource {
    client: Client,
    api_base: String,
}

impl HttpPersonaSource {
    pub fn new(api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(api_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// `{api_base}/persons/{id}` with `id` encoded as a single path segment.
    fn person_url(&self, id: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid persona API base: {}", self.api_base))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Persona API base cannot hold a path: {}", self.api_base))?
            .pop_if_empty()
            .push("persons")
            .push(id.trim());
        Ok(url)
    }
}

#[async_trait]
impl PersonaSource for HttpPersonaSource {
    async fn load(&self, key: &str) -> anyhow::Result<PersonaProfile> {
        let url = self.person_url(key)?;
        info!("Fetching persona from {url}");

        let record = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Failed to reach persona API at {url}"))?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let profile = PersonaProfile::from_record(record)?;
        info!("Fetched persona '{}'", profile.name);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_person_url() {
        let source = HttpPersonaSource::new("http://localhost:8000/");
        assert_eq!(
            source
                .person_url(" 0190c1e2-0000-7000-8000-000000000001 ")
                .expect("valid url")
                .as_str(),
            "http://localhost:8000/persons/0190c1e2-0000-7000-8000-000000000001"
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_person_url_keeps_id_in_one_segment() {
        let source = HttpPersonaSource::new("http://localhost:8000/api");
        let url = source.person_url("a/b?c#d").expect("valid url");

        assert_eq!(url.as_str(), "http://localhost:8000/api/persons/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_person_url_rejects_invalid_base() {
        let source = HttpPersonaSource::new("not a url");
        assert!(source.person_url("1").is_err());
    }

    #[test]
    fn test_with_timeout_builds_client() {
        let source = HttpPersonaSource::with_timeout("http://persona.local", Duration::from_secs(5));
        assert!(source.is_ok());
    }
}
