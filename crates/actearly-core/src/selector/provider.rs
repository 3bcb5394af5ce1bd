//! Content provider boundary and the HTTP backend client.
//!
//! The backend speaks a single endpoint, `POST <base>/api/ai`, taking
//! `{task, payload: {prompt}}` and answering `{ok, data: {text}, error}`.
//! `text` is expected to hold a JSON array.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::wisdom::{wisdom_prompt, WisdomTip};
use super::SessionRequest;
use crate::error::ProviderError;
use crate::exercise::Exercise;

/// Text the backend returns when its model is down.
pub const UNAVAILABLE_MARKER: &str = "AI temporarily unavailable";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote generator of session content.
pub trait ContentProvider: Send + Sync {
    fn generate_session(
        &self,
        request: &SessionRequest,
    ) -> impl Future<Output = Result<Vec<Exercise>, ProviderError>> + Send;

    fn generate_wisdom_tips(
        &self,
        custom_instructions: Option<&str>,
    ) -> impl Future<Output = Result<Vec<WisdomTip>, ProviderError>> + Send;
}

#[derive(Debug, Deserialize)]
struct AiResponse {
    ok: bool,
    #[serde(default)]
    data: Option<AiData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AiData {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the content backend. Without an endpoint every call fails
/// with [`ProviderError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct BackendProvider {
    client: Client,
    endpoint: Option<Url>,
}

impl BackendProvider {
    pub fn new(endpoint: Option<Url>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    fn api_url(&self) -> Result<Url, ProviderError> {
        let mut url = self.endpoint.clone().ok_or(ProviderError::NotConfigured)?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed("endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(["api", "ai"]);
        Ok(url)
    }

    async fn call(&self, task: &str, prompt: &str) -> Result<String, ProviderError> {
        let url = self.api_url()?;
        let body = json!({ "task": task, "payload": { "prompt": prompt } });

        let resp: AiResponse = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(ProviderError::Rejected(
                resp.error
                    .unwrap_or_else(|| "Backend AI request failed".to_string()),
            ));
        }

        resp.data
            .and_then(|d| d.text)
            .ok_or(ProviderError::Empty)
    }
}

impl ContentProvider for BackendProvider {
    async fn generate_session(
        &self,
        request: &SessionRequest,
    ) -> Result<Vec<Exercise>, ProviderError> {
        let text = self.call("generate_session", &request.prompt()).await?;
        parse_payload(&text)
    }

    async fn generate_wisdom_tips(
        &self,
        custom_instructions: Option<&str>,
    ) -> Result<Vec<WisdomTip>, ProviderError> {
        let text = self
            .call("health_wisdom", &wisdom_prompt(custom_instructions))
            .await?;
        parse_payload(&text)
    }
}

/// Decode the JSON array carried in a backend text response.
pub fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ProviderError> {
    let text = text.trim();
    if text.contains(UNAVAILABLE_MARKER) {
        return Err(ProviderError::Unavailable);
    }
    if !text.starts_with('[') && !text.starts_with('{') {
        return Err(ProviderError::Malformed("response is not JSON".into()));
    }
    let items: Vec<T> =
        serde_json::from_str(text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    if items.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_prose() {
        let err = parse_payload::<WisdomTip>("Sure! Here are some tips:").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_unavailable_marker() {
        let err = parse_payload::<WisdomTip>("[] AI temporarily unavailable").unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable));
    }

    #[test]
    fn parse_rejects_object_and_empty_list() {
        assert!(matches!(
            parse_payload::<WisdomTip>(r#"{"tips": []}"#),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            parse_payload::<WisdomTip>("  []  "),
            Err(ProviderError::Empty)
        ));
    }

    #[test]
    fn api_url_appends_path() {
        let provider = BackendProvider::new(Some(Url::parse("http://localhost:3000").unwrap()));
        assert_eq!(
            provider.api_url().unwrap().as_str(),
            "http://localhost:3000/api/ai"
        );
        let nested = BackendProvider::new(Some(Url::parse("http://host/base/").unwrap()));
        assert_eq!(nested.api_url().unwrap().as_str(), "http://host/base/api/ai");
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_fast() {
        let provider = BackendProvider::new(None);
        let err = provider.generate_wisdom_tips(None).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured));
    }
}
