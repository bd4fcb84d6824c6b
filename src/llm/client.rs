use crate::config::NarrationConfig;
use crate::llm::types::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const REFERER: &str = "http://localhost";
const APP_TITLE: &str = "SME Financial Health Platform";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenRouter chat-completions client.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl OpenRouterClient {
    pub fn new(config: &NarrationConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::MissingCredential);
        };

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: request.messages(),
            temperature: request.temperature,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Value = res.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::MalformedPayload(e.to_string())
            }
        })?;

        let text = extract_content(&raw)?;
        Ok(Generation { text, raw })
    }
}

fn classify_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// Pulls the first choice's message text out of a chat-completions body.
pub(crate) fn extract_content(raw: &serde_json::Value) -> Result<String, ProviderError> {
    let body: ChatCompletionResponse = serde_json::from_value(raw.clone())
        .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;

    let content = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedPayload("Empty choices list".to_string()))?
        .message
        .content;

    if content.trim().is_empty() {
        return Err(ProviderError::MalformedPayload(
            "Model returned empty content".to_string(),
        ));
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_content() {
        let raw = json!({
            "id": "gen-123",
            "choices": [{"message": {"role": "assistant", "content": "Healthy margins."}}]
        });
        assert_eq!(extract_content(&raw).unwrap(), "Healthy margins.");
    }

    #[test]
    fn test_extract_content_rejects_malformed_bodies() {
        for raw in [
            json!({"choices": []}),
            json!({"error": {"message": "rate limited"}}),
            json!({"choices": [{"message": {"role": "assistant", "content": "  "}}]}),
        ] {
            assert!(matches!(
                extract_content(&raw),
                Err(ProviderError::MalformedPayload(_))
            ));
        }
    }

    #[test]
    fn test_client_uses_configured_model() {
        let config = NarrationConfig {
            model: "openai/gpt-4o-mini".to_string(),
            ..NarrationConfig::default()
        };
        assert_eq!(OpenRouterClient::new(&config).model(), "openai/gpt-4o-mini");
        assert_eq!(
            OpenRouterClient::new(&NarrationConfig::default()).model(),
            crate::config::DEFAULT_MODEL
        );
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let client = OpenRouterClient::new(&NarrationConfig::default());
        let request = GenerationRequest {
            system_prompt: "sys".to_string(),
            user_prompt: "usr".to_string(),
            temperature: 0.2,
        };

        assert!(matches!(
            client.generate(&request).await,
            Err(ProviderError::MissingCredential)
        ));
    }
}
