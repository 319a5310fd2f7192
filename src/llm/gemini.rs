use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use async_trait::async_trait;

use super::provider::GenerationProvider;
use super::types::{ChatMessage, GenerationConfig, SAFETY_CATEGORIES_OFF};
use crate::core::errors::ApiError;

/// Client for the Gemini `streamGenerateContent` SSE endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client: Client::new(),
        }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

fn build_request_body(messages: &[ChatMessage], config: &GenerationConfig) -> Value {
    let contents: Vec<Value> = messages
        .iter()
        .map(|msg| {
            json!({
                "role": msg.role,
                "parts": [{ "text": msg.content }],
            })
        })
        .collect();

    let safety_settings: Vec<Value> = SAFETY_CATEGORIES_OFF
        .iter()
        .map(|category| json!({ "category": category, "threshold": "OFF" }))
        .collect();

    json!({
        "contents": contents,
        "generationConfig": {
            "temperature": config.temperature,
            "topP": config.top_p,
            "maxOutputTokens": config.max_output_tokens,
        },
        "safetySettings": safety_settings,
    })
}

/// Text carried by one streamed response chunk, if any.
fn chunk_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn stream_generate(
        &self,
        messages: Vec<ChatMessage>,
        config: &GenerationConfig,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        let body = build_request_body(&messages, config);

        let res = self
            .client
            .post(self.stream_url())
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "Gemini API returned {}: {}",
                status, text
            )));
        }

        let (tx, rx) = mpsc::channel(32);
        let mut stream = res.bytes_stream();

        tokio::spawn(async move {
            let mut buffer = String::new();
            while let Some(item) = stream.next().await {
                match item {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));

                        while let Some(line_end) = buffer.find('\n') {
                            let line = buffer[..line_end].trim().to_string();
                            buffer.drain(..=line_end);

                            if line.is_empty() || line.starts_with(':') {
                                continue;
                            }
                            let Some(data) = line.strip_prefix("data: ") else {
                                continue;
                            };

                            let payload: Value = match serde_json::from_str(data) {
                                Ok(payload) => payload,
                                Err(_) => continue,
                            };

                            if let Some(error) = payload.get("error") {
                                let message = error
                                    .get("message")
                                    .and_then(|m| m.as_str())
                                    .unwrap_or("upstream rejected the request");
                                let _ = tx.send(Err(ApiError::Upstream(message.to_string()))).await;
                                return;
                            }

                            if let Some(text) = chunk_text(&payload) {
                                if tx.send(Ok(text)).await.is_err() {
                                    // receiver gone, caller disconnected
                                    return;
                                }
                            }
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(Err(ApiError::upstream(err))).await;
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_fixed_generation_config() {
        let messages = vec![
            ChatMessage::new("user", "How do I enroll?"),
            ChatMessage::new("model", "Log in to the portal."),
        ];
        let body = build_request_body(&messages, &GenerationConfig::default());

        assert_eq!(body["contents"].as_array().unwrap().len(), 2);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert_eq!(body["generationConfig"]["topP"], 0.8);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);

        let safety = body["safetySettings"].as_array().unwrap();
        assert_eq!(safety.len(), 4);
        assert!(safety.iter().all(|s| s["threshold"] == "OFF"));
    }

    #[test]
    fn chunk_text_joins_candidate_parts() {
        let payload = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "You " }, { "text": "can " }]
                }
            }]
        });
        assert_eq!(chunk_text(&payload).unwrap(), "You can ");
    }

    #[test]
    fn chunk_text_ignores_textless_chunks() {
        let payload = json!({
            "candidates": [{ "finishReason": "STOP", "content": { "parts": [] } }]
        });
        assert_eq!(chunk_text(&payload), None);
        assert_eq!(chunk_text(&json!({ "usageMetadata": {} })), None);
    }
}
