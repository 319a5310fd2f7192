use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{ChatMessage, GenerationConfig};
use crate::core::errors::ApiError;

/// Streaming interface to a generative-language-model service.
///
/// `stream_generate` issues one outbound streaming call and returns a
/// receiver of text increments in arrival order. The sequence is finite
/// and consumed exactly once; a fault at any point surfaces as a single
/// terminal `Err` item. Dropping the receiver cancels the call.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// provider name (e.g. "gemini")
    fn name(&self) -> &str;

    async fn stream_generate(
        &self,
        messages: Vec<ChatMessage>,
        config: &GenerationConfig,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError>;
}
