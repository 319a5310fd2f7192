use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::sse::{Event, Sse};
use axum::Json;
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::context::ConversationWindow;
use crate::core::errors::ApiError;
use crate::llm::ChatMessage;
use crate::relay::{encode_event, run_relay, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Streaming chat endpoint.
///
/// Validation failures are ordinary error responses; once the event
/// stream opens, all failures travel as `error` events inside it.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let ctx = RequestContext::new();

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info!(
        "[{}] chat request received: {} messages, user agent: {}",
        ctx.id,
        request.messages.len(),
        user_agent
    );

    if request.messages.is_empty() {
        tracing::warn!("[{}] no messages provided", ctx.id);
        return Err(ApiError::BadRequest("No messages provided".to_string()));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        let summary: Vec<String> = request
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role, preview(&m.content)))
            .collect();
        tracing::debug!("[{}] conversation: {}", ctx.id, summary.join(" | "));
    }

    let window = ConversationWindow::from_history(&request.messages);
    tracing::info!(
        "[{}] using {} of {} turns, model: {}",
        ctx.id,
        window.history_len(),
        request.messages.len(),
        state.settings.model.name
    );

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(run_relay(
        ctx,
        window,
        state.provider.clone(),
        state.pricing,
        tx,
    ));

    let stream = stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|event| (Ok::<Event, Infallible>(encode_event(&event)), rx))
    });

    Ok(Sse::new(stream))
}

fn preview(content: &str) -> String {
    const LIMIT: usize = 100;
    if content.chars().count() > LIMIT {
        let head: String = content.chars().take(LIMIT).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_content() {
        let short = "short message";
        assert_eq!(preview(short), short);

        let long = "x".repeat(150);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn missing_messages_field_deserializes_as_empty() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.messages.is_empty());
    }
}
