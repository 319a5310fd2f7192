//! Relay loop: drives one streaming generation and owns the outward
//! event sequence.
//!
//! Per request the caller observes zero or more `content` events, then
//! exactly one of `metrics` (followed by the `[DONE]` marker) or
//! `error` (after which the stream simply ends).

use std::sync::Arc;
use std::time::Instant;

use axum::response::sse;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::context::ConversationWindow;
use crate::core::errors::ApiError;
use crate::llm::types::GenerationConfig;
use crate::llm::GenerationProvider;
use crate::metrics::{self, PricingTable, UsageMetrics};

/// Literal payload of the terminal frame on the success path.
pub const DONE_MARKER: &str = "[DONE]";

/// One event in the outward stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Content { content: String },
    Metrics(UsageMetrics),
    Error { error: String },
    Done,
}

/// Correlation id and arrival time for one request. Request scoped,
/// discarded on completion.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub id: String,
    pub received: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            received: Instant::now(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire payload for one event. `Done` maps to the literal marker, every
/// other event to its JSON encoding.
pub fn event_payload(event: &StreamEvent) -> String {
    match event {
        StreamEvent::Done => DONE_MARKER.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

pub fn encode_event(event: &StreamEvent) -> sse::Event {
    sse::Event::default().data(event_payload(event))
}

/// Drives the provider stream to exhaustion exactly once, forwarding
/// each increment as it arrives and closing with metrics or an error.
///
/// A closed `tx` means the caller went away; the loop stops and
/// dropping the provider receiver cancels the upstream call.
pub async fn run_relay(
    ctx: RequestContext,
    window: ConversationWindow,
    provider: Arc<dyn GenerationProvider>,
    pricing: PricingTable,
    tx: mpsc::Sender<StreamEvent>,
) {
    let generation_started = Instant::now();

    let mut stream = match provider
        .stream_generate(window.messages().to_vec(), &GenerationConfig::default())
        .await
    {
        Ok(rx) => rx,
        Err(err) => {
            tracing::error!("[{}] generation failed to start: {}", ctx.id, err);
            let _ = tx
                .send(StreamEvent::Error {
                    error: err.to_string(),
                })
                .await;
            return;
        }
    };

    let mut full_response = String::new();
    let mut chunk_count: u64 = 0;

    while let Some(chunk_result) = stream.recv().await {
        match chunk_result {
            Ok(chunk) => {
                if chunk.is_empty() {
                    continue;
                }
                full_response.push_str(&chunk);
                chunk_count += 1;
                if tx.send(StreamEvent::Content { content: chunk }).await.is_err() {
                    tracing::info!("[{}] caller disconnected, cancelling generation", ctx.id);
                    return;
                }
            }
            Err(err) => {
                tracing::error!(
                    "[{}] generation failed after {} chunks: {}",
                    ctx.id,
                    chunk_count,
                    err
                );
                let _ = tx
                    .send(StreamEvent::Error {
                        error: err.to_string(),
                    })
                    .await;
                return;
            }
        }
    }

    let usage = metrics::compute(
        &window,
        &full_response,
        ctx.received.elapsed(),
        generation_started.elapsed(),
        chunk_count,
        &pricing,
    );

    tracing::info!(
        "[{}] generation complete: {} chunks, {} tokens ({} in / {} out), ${:.6}, {:.2}s total",
        ctx.id,
        usage.chunk_count,
        usage.total_tokens,
        usage.input_tokens,
        usage.output_tokens,
        usage.cost,
        usage.latency
    );

    if tx.send(StreamEvent::Metrics(usage)).await.is_err() {
        return;
    }
    let _ = tx.send(StreamEvent::Done).await;
}
