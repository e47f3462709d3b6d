//! Server-sent event stream of remote changes.

use super::BudgetsyncClient;
use crate::error::{ClientError, Result};
use budgetsync_core::remote::RemoteEvent;

impl BudgetsyncClient {
    /// Watch the backend's change events.
    ///
    /// The stream ends when the server closes the connection. A transport
    /// failure is yielded once and ends the stream; a malformed event is
    /// yielded as an error and the stream keeps going.
    pub async fn watch_events(
        &self,
    ) -> Result<impl futures_core::Stream<Item = Result<RemoteEvent>> + Send + 'static> {
        let response = self
            .client
            .get(self.url("/api/events"))
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError {
                status: response.status().as_u16(),
                message: "Failed to connect to SSE endpoint".to_string(),
            });
        }

        tracing::debug!(url = %response.url(), "Connected to event stream");

        let stream = async_stream::stream! {
            use tokio_stream::StreamExt;

            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        buffer.extend(chunk.iter().filter(|b| **b != b'\r'));

                        // Parse complete SSE events from buffer
                        while let Some(pos) = find_event_end(&buffer) {
                            let raw: Vec<u8> = buffer.drain(..pos + 2).collect();
                            let event_str = String::from_utf8_lossy(&raw[..pos]);

                            if let Some(event) = parse_sse_event(&event_str) {
                                yield event;
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(ClientError::Connection(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(stream)
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Parse an SSE event from a string.
///
/// Returns `None` for events without data, such as keep-alive comments.
/// Multiple `data:` lines are joined with newlines.
fn parse_sse_event(event_str: &str) -> Option<Result<RemoteEvent>> {
    let data: Vec<&str> = event_str
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if data.is_empty() {
        return None;
    }

    let payload = data.join("\n");
    Some(
        serde_json::from_str(&payload)
            .map_err(|e| ClientError::SseParse(format!("{}: {}", e, payload))),
    )
}
