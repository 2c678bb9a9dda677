//! Server-sent events transport over the backend's streaming query endpoint.
//!
//! Each send is one `POST` whose response body is an SSE stream. A spawned
//! task reads the byte stream, splits it into lines and forwards every
//! `data:` payload into the session's event channel. Fragments of one
//! response therefore arrive in the order the backend wrote them.

use async_trait::async_trait;
use futures::StreamExt;
use lexchat_config::AppConfig;
use lexchat_core::{BackendEvent, EventReceiver, OutboundSend, SessionId, Transport, TransportError};
use std::string::FromUtf8Error;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, trace, warn};

type EventSender = mpsc::Sender<Result<BackendEvent, TransportError>>;

/// One line of an SSE body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Blank line, comment, or a field we don't use (`event:`, `id:`)
    Skip,
    Event(BackendEvent),
    /// A `data:` payload that isn't a valid event
    Invalid(String),
}

/// Classify one line (without its terminator).
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Skip;
    }
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return SseLine::Event(BackendEvent::done());
    }
    match BackendEvent::from_json(data) {
        Ok(event) => SseLine::Event(event),
        Err(e) => SseLine::Invalid(e.to_string()),
    }
}

/// Pull every complete line out of `buf`, leaving a partial tail behind.
///
/// Lines are decoded only once whole, so a character split across two
/// network chunks is reassembled before decoding.
fn take_lines(buf: &mut Vec<u8>) -> Vec<Result<String, FromUtf8Error>> {
    let mut lines = Vec::new();
    while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
        let mut line: Vec<u8> = buf.drain(..=pos).collect();
        line.pop();
        lines.push(String::from_utf8(line));
    }
    lines
}

pub struct SseTransport {
    url: String,
    client: reqwest::Client,
    buffer: usize,
    /// Sender for the connected session's inbound channel
    events_tx: Mutex<Option<EventSender>>,
}

impl SseTransport {
    pub fn new(url: impl Into<String>, timeout: Duration, buffer: usize) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
            buffer: buffer.max(1),
            events_tx: Mutex::new(None),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        Self::new(
            config.backend.stream_url(),
            Duration::from_secs(config.backend.request_timeout_secs),
            config.session.event_buffer,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for SseTransport {
    fn name(&self) -> &str {
        "sse"
    }

    async fn connect(&self, session_id: &SessionId) -> Result<EventReceiver, TransportError> {
        let (tx, rx) = mpsc::channel(self.buffer);
        *self.events_tx.lock().await = Some(tx);
        info!(session_id = %session_id, url = %self.url, "SSE transport ready");
        Ok(rx)
    }

    async fn send(&self, request: &OutboundSend) -> Result<(), TransportError> {
        let tx = self
            .events_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| TransportError::NotConnected("sse transport not connected".into()))?;

        debug!(url = %self.url, agent = %request.agent_type, "Sending streaming query");

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::SendFailed {
                transport: "sse".into(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Backend rejected query");
            let _ = tx
                .send(Err(TransportError::Http {
                    status_code: status,
                    message: body,
                }))
                .await;
            return Ok(());
        }

        // Spawn task to read the SSE byte stream and forward events
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();
            let mut finished = false;

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(TransportError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };
                buffer.extend_from_slice(&bytes);

                for line in take_lines(&mut buffer) {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            warn!(error = %e, "Skipping SSE line that is not valid UTF-8");
                            continue;
                        }
                    };
                    match parse_sse_line(&line) {
                        SseLine::Skip => {}
                        SseLine::Invalid(reason) => trace!(reason = %reason, "Skipping unparseable SSE line"),
                        SseLine::Event(event) => {
                            let terminal = event.error.is_some() || event.done == Some(true);
                            if tx.send(Ok(event)).await.is_err() {
                                // Session went away (closed or replaced).
                                return;
                            }
                            if terminal {
                                finished = true;
                            }
                        }
                    }
                }
            }

            let tail = match String::from_utf8(buffer) {
                Ok(tail) => tail,
                Err(e) => {
                    warn!(error = %e, "Dropping trailing SSE bytes that are not valid UTF-8");
                    String::new()
                }
            };
            if let SseLine::Event(event) = parse_sse_line(&tail) {
                finished |= event.error.is_some() || event.done == Some(true);
                if tx.send(Ok(event)).await.is_err() {
                    return;
                }
            }

            if !finished {
                let _ = tx
                    .send(Err(TransportError::StreamInterrupted(
                        "response ended before done".into(),
                    )))
                    .await;
            }
        });

        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        info!(url = %self.url, "SSE transport closed");
        self.events_tx.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_line_parses_event() {
        let line = r#"data: {"content": "Under the UCC", "agent": "LegalAdvisor"}"#;
        let SseLine::Event(event) = parse_sse_line(line) else {
            panic!("expected event");
        };
        assert_eq!(event.content.as_deref(), Some("Under the UCC"));
        assert_eq!(event.agent.as_deref(), Some("LegalAdvisor"));
    }

    #[test]
    fn done_marker_and_done_object() {
        assert_eq!(parse_sse_line(r#"data: {"done": true}"#), SseLine::Event(BackendEvent::done()));
        assert_eq!(parse_sse_line("data: [DONE]"), SseLine::Event(BackendEvent::done()));
    }

    #[test]
    fn carriage_return_and_no_space() {
        let SseLine::Event(event) = parse_sse_line("data:{\"error\":\"boom\"}\r") else {
            panic!("expected event");
        };
        assert_eq!(event.error.as_deref(), Some("boom"));
    }

    #[test]
    fn non_data_lines_skipped() {
        assert_eq!(parse_sse_line(""), SseLine::Skip);
        assert_eq!(parse_sse_line("\r"), SseLine::Skip);
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Skip);
        assert_eq!(parse_sse_line("event: message"), SseLine::Skip);
        assert_eq!(parse_sse_line("id: 7"), SseLine::Skip);
    }

    #[test]
    fn garbage_payload_is_invalid() {
        assert!(matches!(parse_sse_line("data: {not json"), SseLine::Invalid(_)));
    }

    #[test]
    fn char_split_across_chunks_is_reassembled() {
        let wire = "data: {\"content\": \"Section \u{201c}Term\u{201d}\"}\n".as_bytes();
        // Cut inside the three bytes of the opening quote.
        let cut = wire.iter().position(|b| *b == 0xE2).unwrap() + 1;
        let mut buf = Vec::new();

        buf.extend_from_slice(&wire[..cut]);
        assert!(take_lines(&mut buf).is_empty());

        buf.extend_from_slice(&wire[cut..]);
        let lines = take_lines(&mut buf);
        assert_eq!(lines.len(), 1);
        assert!(buf.is_empty());

        let line = lines.into_iter().next().unwrap().unwrap();
        let SseLine::Event(event) = parse_sse_line(&line) else {
            panic!("expected event");
        };
        assert_eq!(event.content.as_deref(), Some("Section \u{201c}Term\u{201d}"));
    }

    #[test]
    fn invalid_utf8_line_is_isolated() {
        let mut buf = b"data: {\"content\": \"a\"}\n\xff\xfe\ndata: {\"done\": true}\ndata: {".to_vec();
        let lines = take_lines(&mut buf);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].is_ok());
        assert!(lines[1].is_err());
        assert_eq!(lines[2].as_deref().unwrap(), "data: {\"done\": true}");
        assert_eq!(buf, b"data: {");
    }

    #[test]
    fn from_config_uses_stream_url() {
        let transport = SseTransport::from_config(&AppConfig::default()).unwrap();
        assert_eq!(transport.url(), "http://localhost:8000/query/stream");
        assert_eq!(transport.name(), "sse");
    }

    #[tokio::test]
    async fn send_before_connect_fails() {
        let transport = SseTransport::from_config(&AppConfig::default()).unwrap();
        let request = OutboundSend {
            message: "hi".into(),
            agent_type: Default::default(),
            session_id: SessionId::from("s"),
            user_id: None,
        };
        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected(_)));
    }
}
