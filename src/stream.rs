//! Server-Sent Events decoding for streaming completion bodies.
//!
//! Split into a push-based [`SseParser`] that turns raw bytes into events and a
//! [`SseStream`] adapter that drives the parser from an HTTP body stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::error::ClientError;
use crate::http::HttpBodyStream;

/// Standardized SSE event produced by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Raw `data:` payload emitted by the endpoint.
    Data(String),
    /// Terminal marker reported via `[DONE]`.
    Done,
}

/// Incremental SSE parser.
///
/// Feed arbitrary byte slices in arrival order; completed events are appended
/// to the caller's queue. Multi-line `data:` fields belonging to one event are
/// joined with `\n`. Field lines other than `data:` (comments, `event:`, `id:`)
/// are ignored, and only the first `[DONE]` produces [`SseEvent::Done`].
#[derive(Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    data_lines: Vec<Vec<u8>>,
    done_seen: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes a chunk of body bytes, appending completed events to `out`.
    pub fn feed(&mut self, bytes: &[u8], out: &mut VecDeque<Result<SseEvent, ClientError>>) {
        self.buffer.extend_from_slice(bytes);
        while let Some(line) = Self::drain_line(&mut self.buffer) {
            if line.is_empty() {
                self.dispatch(out);
            } else {
                self.accept_line(line);
            }
        }
    }

    /// Flushes a trailing event left unterminated when the body ends.
    pub fn finish(&mut self, out: &mut VecDeque<Result<SseEvent, ClientError>>) {
        if !self.buffer.is_empty() {
            let line: Vec<u8> = self.buffer.drain(..).collect();
            self.accept_line(line);
        }
        self.dispatch(out);
    }

    fn accept_line(&mut self, line: Vec<u8>) {
        if let Some(rest) = line.strip_prefix(b"data:") {
            let payload = match rest.first() {
                Some(b' ') => &rest[1..],
                _ => rest,
            };
            self.data_lines.push(payload.to_vec());
        }
    }

    fn dispatch(&mut self, out: &mut VecDeque<Result<SseEvent, ClientError>>) {
        if self.data_lines.is_empty() {
            return;
        }
        let joined = self.data_lines.join(&b'\n');
        self.data_lines.clear();
        if joined.is_empty() {
            return;
        }
        let data = match String::from_utf8(joined) {
            Ok(data) => data,
            Err(err) => {
                out.push_back(Err(ClientError::malformed(format!(
                    "invalid UTF-8 in stream chunk: {err}"
                ))));
                return;
            }
        };
        if data.trim() == "[DONE]" {
            if !self.done_seen {
                self.done_seen = true;
                out.push_back(Ok(SseEvent::Done));
            }
        } else {
            out.push_back(Ok(SseEvent::Data(data)));
        }
    }

    fn drain_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
        buffer.iter().position(|b| *b == b'\n').map(|pos| {
            let mut line: Vec<u8> = buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            line
        })
    }
}

/// Lazy stream of [`SseEvent`]s decoded from an HTTP body.
///
/// The stream is finite and non-restartable: it fuses after yielding
/// [`SseEvent::Done`] or after the underlying body ends.
pub struct SseStream {
    body: HttpBodyStream,
    parser: SseParser,
    pending: VecDeque<Result<SseEvent, ClientError>>,
    body_closed: bool,
    terminated: bool,
}

impl SseStream {
    /// Wraps a raw HTTP body stream and prepares it for SSE decoding.
    pub fn new(body: HttpBodyStream) -> Self {
        Self {
            body,
            parser: SseParser::new(),
            pending: VecDeque::new(),
            body_closed: false,
            terminated: false,
        }
    }

    fn pop_pending(&mut self) -> Option<Result<SseEvent, ClientError>> {
        let item = self.pending.pop_front();
        if matches!(item, Some(Ok(SseEvent::Done))) {
            self.terminated = true;
        }
        item
    }
}

impl Stream for SseStream {
    type Item = Result<SseEvent, ClientError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.terminated && this.pending.is_empty() {
            return Poll::Ready(None);
        }
        if let Some(item) = this.pop_pending() {
            return Poll::Ready(Some(item));
        }

        loop {
            if this.body_closed {
                return Poll::Ready(None);
            }
            match this.body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.parser.feed(&bytes, &mut this.pending);
                    if let Some(item) = this.pop_pending() {
                        return Poll::Ready(Some(item));
                    }
                }
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Some(Err(err))),
                Poll::Ready(None) => {
                    this.body_closed = true;
                    this.parser.finish(&mut this.pending);
                    return match this.pop_pending() {
                        Some(item) => Poll::Ready(Some(item)),
                        None => Poll::Ready(None),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
