//! Lazy fragment stream over an SSE body
//!
//! Each `next()` performs blocking reads until one non-empty content delta
//! is available. Nothing is buffered beyond the current line.
//!
//! Termination:
//! - `data: [DONE]` or end of body → `None`
//! - transport or protocol failure → one `Some(Err(_))`, then `None`
//!
//! Dropping the stream early closes the connection.

use crate::llm::adapters::openai::{parse_sse_line, SseEvent};
use crate::llm::adapters::transport::LineReader;
use crate::llm::adapters::AdapterError;
use crate::llm::engine::EngineError;
use std::fmt;
use std::iter::FusedIterator;

pub struct FragmentStream {
    /// `None` once the stream has terminated
    reader: Option<LineReader>,
    line: String,
    fragments: usize,
    lane: &'static str,
}

impl FragmentStream {
    pub(crate) fn new(reader: LineReader, lane: &'static str) -> Self {
        Self {
            reader: Some(reader),
            line: String::new(),
            fragments: 0,
            lane,
        }
    }

    /// Number of fragments yielded so far
    pub fn fragments_yielded(&self) -> usize {
        self.fragments
    }

    pub fn is_finished(&self) -> bool {
        self.reader.is_none()
    }

    /// Drain the stream into the full reply
    ///
    /// On failure the partial text is discarded and only the error returned.
    pub fn collect_reply(self) -> Result<String, EngineError> {
        let mut reply = String::new();
        for fragment in self {
            reply.push_str(&fragment?);
        }
        Ok(reply)
    }

    /// Stop consuming and close the connection
    pub fn cancel(mut self) {
        if self.reader.take().is_some() {
            tracing::info!(lane = self.lane, fragments = self.fragments, "stream cancelled");
        }
    }

    fn finish(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!(lane = self.lane, fragments = self.fragments, "stream finished");
        }
    }

    fn fail(&mut self, err: AdapterError) -> Option<Result<String, EngineError>> {
        tracing::warn!(lane = self.lane, fragments = self.fragments, error = %err, "stream failed");
        self.reader = None;
        Some(Err(EngineError::Transport(err)))
    }
}

impl Iterator for FragmentStream {
    type Item = Result<String, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            self.line.clear();
            let read = match reader.read_line(&mut self.line) {
                Ok(read) => read,
                Err(e) => return self.fail(e.into()),
            };
            if read == 0 {
                self.finish();
                return None;
            }

            match parse_sse_line(&self.line) {
                Ok(SseEvent::Delta(text)) => {
                    self.fragments += 1;
                    return Some(Ok(text));
                }
                Ok(SseEvent::Done) => {
                    self.finish();
                    return None;
                }
                Ok(SseEvent::Skip) => continue,
                Err(e) => return self.fail(e),
            }
        }
    }
}

impl FusedIterator for FragmentStream {}

impl Drop for FragmentStream {
    fn drop(&mut self) {
        if self.reader.is_some() {
            tracing::debug!(
                lane = self.lane,
                fragments = self.fragments,
                "stream dropped before end, closing connection"
            );
        }
    }
}

impl fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentStream")
            .field("lane", &self.lane)
            .field("fragments", &self.fragments)
            .field("finished", &self.is_finished())
            .finish()
    }
}
