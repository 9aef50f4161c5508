//! Chat echo stream: a canned response derived from the client's message,
//! streamed word by word like an incremental text generation

use std::time::Duration;

use crate::codec::Frame;
use crate::config::ChatConfig;
use crate::error::StreamResult;
use crate::models::{now_rfc3339, ChatChunk, ChatDone};

use super::{Generator, Outcome, StreamKind};

pub struct ChatEcho {
    response: String,
    chunks: Vec<String>,
    cursor: usize,
    interval: Duration,
}

impl ChatEcho {
    /// Build a stream for the given `message` query parameter; a missing,
    /// empty or whitespace-only message falls back to the configured greeting
    pub fn new(config: &ChatConfig, message: Option<&str>) -> Self {
        let message = match message.map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => config.default_message.as_str(),
        };

        let response = format!(
            "Thanks for asking '{}'! Here's my response in chunks...",
            message
        );
        let chunks = split_into_chunks(&response);

        Self {
            response,
            chunks,
            cursor: 0,
            interval: Duration::from_millis(config.chunk_interval_ms),
        }
    }
}

/// Word-sized chunks whose concatenation reproduces the input exactly
fn split_into_chunks(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len().saturating_sub(1);
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == last {
                (*word).to_string()
            } else {
                format!("{} ", word)
            }
        })
        .collect()
}

impl Generator for ChatEcho {
    fn kind(&self) -> StreamKind {
        StreamKind::ChatEcho
    }

    fn next_event(&mut self) -> StreamResult<Outcome> {
        if self.cursor >= self.chunks.len() {
            let done = ChatDone {
                content: self.response.clone(),
                tokens: self.chunks.len() as u32,
                completed_at: now_rfc3339(),
            };
            return Ok(Outcome::Done(Some(Frame::json("done", &done)?)));
        }

        let payload = ChatChunk {
            chunk: self.chunks[self.cursor].clone(),
            index: self.cursor as u32,
            is_final: self.cursor == self.chunks.len() - 1,
        };

        let frame = Frame::json("chunk", &payload)?.with_id(self.cursor.to_string());
        self.cursor += 1;

        Ok(Outcome::Emit(frame, self.interval))
    }
}
