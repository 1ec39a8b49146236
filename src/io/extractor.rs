//! Incremental response-stream extractor.
//!
//! Finds a JSON string value inside a live response body without parsing
//! the JSON. The body is read char by char: a rolling look-behind window
//! looks for a literal pattern (by default `"content": "`), then chars are
//! captured until the first unescaped `"`. The captured text is unescaped
//! and returned at once; the rest of the stream is never read.
//!
//! Only the FIRST occurrence is captured. A server that spreads the reply
//! over many small JSON fragments (as streaming completion APIs do) would
//! yield just the first fragment here; requests are therefore sent without
//! asking for a streamed response, and a conformant server returns the
//! whole reply in one field.

use super::escape::unescape_json;
use super::utf8::Utf8Decoder;
use crate::error::ExtractError;
use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt;
use std::io::Read;

/// Literal text that precedes the reply in a chat-completion response.
pub const CONTENT_PATTERN: &str = "\"content\": \"";

/// Size of the read buffer used by [`extract_reader`].
const READ_CHUNK_SIZE: usize = 4096;

/// Phase of the extractor state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Looking for the pattern.
    Searching,
    /// Accumulating the value after the pattern.
    Capturing,
    /// A value has been returned; further input is ignored.
    Closed,
}

/// Single-pass state machine over a char stream.
///
/// Memory use is bounded by the pattern length plus the captured value.
/// Escape state lives in the struct, so input may be split anywhere,
/// including between a backslash and the char it escapes.
///
/// # Examples
///
/// ```
/// use chatline::io::StreamExtractor;
///
/// let mut extractor = StreamExtractor::default();
/// assert_eq!(extractor.feed(r#"{"role": "assistant", "cont"#), None);
/// assert_eq!(
///     extractor.feed(r#"ent": "hi \"there\""}"#),
///     Some("hi \"there\"".to_string())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StreamExtractor {
    pattern: Vec<char>,
    window: VecDeque<char>,
    phase: Phase,
    escaping: bool,
    captured: String,
    consumed: usize,
}

impl StreamExtractor {
    /// Creates an extractor looking for `pattern`.
    ///
    /// An empty pattern starts capturing at the first char, so that char
    /// is part of the value. The CLI refuses an empty pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let pattern: Vec<char> = pattern.chars().collect();
        let phase = if pattern.is_empty() {
            Phase::Capturing
        } else {
            Phase::Searching
        };
        Self {
            window: VecDeque::with_capacity(pattern.len()),
            pattern,
            phase,
            escaping: false,
            captured: String::new(),
            consumed: 0,
        }
    }

    /// Consumes one char.
    ///
    /// # Returns
    ///
    /// The unescaped value when this char closes it, otherwise `None`.
    /// A value is returned at most once per extractor.
    pub fn push(&mut self, c: char) -> Option<String> {
        if self.phase == Phase::Closed {
            return None;
        }
        self.consumed += 1;

        // A backslash never reaches the window; while capturing it is kept
        // raw and decoded when the value closes.
        if c == '\\' && !self.escaping {
            self.escaping = true;
            if self.phase == Phase::Capturing {
                self.captured.push(c);
            }
            return None;
        }

        match self.phase {
            Phase::Searching => self.search(c),
            Phase::Capturing => {
                if c == '"' && !self.escaping {
                    return Some(self.close());
                }
                self.captured.push(c);
            }
            Phase::Closed => {}
        }

        self.escaping = false;
        None
    }

    /// Consumes a run of chars, stopping at the first completed value.
    pub fn feed(&mut self, text: &str) -> Option<String> {
        text.chars().find_map(|c| self.push(c))
    }

    /// Classifies why the stream ended without a value.
    #[must_use]
    pub fn into_error(self) -> ExtractError {
        match self.phase {
            Phase::Capturing => ExtractError::Incomplete {
                captured: self.captured,
            },
            Phase::Searching | Phase::Closed => ExtractError::NotFound,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the number of chars consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    fn search(&mut self, c: char) {
        if self.window.len() == self.pattern.len() {
            self.window.pop_front();
        }
        self.window.push_back(c);

        if self.window.iter().eq(self.pattern.iter()) {
            tracing::debug!(offset = self.consumed, "reply field located");
            self.phase = Phase::Capturing;
            self.window.clear();
        }
    }

    fn close(&mut self) -> String {
        self.phase = Phase::Closed;
        self.escaping = false;
        let raw = std::mem::take(&mut self.captured);
        tracing::debug!(
            consumed = self.consumed,
            raw_len = raw.len(),
            "reply field closed"
        );
        unescape_json(&raw)
    }
}

impl Default for StreamExtractor {
    fn default() -> Self {
        Self::new(CONTENT_PATTERN)
    }
}

/// Extracts the first value following `pattern` from a chunked byte stream.
///
/// Chunks are decoded with a [`Utf8Decoder`], so multi-byte chars split
/// across chunks are handled. A stream error (dropped connection,
/// cancelled transfer) is logged and treated as the end of the stream.
///
/// # Errors
///
/// Returns [`ExtractError::NotFound`] if the pattern never appears, or
/// [`ExtractError::Incomplete`] if the stream ends inside the value.
pub async fn extract<S, B, E>(mut body: S, pattern: &str) -> Result<String, ExtractError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    let mut decoder = Utf8Decoder::new();
    let mut extractor = StreamExtractor::new(pattern);
    let mut text = String::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    consumed = extractor.consumed(),
                    "response stream failed; treating as end of stream"
                );
                break;
            }
        };

        text.clear();
        decoder.decode(chunk.as_ref(), &mut text);
        if let Some(value) = extractor.feed(&text) {
            return Ok(value);
        }
    }

    text.clear();
    decoder.finish(&mut text);
    if let Some(value) = extractor.feed(&text) {
        return Ok(value);
    }
    Err(extractor.into_error())
}

/// Extracts the first value following `pattern` from a blocking reader.
///
/// Used for saved response bodies. Read errors end the stream, as in
/// [`extract`].
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_reader<R: Read>(mut reader: R, pattern: &str) -> Result<String, ExtractError> {
    let mut decoder = Utf8Decoder::new();
    let mut extractor = StreamExtractor::new(pattern);
    let mut buf = [0u8; READ_CHUNK_SIZE];
    let mut text = String::new();

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "read failed; treating as end of stream");
                break;
            }
        };

        text.clear();
        decoder.decode(&buf[..read], &mut text);
        if let Some(value) = extractor.feed(&text) {
            return Ok(value);
        }
    }

    text.clear();
    decoder.finish(&mut text);
    if let Some(value) = extractor.feed(&text) {
        return Ok(value);
    }
    Err(extractor.into_error())
}
