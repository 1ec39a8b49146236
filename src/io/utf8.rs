//! Incremental UTF-8 decoding.
//!
//! Network bodies arrive in chunks that can end in the middle of a
//! multi-byte character. The decoder holds back the incomplete tail and
//! completes it with the next chunk, so callers always see whole chars.

use std::borrow::Cow;
use std::char::REPLACEMENT_CHARACTER;

/// Stateful UTF-8 decoder for chunked byte input.
///
/// Invalid sequences are replaced with U+FFFD rather than aborting the
/// stream. At most three bytes are ever held back between chunks.
///
/// # Examples
///
/// ```
/// use chatline::io::Utf8Decoder;
///
/// let bytes = "世".as_bytes();
/// let mut decoder = Utf8Decoder::new();
/// let mut out = String::new();
///
/// decoder.decode(&bytes[..1], &mut out);
/// assert_eq!(out, "");
/// decoder.decode(&bytes[1..], &mut out);
/// assert_eq!(out, "世");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Utf8Decoder {
    /// Bytes of an incomplete trailing sequence from the previous chunk.
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Creates a decoder with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decodes one chunk, appending complete chars to `out`.
    ///
    /// # Arguments
    ///
    /// * `chunk` - The next bytes of the stream.
    /// * `out` - Destination for decoded text.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        let input: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            Cow::Owned(joined)
        };

        let mut rest: &[u8] = &input;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        out.push_str(text);
                    }
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            // Sequence cut off by the chunk boundary.
                            self.pending.extend_from_slice(tail);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Flushes the decoder at end of stream.
    ///
    /// A sequence still pending at this point can never be completed and
    /// is emitted as a single U+FFFD.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(REPLACEMENT_CHARACTER);
        }
    }

    /// Returns the number of bytes held back for the next chunk.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
