//! I/O layer for chatline.
//!
//! Incremental decoding of response bodies (UTF-8 and JSON escapes), the
//! response-stream extractor, and small file helpers.

pub mod escape;
pub mod extractor;
pub mod reader;
pub mod utf8;

pub use escape::unescape_json;
pub use extractor::{CONTENT_PATTERN, Phase, StreamExtractor, extract, extract_reader};
pub use reader::{open_input, read_file, write_file};
pub use utf8::Utf8Decoder;
