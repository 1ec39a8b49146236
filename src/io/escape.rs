//! JSON string unescaping.
//!
//! Only the single-character escape table is decoded. Anything else,
//! `\uXXXX` included, is kept verbatim so a malformed or unsupported
//! escape degrades the text instead of failing the reply.

/// Decodes the JSON single-character escapes in `raw`.
///
/// The table is `\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t`. The scan is
/// a single left-to-right pass: the output of one substitution is never
/// re-read, so `\\n` decodes to a backslash followed by `n`.
///
/// # Examples
///
/// ```
/// use chatline::io::unescape_json;
///
/// assert_eq!(unescape_json(r#"say \"hi\"\n"#), "say \"hi\"\n");
/// assert_eq!(unescape_json(r"\u00e9"), r"\u00e9");
/// ```
#[must_use]
pub fn unescape_json(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => {
                if let Some(decoded) = decode_escape(next) {
                    out.push(decoded);
                } else {
                    tracing::debug!(escape = %next, "leaving unrecognized escape verbatim");
                    out.push('\\');
                    out.push(next);
                }
            }
            // Lone trailing backslash.
            None => out.push('\\'),
        }
    }
    out
}

/// Maps the char after a backslash to its decoded value.
const fn decode_escape(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}
