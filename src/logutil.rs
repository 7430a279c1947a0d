//! Helpers for putting untrusted text (user queries, upstream bodies) into
//! single-line log records.

use std::fmt::Write;

/// Longest body excerpt logged after a failed decode.
pub const BODY_PREVIEW_CHARS: usize = 160;

/// Escape control characters so `s` stays on one log line, cutting it at
/// `max_chars` with a trailing ellipsis.
pub fn escape_log(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count == max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Quote a user-supplied query for logging.
pub fn quoted(query: &str) -> String {
    format!("\"{}\"", escape_log(query, 64))
}

/// Leading excerpt of an upstream body, whitespace runs collapsed.
pub fn body_preview(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    escape_log(&collapsed, BODY_PREVIEW_CHARS)
}
