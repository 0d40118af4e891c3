//! Per-line parsing of access-log entries
//!
//! A line is well-formed when it has at least one whitespace-delimited
//! token (the client address) and a bracketed timestamp whose second
//! colon-delimited field is the hour label:
//!
//! `203.0.113.7 - - [10/Oct/2023:13:55:36 -0700] "GET /index.html HTTP/1.1" 200 512`

use regex::Regex;

/// Address and hour label extracted from one log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub address: &'a str,
    pub hour: &'a str,
}

/// The first `[...]` group on the line is the timestamp.
fn timestamp_re() -> &'static Regex {
    static TIMESTAMP_RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    TIMESTAMP_RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]").unwrap())
}

/// Extract the client address and hour label from one log line.
///
/// Returns `None` for any line that is not well-formed: no tokens, no
/// bracketed timestamp, or a timestamp with fewer than two colon-delimited
/// fields. Callers skip such lines; they are never an error.
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let address = line.split_whitespace().next()?;
    let timestamp = timestamp_re().captures(line)?.get(1)?.as_str();
    let hour = timestamp.split(':').nth(1)?;
    Some(ParsedLine { address, hour })
}
