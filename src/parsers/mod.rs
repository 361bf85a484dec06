pub mod json;
pub mod jsonl;

use crate::error::ParseError;
use crate::speech::SpeechRecord;

pub fn parse(format: &str, input: &str) -> Result<Vec<SpeechRecord>, ParseError> {
    match format {
        "json" => json::parse_session(input),
        "jsonl" | "ndjson" => jsonl::parse_lines(input),
        "auto" => parse(detect(input), input),
        _ => Err(ParseError::UnknownFormat(format.to_string())),
    }
}

/// A merged session file is a single array; anything else is taken as one
/// speech per line.
fn detect(input: &str) -> &'static str {
    match input.trim_start().as_bytes().first() {
        Some(b'[') => "json",
        _ => "jsonl",
    }
}
