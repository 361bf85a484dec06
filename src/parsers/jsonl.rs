use crate::error::ParseError;
use crate::speech::SpeechRecord;
use memchr::memchr_iter;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
const PARALLEL_BYTES: usize = 4 * 1024 * 1024;

pub fn parse_lines(input: &str) -> Result<Vec<SpeechRecord>, ParseError> {
    let lines = split_lines(input);

    #[cfg(feature = "parallel")]
    {
        if input.len() > PARALLEL_BYTES {
            return lines
                .into_par_iter()
                .map(|(n, line)| parse_line(n, line))
                .collect();
        }
    }

    lines
        .into_iter()
        .map(|(n, line)| parse_line(n, line))
        .collect()
}

/// Non-blank lines with their 1-based line numbers.
fn split_lines(input: &str) -> Vec<(usize, &str)> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut push = |n: usize, range: std::ops::Range<usize>| {
        let line = input[range].trim();
        if !line.is_empty() {
            out.push((n, line));
        }
    };
    let mut n = 0;
    for nl in memchr_iter(b'\n', bytes) {
        n += 1;
        push(n, start..nl);
        start = nl + 1;
    }
    if start < bytes.len() {
        push(n + 1, start..bytes.len());
    }
    out
}

fn parse_line(line_no: usize, line: &str) -> Result<SpeechRecord, ParseError> {
    serde_json::from_str(line).map_err(|source| ParseError::Line {
        line: line_no,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "{\"agendaItem\":{\"officialTitle\":\"TOP 1\",\"speechIndex\":1},\"people\":[{\"label\":\"A\"}]}\r\n\
\n\
{\"agendaItem\":{\"officialTitle\":\"TOP 1\",\"speechIndex\":2},\"people\":[{\"label\":\"B\"}]}";

    #[test]
    fn parse_sample() {
        let v = parse_lines(SAMPLE).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].people[0].label, "B");
    }

    #[test]
    fn reports_line_number() {
        let input = "{\"people\":[]}\n\n{broken\n";
        match parse_lines(input) {
            Err(ParseError::Line { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn blank_input() {
        assert!(parse_lines("\n  \n").unwrap().is_empty());
    }
}
