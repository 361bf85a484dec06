use crate::error::ParseError;
use crate::speech::SpeechRecord;

pub fn parse_session(input: &str) -> Result<Vec<SpeechRecord>, ParseError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
  {
    "agendaItem": { "proceedingIndex": 1003, "mediaIndex": 2, "officialTitle": "TOP 2", "speechIndex": 3 },
    "people": [{ "label": "Jane Doe" }],
    "media": { "duration": 61.0 }
  },
  {
    "agendaItem": { "officialTitle": "TOP 2", "speechIndex": 4 },
    "people": [{ "label": "John Roe" }],
    "textContents": [{ "textBody": [{ "text": "Vielen Dank." }] }]
  }
]"#;

    #[test]
    fn parse_sample() {
        let v = parse_session(SAMPLE).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].people[0].label, "Jane Doe");
        assert!(v[1].media.is_none());
    }

    #[test]
    fn empty_session() {
        assert!(parse_session("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(parse_session("{}"), Err(ParseError::Json(_))));
    }
}
