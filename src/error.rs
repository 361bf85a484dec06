use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),
    #[error("speech #{index}: {source}")]
    AtSpeech {
        index: usize,
        #[source]
        source: Box<NormalizeError>,
    },
}

impl NormalizeError {
    /// Attach the position of the offending record in its session.
    pub fn at(self, index: usize) -> Self {
        NormalizeError::AtSpeech {
            index,
            source: Box::new(self),
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unknown input format: {0}. Use 'json', 'jsonl' or 'auto'")]
    UnknownFormat(String),
    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
