//! Session data as produced by the proceedings/media merger, and the flat
//! record shape handed to charts.

use serde::{Deserialize, Serialize};

/// One speech of a plenary session. Only the attributes the normalizer and
/// the statistics read are modelled; anything else in the file is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecord {
    pub agenda_item: Option<AgendaItem>,
    #[serde(default)]
    pub people: Vec<Person>,
    pub text_contents: Option<Vec<TextContent>>,
    pub media: Option<Media>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub electoral_period: Option<Numbered>,
    pub session: Option<Numbered>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub proceeding_index: Option<i64>,
    pub media_index: Option<i64>,
    #[serde(default)]
    pub official_title: String,
    pub speech_index: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_body: Vec<TextBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Numbered {
    pub number: Option<u32>,
}

/// How a speech links to the two upstream sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matching {
    /// Only present in the media stream.
    MediaOnly,
    /// Only present in the written proceedings.
    ProceedingOnly,
    Matching,
}

impl Matching {
    pub fn as_str(&self) -> &'static str {
        match self {
            Matching::MediaOnly => "media_only",
            Matching::ProceedingOnly => "proceeding_only",
            Matching::Matching => "matching",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub proceeding: i64,
    pub media: i64,
    pub title: String,
    pub speaker: String,
    pub url: String,
    pub matching: Matching,
    pub char_count: usize,
    pub word_count: usize,
    pub duration: f64,
}
