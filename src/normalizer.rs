use crate::config::MissingPolicy;
use crate::error::NormalizeError;
use crate::speech::{Matching, SpeechRecord, TextContent, ViewRecord};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::warn;

/// Proceeding indices at or above this value are offset; it is also the
/// stand-in for "no proceeding index".
const PROCEEDING_OFFSET: i64 = 1000;
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4096;

pub fn normalize(
    speeches: &[SpeechRecord],
    policy: MissingPolicy,
) -> Result<Vec<ViewRecord>, NormalizeError> {
    #[cfg(feature = "parallel")]
    {
        if speeches.len() > PARALLEL_THRESHOLD {
            let results: Vec<Result<ViewRecord, NormalizeError>> =
                speeches.par_iter().map(normalize_speech).collect();
            return collect(results.into_iter(), policy);
        }
    }
    collect(speeches.iter().map(normalize_speech), policy)
}

fn collect<I>(results: I, policy: MissingPolicy) -> Result<Vec<ViewRecord>, NormalizeError>
where
    I: ExactSizeIterator<Item = Result<ViewRecord, NormalizeError>>,
{
    let mut out = Vec::with_capacity(results.len());
    for (index, result) in results.enumerate() {
        match (result, policy) {
            (Ok(record), _) => out.push(record),
            (Err(e), MissingPolicy::Fail) => return Err(e.at(index)),
            (Err(e), MissingPolicy::Skip) => {
                warn!(index, error = %e, "skipping speech");
            }
        }
    }
    Ok(out)
}

pub fn normalize_speech(speech: &SpeechRecord) -> Result<ViewRecord, NormalizeError> {
    let item = speech
        .agenda_item
        .as_ref()
        .ok_or(NormalizeError::MissingRequiredField("agendaItem"))?;
    let speech_index = item
        .speech_index
        .ok_or(NormalizeError::MissingRequiredField("agendaItem.speechIndex"))?;
    let speaker = speech
        .people
        .first()
        .ok_or(NormalizeError::MissingRequiredField("people[0]"))?;

    let proceeding = proceeding_number(item.proceeding_index);
    let media = item.media_index.filter(|&m| m != 0).unwrap_or(0);
    let contents = speech.text_contents.as_deref().unwrap_or_default();

    Ok(ViewRecord {
        proceeding,
        media,
        title: item.official_title.clone(),
        speaker: speaker.label.clone(),
        url: format!("#speech{}", speech_index),
        matching: classify(proceeding, media),
        char_count: text_sum(contents, |t| t.chars().count()),
        word_count: text_sum(contents, |t| t.split(' ').count()),
        duration: speech.media.as_ref().map_or(0.0, |m| m.duration),
    })
}

/// Absent and zero both stand for "unset".
fn proceeding_number(raw: Option<i64>) -> i64 {
    let pi = raw.filter(|&p| p != 0).unwrap_or(PROCEEDING_OFFSET);
    if pi >= PROCEEDING_OFFSET {
        pi - PROCEEDING_OFFSET
    } else {
        pi
    }
}

// proceeding check wins over the media check
fn classify(proceeding: i64, media: i64) -> Matching {
    if proceeding == 0 {
        Matching::MediaOnly
    } else if media == 0 {
        Matching::ProceedingOnly
    } else {
        Matching::Matching
    }
}

fn text_sum(contents: &[TextContent], measure: impl Fn(&str) -> usize) -> usize {
    contents
        .iter()
        .flat_map(|tc| tc.text_body.iter())
        .map(|tb| measure(&tb.text))
        .sum()
}
