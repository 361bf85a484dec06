//! Matching statistics for merged sessions.
//!
//! A merged session mixes speeches found in both sources with speeches only
//! one source knows about. The share of media items without a proceedings
//! counterpart is the headline number when judging a merge.

use crate::speech::{Matching, SpeechRecord, ViewRecord};
use chrono::{DateTime, NaiveDateTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub session: String,
    pub speeches: usize,
    pub matching: usize,
    /// Proceedings items with no media counterpart.
    pub unmatched_proceedings: usize,
    /// Media items with no proceedings counterpart.
    pub unmatched_media: usize,
    pub char_count: usize,
    pub word_count: usize,
    pub duration: f64,
    /// Seconds from the earliest start to the latest end, when the speeches
    /// carry parseable timestamps.
    pub span_seconds: Option<i64>,
}

impl SessionStats {
    pub fn from_records(session: &str, records: &[ViewRecord], speeches: &[SpeechRecord]) -> Self {
        let count = |m: Matching| records.iter().filter(|r| r.matching == m).count();
        SessionStats {
            session: session.to_string(),
            speeches: speeches.len(),
            matching: count(Matching::Matching),
            unmatched_proceedings: count(Matching::ProceedingOnly),
            unmatched_media: count(Matching::MediaOnly),
            char_count: records.iter().map(|r| r.char_count).sum(),
            word_count: records.iter().map(|r| r.word_count).sum(),
            duration: records.iter().map(|r| r.duration).sum(),
            span_seconds: session_span(speeches),
        }
    }

    pub fn media_items(&self) -> usize {
        self.matching + self.unmatched_media
    }

    pub fn unmatched_media_ratio(&self) -> Option<f64> {
        match self.media_items() {
            0 => None,
            n => Some(self.unmatched_media as f64 / n as f64),
        }
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = self
            .unmatched_media_ratio()
            .map_or_else(|| "-".to_string(), |r| format!("{:.3}", r));
        let span = self.span_seconds.map_or_else(|| "-".to_string(), format_span);
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.1}\t{}",
            self.session,
            self.speeches,
            self.media_items(),
            self.matching,
            self.unmatched_proceedings,
            self.unmatched_media,
            ratio,
            self.char_count,
            self.word_count,
            self.duration,
            span
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
}

/// Mean and median unmatched-media ratio over the sessions that have media.
pub fn summarize(sessions: &[SessionStats]) -> Option<Summary> {
    let mut ratios: Vec<f64> = sessions
        .iter()
        .filter_map(SessionStats::unmatched_media_ratio)
        .collect();
    if ratios.is_empty() {
        return None;
    }
    ratios.sort_by(f64::total_cmp);
    let n = ratios.len();
    let mean = ratios.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        ratios[n / 2]
    } else {
        (ratios[n / 2 - 1] + ratios[n / 2]) / 2.0
    };
    Some(Summary { mean, median })
}

/// `H:MM:SS`
fn format_span(seconds: i64) -> String {
    format!("{}:{:02}:{:02}", seconds / 3600, seconds % 3600 / 60, seconds % 60)
}

pub fn print_report(sessions: &[SessionStats]) {
    eprintln!(
        "Session\tSpeeches\tMedia\tMatching\tUnmatched proceedings\tUnmatched media\tUnmatched media relative\tChars\tWords\tDuration\tSpan"
    );
    for s in sessions {
        eprintln!("{}", s);
    }
    if let Some(summary) = summarize(sessions) {
        eprintln!("Average unmatched media ratio: {:.3}", summary.mean);
        eprintln!("Median unmatched media ratio: {:.3}", summary.median);
    }
}

/// `<period><session:03>` from the first speech carrying both numbers.
pub fn session_id(speeches: &[SpeechRecord]) -> Option<String> {
    speeches.iter().find_map(|s| {
        let period = s.electoral_period.as_ref()?.number?;
        let meeting = s.session.as_ref()?.number?;
        Some(format!("{}{:03}", period, meeting))
    })
}

fn session_span(speeches: &[SpeechRecord]) -> Option<i64> {
    let start = speeches
        .iter()
        .filter_map(|s| s.date_start.as_deref().and_then(parse_timestamp))
        .min()?;
    let end = speeches
        .iter()
        .filter_map(|s| s.date_end.as_deref().and_then(parse_timestamp))
        .max()?;
    Some((end - start).num_seconds())
}

/// Offsets are dropped: a session's timestamps all share one local zone.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| {
            DateTime::parse_from_str(value, fmt)
                .map(|dt| dt.naive_local())
                .or_else(|_| NaiveDateTime::parse_from_str(value, fmt))
                .ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(matching: Matching) -> ViewRecord {
        ViewRecord {
            proceeding: 1,
            media: 1,
            title: String::new(),
            speaker: String::new(),
            url: String::new(),
            matching,
            char_count: 5,
            word_count: 1,
            duration: 10.0,
        }
    }

    fn stats(records: &[ViewRecord]) -> SessionStats {
        let speeches = vec![SpeechRecord::default(); records.len()];
        SessionStats::from_records("19007", records, &speeches)
    }

    #[test]
    fn counts_categories() {
        let s = stats(&[
            view(Matching::Matching),
            view(Matching::Matching),
            view(Matching::MediaOnly),
            view(Matching::ProceedingOnly),
        ]);
        assert_eq!(s.speeches, 4);
        assert_eq!(s.unmatched_media, 1);
        assert_eq!(s.unmatched_proceedings, 1);
        assert_eq!(s.media_items(), 3);
        assert_eq!(s.char_count, 20);
        assert_eq!(s.duration, 40.0);
        assert!((s.unmatched_media_ratio().unwrap() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.word_count, 4);
        assert_eq!(
            s.to_string(),
            "19007\t4\t3\t2\t1\t1\t0.333\t20\t4\t40.0\t-"
        );
    }

    #[test]
    fn speeches_count_the_whole_session() {
        // one speech was skipped for a missing field
        let speeches = vec![SpeechRecord::default(); 3];
        let records = [view(Matching::Matching), view(Matching::MediaOnly)];
        let s = SessionStats::from_records("19007", &records, &speeches);
        assert_eq!(s.speeches, 3);
        assert_eq!(s.media_items(), 2);
    }

    #[test]
    fn no_media_has_no_ratio() {
        let s = stats(&[view(Matching::ProceedingOnly)]);
        assert_eq!(s.unmatched_media_ratio(), None);
        assert_eq!(s.to_string().split('\t').nth(6), Some("-"));
    }

    #[test]
    fn summary_mean_and_median() {
        let a = stats(&[view(Matching::MediaOnly)]);
        let b = stats(&[view(Matching::Matching)]);
        let c = stats(&[view(Matching::MediaOnly), view(Matching::Matching)]);
        let none = stats(&[view(Matching::ProceedingOnly)]);

        let s = summarize(&[a.clone(), b.clone(), c, none]).unwrap();
        assert!((s.mean - 0.5).abs() < 1e-9);
        assert_eq!(s.median, 0.5);

        let s = summarize(&[a, b]).unwrap();
        assert_eq!(s.median, 0.5);
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn session_id_from_numbers() {
        let speeches: Vec<SpeechRecord> = serde_json::from_value(json!([
            { "people": [] },
            { "electoralPeriod": { "number": 19 }, "session": { "number": 7 } }
        ]))
        .unwrap();
        assert_eq!(session_id(&speeches).as_deref(), Some("19007"));
        assert_eq!(session_id(&speeches[..1]), None);
    }

    #[test]
    fn span_from_timestamps() {
        let speeches: Vec<SpeechRecord> = serde_json::from_value(json!([
            { "dateStart": "2021-09-07T10:00:00+02:00", "dateEnd": "2021-09-07T10:05:00+02:00" },
            { "dateStart": "2021-09-07T09:00", "dateEnd": "2021-09-07T23:30:00" },
            { "dateStart": "garbage" }
        ]))
        .unwrap();
        let s = SessionStats::from_records("x", &[], &speeches);
        assert_eq!(s.span_seconds, Some(14 * 3600 + 30 * 60));
        assert!(s.to_string().ends_with("\t14:30:00"));
    }

    #[test]
    fn no_timestamps_no_span() {
        let s = SessionStats::from_records("x", &[], &[SpeechRecord::default()]);
        assert_eq!(s.span_seconds, None);
    }
}
