//! Transcript resources: utterances and the transcripts that own them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::Error;

/// One attributed segment of a transcript.
///
/// Immutable once built. The index range is checked on every construction
/// path, including deserialization of API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUtterance")]
pub struct TranscriptUtterance {
    text: String,
    speaker: String,
    start_index: i64,
    end_index: i64,
}

/// Unchecked wire shape of an utterance.
#[derive(Deserialize)]
struct RawUtterance {
    text: String,
    speaker: String,
    start_index: i64,
    end_index: i64,
}

impl TranscriptUtterance {
    /// Build an utterance, rejecting an end index that precedes the start index.
    pub fn new(
        text: impl Into<String>,
        speaker: impl Into<String>,
        start_index: i64,
        end_index: i64,
    ) -> Result<Self, Error> {
        if end_index < start_index {
            return Err(Error::InvalidValue(format!(
                "TranscriptUtterance.end_index must be greater than or equal to \
                 TranscriptUtterance.start_index, not {} < {}",
                end_index, start_index
            )));
        }

        Ok(Self {
            text: text.into(),
            speaker: speaker.into(),
            start_index,
            end_index,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn start_index(&self) -> i64 {
        self.start_index
    }

    pub fn end_index(&self) -> i64 {
        self.end_index
    }
}

impl TryFrom<RawUtterance> for TranscriptUtterance {
    type Error = Error;

    fn try_from(raw: RawUtterance) -> Result<Self, Self::Error> {
        TranscriptUtterance::new(raw.text, raw.speaker, raw.start_index, raw.end_index)
    }
}

/// A transcript resource.
///
/// Jobs and summaries that reference this transcript register their ids in
/// `job_id_set` and `summary_id_set`. Those ids are plain back-references used
/// for lookup; the transcript owns nothing but its utterances and speaker map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTranscript {
    pub transcript_id: String,
    #[serde(default)]
    pub job_id_set: HashSet<String>,
    #[serde(default)]
    pub summary_id_set: HashSet<String>,
    #[serde(default)]
    pub transcript: Vec<TranscriptUtterance>,
    #[serde(default)]
    pub speaker_map: HashMap<String, String>,
}

impl BaseTranscript {
    /// A transcript with no utterances and no associations yet.
    pub fn new(transcript_id: impl Into<String>) -> Self {
        Self {
            transcript_id: transcript_id.into(),
            job_id_set: HashSet::new(),
            summary_id_set: HashSet::new(),
            transcript: Vec::new(),
            speaker_map: HashMap::new(),
        }
    }

    /// Parse a transcript payload returned by the API.
    pub fn from_json(payload: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn with_speaker_map(mut self, speaker_map: HashMap<String, String>) -> Self {
        self.speaker_map = speaker_map;
        self
    }

    pub fn add_job_id(&mut self, job_id: impl Into<String>) {
        self.job_id_set.insert(job_id.into());
    }

    pub fn add_summary_id(&mut self, summary_id: impl Into<String>) {
        self.summary_id_set.insert(summary_id.into());
    }

    /// Replace the whole speaker map. Previous entries are dropped, not merged.
    pub fn update_speaker_map(&mut self, speaker_map: HashMap<String, String>) {
        self.speaker_map = speaker_map;
    }

    /// Display name for a raw speaker label, falling back to the label itself.
    pub fn speaker_name<'a>(&'a self, label: &'a str) -> &'a str {
        self.speaker_map
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }
}

/// One page of transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTranscripts {
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub results: Vec<BaseTranscript>,
}
