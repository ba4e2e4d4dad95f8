//! Summary resources.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::JobStatus;

/// Summary text for one span of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSummary {
    pub summary: String,
    #[serde(default)]
    pub summary_html: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub timestamp_start: Option<i64>,
    #[serde(default)]
    pub timestamp_end: Option<i64>,
}

/// A summary resource.
///
/// `summary` is keyed by the requested summary length (as a string), each
/// entry holding the structured summaries produced for that length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSummary {
    pub summary_id: String,
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub summary_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub speaker_map: HashMap<String, String>,
    #[serde(default)]
    pub transcript_id: Option<String>,
    #[serde(default)]
    pub time_started: Option<String>,
    #[serde(default)]
    pub time_completed: Option<String>,
    #[serde(default)]
    pub summary: BTreeMap<String, Vec<StructuredSummary>>,
}

impl BaseSummary {
    /// Summaries produced for a given length, if that length was requested.
    pub fn for_length(&self, length: u32) -> Option<&[StructuredSummary]> {
        self.summary.get(&length.to_string()).map(Vec::as_slice)
    }
}

/// One page of summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSummaries {
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub results: Vec<BaseSummary>,
}
