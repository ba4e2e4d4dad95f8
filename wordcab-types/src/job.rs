//! Job resources: summarization and extraction jobs and their listing.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::OneOrMany;

/// Processing status reported for a job.
///
/// Jobs move through the preparing/transcribing stages to one of the
/// `*Complete` states, or end in `Error` or `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobStatus {
    Deleted,
    Error,
    ExtractComplete,
    Extracting,
    #[default]
    Pending,
    PreparingExtraction,
    PreparingSummary,
    PreparingTranscript,
    Summarizing,
    SummaryComplete,
    Transcribing,
    TranscriptComplete,
    /// A status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// No further progress is expected from a job in this state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Deleted
                | JobStatus::Error
                | JobStatus::ExtractComplete
                | JobStatus::SummaryComplete
        )
    }
}

/// Settings a job was started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(default)]
    pub ephemeral_data: bool,
    /// Comma separated pipeline names.
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub split_long_utterances: bool,
    #[serde(default = "default_only_api")]
    pub only_api: bool,
}

fn default_only_api() -> bool {
    true
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            ephemeral_data: false,
            pipeline: String::new(),
            split_long_utterances: false,
            only_api: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptDetails {
    #[serde(default)]
    pub transcript_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDetails {
    #[serde(default)]
    pub summary_id: Option<String>,
}

/// A summarization job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeJob {
    pub display_name: String,
    pub job_name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub settings: JobSettings,
    #[serde(default)]
    pub summary_type: Option<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub tags: Option<OneOrMany<String>>,
    #[serde(default)]
    pub time_started: Option<String>,
    #[serde(default)]
    pub time_completed: Option<String>,
    #[serde(default)]
    pub transcript_details: Option<TranscriptDetails>,
    #[serde(default)]
    pub summary_details: Option<SummaryDetails>,
}

impl SummarizeJob {
    pub fn transcript_id(&self) -> Option<&str> {
        self.transcript_details
            .as_ref()
            .and_then(|d| d.transcript_id.as_deref())
    }

    pub fn summary_id(&self) -> Option<&str> {
        self.summary_details
            .as_ref()
            .and_then(|d| d.summary_id.as_deref())
    }
}

/// An extraction job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractJob {
    pub display_name: String,
    pub job_name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub settings: JobSettings,
    #[serde(default)]
    pub tags: Option<OneOrMany<String>>,
    #[serde(default)]
    pub time_started: Option<String>,
    #[serde(default)]
    pub time_completed: Option<String>,
    #[serde(default)]
    pub transcript_details: Option<TranscriptDetails>,
}

impl ExtractJob {
    pub fn transcript_id(&self) -> Option<&str> {
        self.transcript_details
            .as_ref()
            .and_then(|d| d.transcript_id.as_deref())
    }
}

/// A job of either kind, as returned when retrieving or listing jobs.
///
/// Payloads carrying `summary_details` are summarization jobs; all others
/// are extraction jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Job {
    Summarize(SummarizeJob),
    Extract(ExtractJob),
}

impl Job {
    pub fn job_name(&self) -> &str {
        match self {
            Job::Summarize(job) => &job.job_name,
            Job::Extract(job) => &job.job_name,
        }
    }

    pub fn job_status(&self) -> JobStatus {
        match self {
            Job::Summarize(job) => job.job_status,
            Job::Extract(job) => job.job_status,
        }
    }
}

impl<'de> Deserialize<'de> for Job {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("summary_details").is_some() {
            SummarizeJob::deserialize(value)
                .map(Job::Summarize)
                .map_err(D::Error::custom)
        } else {
            ExtractJob::deserialize(value)
                .map(Job::Extract)
                .map_err(D::Error::custom)
        }
    }
}

/// One page of jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobs {
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub results: Vec<Job>,
}

/// Confirmation returned after deleting a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedJob {
    pub job_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_status_parses_known_and_unknown_values() {
        let known: JobStatus = serde_json::from_value(json!("SummaryComplete")).unwrap();
        let unknown: JobStatus = serde_json::from_value(json!("Translating")).unwrap();

        assert_eq!(known, JobStatus::SummaryComplete);
        assert!(known.is_finished());
        assert_eq!(unknown, JobStatus::Unknown);
        assert!(!JobStatus::Transcribing.is_finished());
    }

    #[test]
    fn test_job_with_summary_details_is_summarize_job() {
        let payload = json!({
            "display_name": "weekly sync",
            "job_name": "job_abc",
            "source": "audio",
            "job_status": "SummaryComplete",
            "settings": {
                "ephemeral_data": false,
                "pipeline": "transcribe,summarize",
                "split_long_utterances": false,
                "only_api": true
            },
            "tags": ["team", "weekly"],
            "transcript_details": {"transcript_id": "transcript_1"},
            "summary_details": {"summary_id": "summary_1"}
        });

        let job: Job = serde_json::from_value(payload).unwrap();
        match job {
            Job::Summarize(job) => {
                assert_eq!(job.job_name, "job_abc");
                assert_eq!(job.transcript_id(), Some("transcript_1"));
                assert_eq!(job.summary_id(), Some("summary_1"));
                assert_eq!(job.settings.pipeline, "transcribe,summarize");
                assert_eq!(job.tags.map(|t| t.len()), Some(2));
            }
            Job::Extract(_) => panic!("expected a summarize job"),
        }
    }

    #[test]
    fn test_job_without_summary_details_is_extract_job() {
        let payload = json!({
            "display_name": "extract",
            "job_name": "job_xyz",
            "job_status": "Extracting",
            "tags": "single"
        });

        let job: Job = serde_json::from_value(payload).unwrap();
        assert!(matches!(job, Job::Extract(_)));
        assert_eq!(job.job_name(), "job_xyz");
        assert_eq!(job.job_status(), JobStatus::Extracting);
    }

    #[test]
    fn test_list_jobs_mixes_kinds() {
        let payload = json!({
            "page_count": 1,
            "next_page": null,
            "results": [
                {"display_name": "a", "job_name": "job_a", "summary_details": {}},
                {"display_name": "b", "job_name": "job_b"}
            ]
        });

        let list: ListJobs = serde_json::from_value(payload).unwrap();
        assert_eq!(list.results.len(), 2);
        assert!(matches!(list.results[0], Job::Summarize(_)));
        assert!(matches!(list.results[1], Job::Extract(_)));
    }

    #[test]
    fn test_job_settings_defaults() {
        let settings: JobSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings, JobSettings::default());
        assert!(settings.only_api);
    }
}
