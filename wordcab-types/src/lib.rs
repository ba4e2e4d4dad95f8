//! Response and domain objects for the Wordcab transcription/summarization API.
//!
//! Everything here is plain data: transcripts and their utterances, jobs,
//! summaries and account stats, plus the read-only constants describing which
//! parameter values the API accepts. Types deserialize straight from API
//! payloads and enforce their own invariants while doing so.

pub mod config;
pub mod error;
pub mod job;
pub mod one_or_many;
pub mod stats;
pub mod summary;
pub mod transcript;

// Re-export commonly used types
pub use error::Error;
pub use job::{DeletedJob, ExtractJob, Job, JobSettings, JobStatus, ListJobs, SummarizeJob};
pub use one_or_many::OneOrMany;
pub use stats::Stats;
pub use summary::{BaseSummary, ListSummaries, StructuredSummary};
pub use transcript::{BaseTranscript, ListTranscripts, TranscriptUtterance};
