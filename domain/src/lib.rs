//! Client-side logic for the Wordcab API: parameter validation and
//! formatting, source objects, the HTTP gateway and the named operations
//! built on top of it.
//!
//! The response types live in `wordcab-types` and are re-exported here so
//! consumers of the `domain` crate do not need to depend on it directly.
pub use wordcab_types::{
    config, BaseSummary, BaseTranscript, DeletedJob, ExtractJob, Job, JobSettings, JobStatus,
    ListJobs, ListSummaries, ListTranscripts, OneOrMany, Stats, StructuredSummary, SummarizeJob,
    TranscriptUtterance,
};

pub mod api;
pub mod error;
pub mod source;
pub mod utils;

pub mod gateway;
