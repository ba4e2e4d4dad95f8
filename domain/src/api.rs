//! One-call entry points to the Wordcab API.
//!
//! Each function opens a session for the duration of a single request and
//! releases it when the call returns, whether it succeeded or not. Without an
//! explicit `api_key` the key is read from `WORDCAB_API_KEY`.

use std::collections::HashMap;

use log::*;
use wordcab_types::{
    BaseSummary, BaseTranscript, DeletedJob, ExtractJob, Job, ListJobs, ListSummaries,
    ListTranscripts, OneOrMany, Stats, SummarizeJob,
};

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::wordcab::{
    ExtractOptions, Operation, Response, SummaryOptions, SummaryRequest, WordcabClient,
};
use crate::source::Source;

/// Open a session, run `operation` and close the session.
pub async fn request(operation: Operation, api_key: Option<&str>) -> Result<Response, Error> {
    let client = WordcabClient::open(api_key)?;
    client.request(operation).await
}

fn unexpected(operation: &str, response: Response) -> Error {
    error!("Unexpected response to {}: {:?}", operation, response);
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(format!(
            "Unexpected response to {operation}"
        ))),
    }
}

/// Account stats for a time window, optionally filtered by tags.
pub async fn get_stats(
    min_created: Option<&str>,
    max_created: Option<&str>,
    tags: Option<OneOrMany<String>>,
    api_key: Option<&str>,
) -> Result<Stats, Error> {
    let operation = Operation::GetStats {
        min_created: min_created.map(str::to_string),
        max_created: max_created.map(str::to_string),
        tags,
    };
    match request(operation, api_key).await? {
        Response::Stats(stats) => Ok(stats),
        other => Err(unexpected("get_stats", other)),
    }
}

pub async fn start_extract(
    options: ExtractOptions,
    api_key: Option<&str>,
) -> Result<ExtractJob, Error> {
    options.validate()?;
    match request(Operation::StartExtract(options), api_key).await? {
        Response::ExtractJob(job) => Ok(job),
        other => Err(unexpected("start_extract", other)),
    }
}

/// Start a summarization job.
///
/// Parameters are checked before any session is opened, so an invalid
/// request fails without touching the network.
pub async fn start_summary(
    source_object: Source,
    display_name: &str,
    summary_type: &str,
    options: SummaryOptions,
    api_key: Option<&str>,
) -> Result<SummarizeJob, Error> {
    let summary = SummaryRequest::new(source_object, display_name, summary_type, options);
    summary.validate()?;
    match request(Operation::StartSummary(summary), api_key).await? {
        Response::SummarizeJob(job) => Ok(job),
        other => Err(unexpected("start_summary", other)),
    }
}

pub async fn list_jobs(
    page_size: Option<u32>,
    order_by: Option<&str>,
    api_key: Option<&str>,
) -> Result<ListJobs, Error> {
    let operation = Operation::ListJobs {
        page_size,
        order_by: order_by.map(str::to_string),
    };
    match request(operation, api_key).await? {
        Response::ListJobs(jobs) => Ok(jobs),
        other => Err(unexpected("list_jobs", other)),
    }
}

pub async fn retrieve_job(job_name: &str, api_key: Option<&str>) -> Result<Job, Error> {
    let operation = Operation::RetrieveJob {
        job_name: job_name.to_string(),
    };
    match request(operation, api_key).await? {
        Response::Job(job) => Ok(job),
        other => Err(unexpected("retrieve_job", other)),
    }
}

pub async fn delete_job(job_name: &str, api_key: Option<&str>) -> Result<DeletedJob, Error> {
    let operation = Operation::DeleteJob {
        job_name: job_name.to_string(),
    };
    match request(operation, api_key).await? {
        Response::DeletedJob(deleted) => Ok(deleted),
        other => Err(unexpected("delete_job", other)),
    }
}

pub async fn list_transcripts(
    page_size: Option<u32>,
    api_key: Option<&str>,
) -> Result<ListTranscripts, Error> {
    match request(Operation::ListTranscripts { page_size }, api_key).await? {
        Response::ListTranscripts(transcripts) => Ok(transcripts),
        other => Err(unexpected("list_transcripts", other)),
    }
}

pub async fn retrieve_transcript(
    transcript_id: &str,
    api_key: Option<&str>,
) -> Result<BaseTranscript, Error> {
    let operation = Operation::RetrieveTranscript {
        transcript_id: transcript_id.to_string(),
    };
    match request(operation, api_key).await? {
        Response::Transcript(transcript) => Ok(transcript),
        other => Err(unexpected("retrieve_transcript", other)),
    }
}

/// Replace the speaker map of a transcript.
pub async fn change_speaker_labels(
    transcript_id: &str,
    speaker_map: HashMap<String, String>,
    api_key: Option<&str>,
) -> Result<BaseTranscript, Error> {
    let operation = Operation::ChangeSpeakerLabels {
        transcript_id: transcript_id.to_string(),
        speaker_map,
    };
    match request(operation, api_key).await? {
        Response::Transcript(transcript) => Ok(transcript),
        other => Err(unexpected("change_speaker_labels", other)),
    }
}

pub async fn list_summaries(
    page_size: Option<u32>,
    api_key: Option<&str>,
) -> Result<ListSummaries, Error> {
    match request(Operation::ListSummaries { page_size }, api_key).await? {
        Response::ListSummaries(summaries) => Ok(summaries),
        other => Err(unexpected("list_summaries", other)),
    }
}

pub async fn retrieve_summary(
    summary_id: &str,
    api_key: Option<&str>,
) -> Result<BaseSummary, Error> {
    let operation = Operation::RetrieveSummary {
        summary_id: summary_id.to_string(),
    };
    match request(operation, api_key).await? {
        Response::Summary(summary) => Ok(summary),
        other => Err(unexpected("retrieve_summary", other)),
    }
}
