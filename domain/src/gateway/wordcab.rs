//! Wordcab API client.
//!
//! A [`WordcabClient`] is one scoped session against the API: it owns the
//! authenticated HTTP client and is dropped once the caller is done with it.
//! Every named operation is also available through [`WordcabClient::request`]
//! as an [`Operation`] value.

use std::collections::HashMap;
use std::time::Duration;

use log::*;
use reqwest::multipart::{Form, Part};
use reqwest_middleware::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use service::config::Config;
use wordcab_auth::api_key::BearerTokenAuth;
use wordcab_auth::credentials::resolve_api_key;
use wordcab_auth::http::{AuthenticatedClient, AuthenticatedClientBuilder};
use wordcab_types::config::{
    EXTRACT_PIPELINES, REASON_CONCLUSION, REQUEST_TIMEOUT_SECS, SUMMARY_PIPELINES, WORDCAB_API_URL,
};
use wordcab_types::{
    BaseSummary, BaseTranscript, DeletedJob, ExtractJob, Job, ListJobs, ListSummaries,
    ListTranscripts, OneOrMany, Stats, SummarizeJob,
};

use crate::error::{
    status_error, validation_error, DomainErrorKind, Error, ExternalErrorKind,
};
use crate::source::{Payload, Source};
use crate::utils::{
    check_context_elements, check_extract_pipelines, check_source_lang, check_summary_length,
    check_summary_pipelines, check_summary_type, check_target_lang, format_context_elements,
    format_lengths, format_pipelines, format_tags,
};

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV_VAR: &str = "WORDCAB_API_URL";

/// Optional settings for a summarization job.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Delete the uploaded data once the job is done.
    pub ephemeral_data: bool,
    pub only_api: bool,
    pub pipelines: OneOrMany<String>,
    pub split_long_utterances: bool,
    /// One or more lengths in `1..=5`; ignored for `reason_conclusion`.
    pub summary_length: OneOrMany<u32>,
    pub tags: Option<OneOrMany<String>>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub context: Option<OneOrMany<String>>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            ephemeral_data: false,
            only_api: true,
            pipelines: OneOrMany::Many(SUMMARY_PIPELINES.iter().map(|p| p.to_string()).collect()),
            split_long_utterances: false,
            summary_length: OneOrMany::One(3),
            tags: None,
            source_lang: None,
            target_lang: None,
            context: None,
        }
    }
}

/// A summarization job to start.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub source: Source,
    pub display_name: String,
    pub summary_type: String,
    pub options: SummaryOptions,
}

impl SummaryRequest {
    pub fn new(
        source: Source,
        display_name: impl Into<String>,
        summary_type: impl Into<String>,
        options: SummaryOptions,
    ) -> Self {
        Self {
            source,
            display_name: display_name.into(),
            summary_type: summary_type.into(),
            options,
        }
    }

    /// Reject any parameter the API would not accept.
    pub fn validate(&self) -> Result<(), Error> {
        let options = &self.options;
        if !check_summary_type(&self.summary_type) {
            return Err(validation_error(format!(
                "{} is not a valid summary type",
                self.summary_type
            )));
        }
        if !check_summary_pipelines(options.pipelines.as_slice()) {
            return Err(validation_error(format!(
                "{} contains an invalid summary pipeline",
                format_pipelines(options.pipelines.as_slice())
            )));
        }
        if self.summary_type != REASON_CONCLUSION
            && !check_summary_length(options.summary_length.as_slice())
        {
            return Err(validation_error(format!(
                "Summary lengths {} must be between 1 and 5",
                format_lengths(options.summary_length.as_slice())
            )));
        }
        if let Some(lang) = &options.source_lang {
            if !check_source_lang(&[lang]) {
                return Err(validation_error(format!("{lang} is not a valid source language")));
            }
        }
        if let Some(lang) = &options.target_lang {
            if !check_target_lang(&[lang]) {
                return Err(validation_error(format!("{lang} is not a valid target language")));
            }
        }
        if let Some(context) = &options.context {
            if !check_context_elements(context.as_slice()) {
                return Err(validation_error(format!(
                    "{} contains an invalid context element",
                    format_context_elements(context.as_slice())
                )));
            }
        }
        Ok(())
    }

    /// Query parameters of the `/summarize` call, validated first.
    pub fn query_params(&self) -> Result<Vec<(&'static str, String)>, Error> {
        self.validate()?;
        let options = &self.options;

        let mut params = vec![
            ("source", self.source.source().to_string()),
            ("display_name", self.display_name.clone()),
            ("summary_type", self.summary_type.clone()),
            ("ephemeral_data", options.ephemeral_data.to_string()),
            ("only_api", options.only_api.to_string()),
            ("pipeline", format_pipelines(options.pipelines.as_slice())),
            ("split_long_utterances", options.split_long_utterances.to_string()),
        ];
        if self.summary_type != REASON_CONCLUSION {
            params.push((
                "summary_lens",
                format_lengths(options.summary_length.as_slice()),
            ));
        }
        if let Some(tags) = &options.tags {
            params.push(("tags", format_tags(tags.as_slice())));
        }
        if let Some(lang) = &options.source_lang {
            params.push(("source_lang", lang.clone()));
        }
        if let Some(lang) = &options.target_lang {
            params.push(("target_lang", lang.clone()));
        }
        if let Some(context) = &options.context {
            params.push(("context", format_context_elements(context.as_slice())));
        }
        Ok(params)
    }
}

/// An extraction job to start.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub source: Source,
    pub display_name: String,
    pub ephemeral_data: bool,
    pub only_api: bool,
    pub pipelines: OneOrMany<String>,
    pub split_long_utterances: bool,
    pub tags: Option<OneOrMany<String>>,
}

impl ExtractOptions {
    /// Runs every extraction pipeline unless `pipelines` is narrowed.
    pub fn new(source: Source, display_name: impl Into<String>) -> Self {
        Self {
            source,
            display_name: display_name.into(),
            ephemeral_data: false,
            only_api: true,
            pipelines: OneOrMany::Many(EXTRACT_PIPELINES.iter().map(|p| p.to_string()).collect()),
            split_long_utterances: false,
            tags: None,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !check_extract_pipelines(self.pipelines.as_slice()) {
            return Err(validation_error(format!(
                "{} contains an invalid extraction pipeline",
                format_pipelines(self.pipelines.as_slice())
            )));
        }
        Ok(())
    }

    /// Query parameters of the `/extract` call, validated first.
    pub fn query_params(&self) -> Result<Vec<(&'static str, String)>, Error> {
        self.validate()?;

        let mut params = vec![
            ("source", self.source.source().to_string()),
            ("display_name", self.display_name.clone()),
            ("ephemeral_data", self.ephemeral_data.to_string()),
            ("only_api", self.only_api.to_string()),
            ("pipeline", format_pipelines(self.pipelines.as_slice())),
            ("split_long_utterances", self.split_long_utterances.to_string()),
        ];
        if let Some(tags) = &self.tags {
            params.push(("tags", format_tags(tags.as_slice())));
        }
        Ok(params)
    }
}

/// Every call the client can make, with its parameters.
#[derive(Debug, Clone)]
pub enum Operation {
    GetStats {
        min_created: Option<String>,
        max_created: Option<String>,
        tags: Option<OneOrMany<String>>,
    },
    StartExtract(ExtractOptions),
    StartSummary(SummaryRequest),
    ListJobs {
        page_size: Option<u32>,
        order_by: Option<String>,
    },
    RetrieveJob {
        job_name: String,
    },
    DeleteJob {
        job_name: String,
    },
    ListTranscripts {
        page_size: Option<u32>,
    },
    RetrieveTranscript {
        transcript_id: String,
    },
    ChangeSpeakerLabels {
        transcript_id: String,
        speaker_map: HashMap<String, String>,
    },
    ListSummaries {
        page_size: Option<u32>,
    },
    RetrieveSummary {
        summary_id: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetStats { .. } => "get_stats",
            Operation::StartExtract(_) => "start_extract",
            Operation::StartSummary(_) => "start_summary",
            Operation::ListJobs { .. } => "list_jobs",
            Operation::RetrieveJob { .. } => "retrieve_job",
            Operation::DeleteJob { .. } => "delete_job",
            Operation::ListTranscripts { .. } => "list_transcripts",
            Operation::RetrieveTranscript { .. } => "retrieve_transcript",
            Operation::ChangeSpeakerLabels { .. } => "change_speaker_labels",
            Operation::ListSummaries { .. } => "list_summaries",
            Operation::RetrieveSummary { .. } => "retrieve_summary",
        }
    }
}

/// Typed result of an [`Operation`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Stats(Stats),
    ExtractJob(ExtractJob),
    SummarizeJob(SummarizeJob),
    ListJobs(ListJobs),
    Job(Job),
    DeletedJob(DeletedJob),
    ListTranscripts(ListTranscripts),
    Transcript(BaseTranscript),
    ListSummaries(ListSummaries),
    Summary(BaseSummary),
}

/// Wordcab API client
pub struct WordcabClient {
    client: AuthenticatedClient,
    /// Multipart bodies are streams and cannot be replayed, so uploads never
    /// go through the retry middleware.
    upload_client: AuthenticatedClient,
    base_url: String,
}

impl WordcabClient {
    /// Create a new client with the default timeout and no retries.
    pub fn new(api_key: SecretString, base_url: &str) -> Result<Self, Error> {
        Self::with_settings(
            api_key,
            base_url,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
            0,
        )
    }

    pub fn with_settings(
        api_key: SecretString,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, Error> {
        let upload_client = AuthenticatedClientBuilder::new()
            .with_auth(Box::new(BearerTokenAuth::new(SecretString::new(
                api_key.expose_secret().clone(),
            ))))
            .with_timeout(timeout)
            .build()?;
        let client = AuthenticatedClientBuilder::new()
            .with_auth(Box::new(BearerTokenAuth::new(api_key)))
            .with_timeout(timeout)
            .with_max_retries(max_retries)
            .build()?;

        Ok(Self {
            client,
            upload_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let api_key = resolve_api_key(config.api_key())?;
        Self::with_settings(
            api_key,
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs),
            config.max_retries,
        )
    }

    /// Open a session with an explicit key, or the one from the environment.
    pub fn open(api_key: Option<&str>) -> Result<Self, Error> {
        let api_key = resolve_api_key(api_key)?;
        let base_url =
            dotenvy::var(API_URL_ENV_VAR).unwrap_or_else(|_| WORDCAB_API_URL.to_string());
        Self::new(api_key, &base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify the API key is valid by making a test request
    pub async fn verify_api_key(&self) -> Result<bool, Error> {
        let url = format!("{}/me", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Failed to verify Wordcab API key: {:?}", e);
            Error::from(e)
        })?;

        Ok(response.status().is_success())
    }

    /// Dispatch an operation and wrap its result.
    pub async fn request(&self, operation: Operation) -> Result<Response, Error> {
        debug!("Dispatching Wordcab operation {}", operation.name());
        match operation {
            Operation::GetStats {
                min_created,
                max_created,
                tags,
            } => self
                .get_stats(min_created.as_deref(), max_created.as_deref(), tags.as_ref())
                .await
                .map(Response::Stats),
            Operation::StartExtract(options) => {
                self.start_extract(&options).await.map(Response::ExtractJob)
            }
            Operation::StartSummary(request) => {
                self.start_summary(&request).await.map(Response::SummarizeJob)
            }
            Operation::ListJobs {
                page_size,
                order_by,
            } => self
                .list_jobs(page_size, order_by.as_deref())
                .await
                .map(Response::ListJobs),
            Operation::RetrieveJob { job_name } => {
                self.retrieve_job(&job_name).await.map(Response::Job)
            }
            Operation::DeleteJob { job_name } => {
                self.delete_job(&job_name).await.map(Response::DeletedJob)
            }
            Operation::ListTranscripts { page_size } => self
                .list_transcripts(page_size)
                .await
                .map(Response::ListTranscripts),
            Operation::RetrieveTranscript { transcript_id } => self
                .retrieve_transcript(&transcript_id)
                .await
                .map(Response::Transcript),
            Operation::ChangeSpeakerLabels {
                transcript_id,
                speaker_map,
            } => self
                .change_speaker_labels(&transcript_id, &speaker_map)
                .await
                .map(Response::Transcript),
            Operation::ListSummaries { page_size } => self
                .list_summaries(page_size)
                .await
                .map(Response::ListSummaries),
            Operation::RetrieveSummary { summary_id } => self
                .retrieve_summary(&summary_id)
                .await
                .map(Response::Summary),
        }
    }

    pub async fn get_stats(
        &self,
        min_created: Option<&str>,
        max_created: Option<&str>,
        tags: Option<&OneOrMany<String>>,
    ) -> Result<Stats, Error> {
        let url = format!("{}/me", self.base_url);
        let mut params = Vec::new();
        if let Some(min_created) = min_created {
            params.push(("min_created", min_created.to_string()));
        }
        if let Some(max_created) = max_created {
            params.push(("max_created", max_created.to_string()));
        }
        if let Some(tags) = tags {
            params.push(("tags", format_tags(tags.as_slice())));
        }

        self.send(self.client.get(&url).query(&params), "get stats")
            .await
    }

    pub async fn start_summary(&self, request: &SummaryRequest) -> Result<SummarizeJob, Error> {
        let params = request.query_params().map_err(|e| {
            warn!("Rejected summary request: {:?}", e.error_kind);
            e
        })?;
        let url = format!("{}/summarize", self.base_url);

        debug!(
            "Starting {} summary for {} source \"{}\"",
            request.summary_type,
            request.source.source_type(),
            request.display_name
        );

        let builder = self.post_source(&url, &params, &request.source)?;
        let job: SummarizeJob = self.send(builder, "start summary").await?;
        info!("Started Wordcab summary job: {}", job.job_name);
        Ok(job)
    }

    pub async fn start_extract(&self, options: &ExtractOptions) -> Result<ExtractJob, Error> {
        let params = options.query_params().map_err(|e| {
            warn!("Rejected extract request: {:?}", e.error_kind);
            e
        })?;
        let url = format!("{}/extract", self.base_url);

        debug!(
            "Starting extraction for {} source \"{}\"",
            options.source.source_type(),
            options.display_name
        );

        let builder = self.post_source(&url, &params, &options.source)?;
        let job: ExtractJob = self.send(builder, "start extract").await?;
        info!("Started Wordcab extract job: {}", job.job_name);
        Ok(job)
    }

    pub async fn list_jobs(
        &self,
        page_size: Option<u32>,
        order_by: Option<&str>,
    ) -> Result<ListJobs, Error> {
        let url = format!("{}/jobs", self.base_url);
        let mut params = Vec::new();
        if let Some(page_size) = page_size {
            params.push(("page_size", page_size.to_string()));
        }
        if let Some(order_by) = order_by {
            params.push(("order_by", order_by.to_string()));
        }

        self.send(self.client.get(&url).query(&params), "list jobs")
            .await
    }

    pub async fn retrieve_job(&self, job_name: &str) -> Result<Job, Error> {
        let url = format!("{}/jobs/{}", self.base_url, urlencoding::encode(job_name));
        self.send(self.client.get(&url), "retrieve job").await
    }

    pub async fn delete_job(&self, job_name: &str) -> Result<DeletedJob, Error> {
        let url = format!("{}/jobs/{}", self.base_url, urlencoding::encode(job_name));
        let deleted: DeletedJob = self.send(self.client.delete(&url), "delete job").await?;
        info!("Deleted Wordcab job: {}", deleted.job_name);
        Ok(deleted)
    }

    pub async fn list_transcripts(&self, page_size: Option<u32>) -> Result<ListTranscripts, Error> {
        let url = format!("{}/transcripts", self.base_url);
        let params: Vec<_> = page_size
            .map(|size| ("page_size", size.to_string()))
            .into_iter()
            .collect();

        self.send(self.client.get(&url).query(&params), "list transcripts")
            .await
    }

    pub async fn retrieve_transcript(&self, transcript_id: &str) -> Result<BaseTranscript, Error> {
        let url = format!(
            "{}/transcripts/{}",
            self.base_url,
            urlencoding::encode(transcript_id)
        );
        self.send(self.client.get(&url), "retrieve transcript").await
    }

    /// Replace the speaker map of a transcript and return the updated transcript.
    pub async fn change_speaker_labels(
        &self,
        transcript_id: &str,
        speaker_map: &HashMap<String, String>,
    ) -> Result<BaseTranscript, Error> {
        let url = format!(
            "{}/transcripts/{}",
            self.base_url,
            urlencoding::encode(transcript_id)
        );
        debug!(
            "Changing {} speaker label(s) on transcript {}",
            speaker_map.len(),
            transcript_id
        );

        self.send(
            self.client
                .patch(&url)
                .json(&json!({ "speaker_map": speaker_map })),
            "change speaker labels",
        )
        .await
    }

    pub async fn list_summaries(&self, page_size: Option<u32>) -> Result<ListSummaries, Error> {
        let url = format!("{}/summaries", self.base_url);
        let params: Vec<_> = page_size
            .map(|size| ("page_size", size.to_string()))
            .into_iter()
            .collect();

        self.send(self.client.get(&url).query(&params), "list summaries")
            .await
    }

    pub async fn retrieve_summary(&self, summary_id: &str) -> Result<BaseSummary, Error> {
        let url = format!(
            "{}/summaries/{}",
            self.base_url,
            urlencoding::encode(summary_id)
        );
        self.send(self.client.get(&url), "retrieve summary").await
    }

    fn post_source(
        &self,
        url: &str,
        params: &[(&str, String)],
        source: &Source,
    ) -> Result<RequestBuilder, Error> {
        match source.payload()? {
            Payload::Json(body) => Ok(self.client.post(url).query(params).json(&body)),
            Payload::Multipart { file_name, bytes } => {
                let part = Part::bytes(bytes).file_name(file_name);
                Ok(self
                    .upload_client
                    .post(url)
                    .query(params)
                    .multipart(Form::new().part("audio_file", part)))
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        action: &str,
    ) -> Result<T, Error> {
        let response = builder.send().await.map_err(|e| {
            warn!("Failed to {} on Wordcab: {:?}", action, e);
            Error::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                warn!("Failed to parse Wordcab response to {}: {:?}", action, e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Wordcab".to_string(),
                    )),
                }
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Wordcab API failed to {}: {} {}", action, status, error_text);
            Err(status_error(status, error_text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InternalErrorKind;
    use crate::source::InMemorySource;
    use mockito::Matcher;
    use wordcab_types::JobStatus;

    fn test_client(server: &mockito::Server) -> WordcabClient {
        WordcabClient::new(SecretString::new("test_key".to_string()), &server.url()).unwrap()
    }

    fn in_memory_source() -> Source {
        InMemorySource::new(vec!["A: Hello.".to_string(), "B: Hi.".to_string()]).into()
    }

    fn summarize_job_body() -> serde_json::Value {
        json!({
            "display_name": "weekly",
            "job_name": "job_123",
            "source": "generic",
            "job_status": "Pending",
            "summary_details": {}
        })
    }

    #[test]
    fn test_summary_options_defaults() {
        let options = SummaryOptions::default();
        assert!(!options.ephemeral_data);
        assert!(options.only_api);
        assert!(!options.split_long_utterances);
        assert_eq!(
            options.pipelines.as_slice(),
            &["transcribe".to_string(), "summarize".to_string()]
        );
        assert_eq!(options.summary_length.as_slice(), &[3]);
        assert!(options.tags.is_none());
    }

    #[test]
    fn test_summary_query_params() {
        let options = SummaryOptions {
            summary_length: OneOrMany::Many(vec![1, 3]),
            tags: Some(OneOrMany::from(vec!["team", "weekly"])),
            ..SummaryOptions::default()
        };
        let request = SummaryRequest::new(in_memory_source(), "weekly", "narrative", options);
        let params = request.query_params().unwrap();

        assert!(params.contains(&("source", "generic".to_string())));
        assert!(params.contains(&("ephemeral_data", "false".to_string())));
        assert!(params.contains(&("only_api", "true".to_string())));
        assert!(params.contains(&("pipeline", "transcribe,summarize".to_string())));
        assert!(params.contains(&("summary_lens", "1,3".to_string())));
        assert!(params.contains(&("tags", "team,weekly".to_string())));
    }

    #[test]
    fn test_reason_conclusion_has_no_summary_lens() {
        let request = SummaryRequest::new(
            in_memory_source(),
            "weekly",
            REASON_CONCLUSION,
            SummaryOptions::default(),
        );
        let params = request.query_params().unwrap();
        assert!(params.iter().all(|(key, _)| *key != "summary_lens"));
    }

    #[test]
    fn test_reason_conclusion_ignores_summary_length() {
        let request = SummaryRequest::new(
            in_memory_source(),
            "weekly",
            REASON_CONCLUSION,
            SummaryOptions {
                summary_length: OneOrMany::Many(vec![0, 9]),
                ..SummaryOptions::default()
            },
        );
        assert!(request.validate().is_ok());
        let params = request.query_params().unwrap();
        assert!(params.iter().all(|(key, _)| *key != "summary_lens"));
    }

    #[test]
    fn test_summary_validation_rejects_bad_values() {
        let bad_type = SummaryRequest::new(in_memory_source(), "x", "haiku", SummaryOptions::default());
        let bad_length = SummaryRequest::new(
            in_memory_source(),
            "x",
            "narrative",
            SummaryOptions {
                summary_length: OneOrMany::Many(vec![1, 6]),
                ..SummaryOptions::default()
            },
        );
        let bad_lang = SummaryRequest::new(
            in_memory_source(),
            "x",
            "narrative",
            SummaryOptions {
                source_lang: Some("xx".to_string()),
                ..SummaryOptions::default()
            },
        );
        let bad_pipeline = SummaryRequest::new(
            in_memory_source(),
            "x",
            "narrative",
            SummaryOptions {
                pipelines: OneOrMany::from("emotions"),
                ..SummaryOptions::default()
            },
        );

        for request in [bad_type, bad_length, bad_lang, bad_pipeline] {
            let err = request.query_params().unwrap_err();
            assert!(matches!(
                err.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Validation(_))
            ));
        }
    }

    #[test]
    fn test_extract_validation() {
        let mut options = ExtractOptions::new(in_memory_source(), "extract");
        assert!(options.validate().is_ok());

        options.pipelines = OneOrMany::from(vec!["emotions", "summarize"]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_operation_names() {
        let op = Operation::RetrieveJob {
            job_name: "job_1".to_string(),
        };
        assert_eq!(op.name(), "retrieve_job");
        assert_eq!(
            Operation::ListSummaries { page_size: None }.name(),
            "list_summaries"
        );
    }

    #[tokio::test]
    async fn test_start_summary_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/summarize")
            .match_header("authorization", "Bearer test_key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("source".into(), "generic".into()),
                Matcher::UrlEncoded("display_name".into(), "weekly".into()),
                Matcher::UrlEncoded("summary_type".into(), "narrative".into()),
                Matcher::UrlEncoded("pipeline".into(), "transcribe,summarize".into()),
                Matcher::UrlEncoded("summary_lens".into(), "3".into()),
                Matcher::UrlEncoded("split_long_utterances".into(), "false".into()),
            ]))
            .match_body(Matcher::Json(json!({"transcript": ["A: Hello.", "B: Hi."]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(summarize_job_body().to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let request = SummaryRequest::new(
            in_memory_source(),
            "weekly",
            "narrative",
            SummaryOptions::default(),
        );
        let job = client.start_summary(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(job.job_name, "job_123");
        assert_eq!(job.job_status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_summary_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/summarize")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&server);
        let request = SummaryRequest::new(
            in_memory_source(),
            "weekly",
            "narrative",
            SummaryOptions {
                summary_length: OneOrMany::One(0),
                ..SummaryOptions::default()
            },
        );
        let result = client.start_summary(&request).await;

        assert!(result.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_extract_with_audio_uses_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/extract")
            .match_query(Matcher::UrlEncoded("source".into(), "audio".into()))
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_body(Matcher::Regex("name=\"audio_file\"".to_string()))
            .with_status(201)
            .with_body(
                json!({"display_name": "call", "job_name": "job_x", "job_status": "Pending"})
                    .to_string(),
            )
            .create_async()
            .await;

        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"ID3").unwrap();
        let source = Source::from_path(file.path()).await.unwrap();

        let client = test_client(&server);
        let job = client
            .start_extract(&ExtractOptions::new(source, "call"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(job.job_name, "job_x");
    }

    #[tokio::test]
    async fn test_audio_upload_with_retries_enabled() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/summarize")
            .match_query(Matcher::UrlEncoded("source".into(), "audio".into()))
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .with_status(200)
            .with_body(summarize_job_body().to_string())
            .expect(1)
            .create_async()
            .await;

        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"RIFF").unwrap();
        let source = Source::from_path(file.path()).await.unwrap();

        let client = WordcabClient::with_settings(
            SecretString::new("test_key".to_string()),
            &server.url(),
            Duration::from_secs(5),
            1,
        )
        .unwrap();
        let request = SummaryRequest::new(source, "weekly", "narrative", SummaryOptions::default());
        let job = client.start_summary(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(job.job_name, "job_123");
    }

    #[tokio::test]
    async fn test_get_stats_sends_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/me")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("min_created".into(), "2023-01-01".into()),
                Matcher::UrlEncoded("tags".into(), "a,b".into()),
            ]))
            .with_status(200)
            .with_body(json!({"account_email": "me@example.com", "request_count": 4}).to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let tags = OneOrMany::from(vec!["a", "b"]);
        let stats = client
            .get_stats(Some("2023-01-01"), None, Some(&tags))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(stats.request_count, 4);
    }

    #[tokio::test]
    async fn test_request_dispatches_retrieve_job() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/jobs/job_123")
            .with_status(200)
            .with_body(summarize_job_body().to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let response = client
            .request(Operation::RetrieveJob {
                job_name: "job_123".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        match response {
            Response::Job(job) => assert_eq!(job.job_name(), "job_123"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_job() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/jobs/job_123")
            .with_status(200)
            .with_body(json!({"job_name": "job_123"}).to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let deleted = client.delete_job("job_123").await.unwrap();

        mock.assert_async().await;
        assert_eq!(deleted.job_name, "job_123");
    }

    #[tokio::test]
    async fn test_list_jobs_paging() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/jobs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page_size".into(), "10".into()),
                Matcher::UrlEncoded("order_by".into(), "-time_started".into()),
            ]))
            .with_status(200)
            .with_body(json!({"page_count": 1, "next_page": null, "results": []}).to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let jobs = client
            .list_jobs(Some(10), Some("-time_started"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(jobs.results.is_empty());
    }

    #[tokio::test]
    async fn test_change_speaker_labels_patches_map() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/transcripts/transcript_1")
            .match_body(Matcher::Json(json!({"speaker_map": {"A": "Alice"}})))
            .with_status(200)
            .with_body(
                json!({
                    "transcript_id": "transcript_1",
                    "transcript": [{"text": "Hi", "speaker": "A", "start_index": 0, "end_index": 2}],
                    "speaker_map": {"A": "Alice"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let speaker_map = HashMap::from([("A".to_string(), "Alice".to_string())]);
        let transcript = client
            .change_speaker_labels("transcript_1", &speaker_map)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(transcript.speaker_name("A"), "Alice");
    }

    #[tokio::test]
    async fn test_retrieve_summary_by_length() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/summaries/summary_1")
            .with_status(200)
            .with_body(
                json!({
                    "summary_id": "summary_1",
                    "job_status": "SummaryComplete",
                    "summary": {"3": [{"summary": "They agreed on a date."}]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let summary = client.retrieve_summary("summary_1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(summary.for_length(3).map(|s| s.len()), Some(1));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/transcripts/unknown")
            .with_status(404)
            .with_body(r#"{"detail": "Not found"}"#)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/summaries/broken")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = test_client(&server);
        let missing = client.retrieve_transcript("unknown").await.unwrap_err();
        let broken = client.retrieve_summary("broken").await.unwrap_err();

        assert_eq!(
            missing.error_kind,
            DomainErrorKind::External(ExternalErrorKind::NotFound)
        );
        assert_eq!(
            broken.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other("500: boom".to_string()))
        );
    }

    #[tokio::test]
    async fn test_verify_api_key() {
        let mut server = mockito::Server::new_async().await;
        let _valid = server
            .mock("GET", "/me")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server);
        assert!(!client.verify_api_key().await.unwrap());
    }

    #[tokio::test]
    async fn test_unparseable_body_is_external_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/summaries")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = test_client(&server);
        let err = client.list_summaries(None).await.unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other(_))
        ));
    }
}
