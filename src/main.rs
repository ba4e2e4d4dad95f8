use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use log::*;
use serde_json::{json, Value};

use domain::error::{source_error, DomainErrorKind, Error, InternalErrorKind};
use domain::gateway::wordcab::{
    ExtractOptions, Operation, SummaryOptions, SummaryRequest, WordcabClient,
};
use domain::source::Source;
use domain::OneOrMany;
use service::{config::Config, logging::Logger};

/// Command line client for the Wordcab transcription and summarization API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

/// Where a job's input comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Local transcript (.json, .txt) or audio file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Remote transcript or audio file
    #[arg(long)]
    url: Option<String>,
}

impl SourceArgs {
    async fn load(&self) -> Result<Source, Error> {
        match (&self.file, &self.url) {
            (Some(path), None) => Source::from_path(path.clone()).await,
            (None, Some(url)) => Source::from_url(url, HashMap::new()).await,
            _ => Err(source_error("Provide exactly one of --file or --url")),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show account stats
    Stats {
        #[arg(long)]
        min_created: Option<String>,
        #[arg(long)]
        max_created: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Start a summarization job
    StartSummary {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        summary_type: String,
        /// Summary length between 1 and 5, repeat for several
        #[arg(long = "summary-length", default_values_t = [3u32])]
        summary_lengths: Vec<u32>,
        #[arg(long = "pipeline", default_values_t = ["transcribe".to_string(), "summarize".to_string()])]
        pipelines: Vec<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        ephemeral_data: bool,
        #[arg(long)]
        split_long_utterances: bool,
        #[arg(long)]
        source_lang: Option<String>,
        #[arg(long)]
        target_lang: Option<String>,
        #[arg(long = "context")]
        context: Vec<String>,
    },

    /// Start an extraction job
    StartExtract {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        display_name: String,
        /// Extraction pipeline, repeat for several. Defaults to all of them.
        #[arg(long = "pipeline")]
        pipelines: Vec<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        ephemeral_data: bool,
        #[arg(long)]
        split_long_utterances: bool,
    },

    ListJobs {
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        order_by: Option<String>,
    },

    RetrieveJob { job_name: String },

    DeleteJob { job_name: String },

    ListTranscripts {
        #[arg(long)]
        page_size: Option<u32>,
    },

    RetrieveTranscript { transcript_id: String },

    /// Replace the speaker labels of a transcript
    ChangeSpeakerLabels {
        transcript_id: String,
        /// Label mapping such as `A=Alice`, repeat for several
        #[arg(long = "label", value_parser = parse_label)]
        labels: Vec<(String, String)>,
    },

    ListSummaries {
        #[arg(long)]
        page_size: Option<u32>,
    },

    RetrieveSummary { summary_id: String },

    /// Check that the API key is accepted
    Verify,
}

fn parse_label(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((label, name)) if !label.is_empty() => Ok((label.to_string(), name.to_string())),
        _ => Err(format!("expected LABEL=NAME, got `{value}`")),
    }
}

fn optional_list(values: Vec<String>) -> Option<OneOrMany<String>> {
    if values.is_empty() {
        None
    } else {
        Some(OneOrMany::Many(values))
    }
}

/// `None` for commands that are not an API operation.
async fn into_operation(command: Commands) -> Result<Option<Operation>, Error> {
    let operation = match command {
        Commands::Stats {
            min_created,
            max_created,
            tags,
        } => Operation::GetStats {
            min_created,
            max_created,
            tags: optional_list(tags),
        },
        Commands::StartSummary {
            source,
            display_name,
            summary_type,
            summary_lengths,
            pipelines,
            tags,
            ephemeral_data,
            split_long_utterances,
            source_lang,
            target_lang,
            context,
        } => {
            let options = SummaryOptions {
                ephemeral_data,
                pipelines: OneOrMany::Many(pipelines),
                split_long_utterances,
                summary_length: OneOrMany::Many(summary_lengths),
                tags: optional_list(tags),
                source_lang,
                target_lang,
                context: optional_list(context),
                ..SummaryOptions::default()
            };
            let request = SummaryRequest::new(source.load().await?, display_name, summary_type, options);
            request.validate()?;
            Operation::StartSummary(request)
        }
        Commands::StartExtract {
            source,
            display_name,
            pipelines,
            tags,
            ephemeral_data,
            split_long_utterances,
        } => {
            let mut options = ExtractOptions::new(source.load().await?, display_name);
            if !pipelines.is_empty() {
                options.pipelines = OneOrMany::Many(pipelines);
            }
            options.tags = optional_list(tags);
            options.ephemeral_data = ephemeral_data;
            options.split_long_utterances = split_long_utterances;
            options.validate()?;
            Operation::StartExtract(options)
        }
        Commands::ListJobs {
            page_size,
            order_by,
        } => Operation::ListJobs {
            page_size,
            order_by,
        },
        Commands::RetrieveJob { job_name } => Operation::RetrieveJob { job_name },
        Commands::DeleteJob { job_name } => Operation::DeleteJob { job_name },
        Commands::ListTranscripts { page_size } => Operation::ListTranscripts { page_size },
        Commands::RetrieveTranscript { transcript_id } => {
            Operation::RetrieveTranscript { transcript_id }
        }
        Commands::ChangeSpeakerLabels {
            transcript_id,
            labels,
        } => Operation::ChangeSpeakerLabels {
            transcript_id,
            speaker_map: labels.into_iter().collect(),
        },
        Commands::ListSummaries { page_size } => Operation::ListSummaries { page_size },
        Commands::RetrieveSummary { summary_id } => Operation::RetrieveSummary { summary_id },
        Commands::Verify => return Ok(None),
    };
    Ok(Some(operation))
}

async fn run(cli: Cli) -> Result<Value, Error> {
    let client = WordcabClient::from_config(&cli.config)?;
    info!("Using Wordcab API at {}", client.base_url());

    let Some(operation) = into_operation(cli.command).await? else {
        let valid = client.verify_api_key().await?;
        return Ok(json!({ "valid": valid }));
    };

    let response = client.request(operation).await?;
    serde_json::to_value(response).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "Failed to serialize response".to_string(),
        )),
    })
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    Logger::init_logger(&cli.config);

    match run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("Failed to format output: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
