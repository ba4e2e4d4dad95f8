//! Source objects: the input a summarization or extraction job runs on.
//!
//! A source is either a file (local or remote) whose bytes are loaded when the
//! source is built, or an in-memory transcript. Each source knows how to turn
//! itself into the request body the API expects.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};
use url::Url;
use wordcab_types::config::{AVAILABLE_AUDIO_FORMATS, AVAILABLE_GENERIC_FORMATS, REQUEST_TIMEOUT_SECS};

use crate::error::{source_error, DomainErrorKind, Error, InternalErrorKind};

/// Where a file-backed source lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Local(PathBuf),
    Remote {
        url: Url,
        headers: HashMap<String, String>,
    },
}

/// Location and file name parts shared by every file-backed source.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseSource {
    location: Location,
    stem: String,
    suffix: String,
}

impl BaseSource {
    /// Build a source from exactly one of a local path or a remote URL.
    pub fn new(
        filepath: Option<PathBuf>,
        url: Option<&str>,
        url_headers: Option<HashMap<String, String>>,
    ) -> Result<Self, Error> {
        match (filepath, url) {
            (Some(path), None) => Self::from_path(path),
            (None, Some(url)) => Self::from_url(url, url_headers.unwrap_or_default()),
            (None, None) => Err(source_error(
                "Provide either a local or a remote source, `filepath` or `url`",
            )),
            (Some(_), Some(_)) => Err(source_error(
                "Provide either a local or a remote source, not both `filepath` and `url`",
            )),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if !path.exists() {
            warn!("Source file {} does not exist", path.display());
            return Err(source_error(format!(
                "File {} does not exist or is not accessible",
                path.display()
            )));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        Ok(Self {
            location: Location::Local(path),
            stem,
            suffix,
        })
    }

    /// Build a remote source. `headers` are sent when the file is fetched,
    /// e.g. to authenticate against the file host.
    pub fn from_url(url: &str, headers: HashMap<String, String>) -> Result<Self, Error> {
        let parsed = Url::parse(url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .ok_or_else(|| source_error(format!("{url} is not a valid URL")))?;

        let last_segment = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let file_name = urlencoding::decode(last_segment)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| last_segment.to_string());
        let (stem, suffix) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
            None => (file_name, String::new()),
        };

        Ok(Self {
            location: Location::Remote {
                url: parsed,
                headers,
            },
            stem,
            suffix,
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.stem, self.suffix)
    }

    /// `local` or `remote`.
    pub fn source_type(&self) -> &'static str {
        match self.location {
            Location::Local(_) => "local",
            Location::Remote { .. } => "remote",
        }
    }

    fn has_suffix_in(&self, formats: &[&str]) -> bool {
        formats.contains(&self.suffix.to_lowercase().as_str())
    }

    async fn load(&self) -> Result<Vec<u8>, Error> {
        match &self.location {
            Location::Local(path) => load_file_from_path(path).await,
            Location::Remote { url, headers } => load_file_from_url(url, headers).await,
        }
    }
}

async fn load_file_from_path(path: &Path) -> Result<Vec<u8>, Error> {
    debug!("Loading source file {}", path.display());
    tokio::fs::read(path).await.map_err(|err| {
        warn!("Failed to read {}: {:?}", path.display(), err);
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Source(format!(
                "Could not read {}",
                path.display()
            ))),
        }
    })
}

async fn load_file_from_url(url: &Url, headers: &HashMap<String, String>) -> Result<Vec<u8>, Error> {
    debug!("Fetching source file from {url}");
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| source_error(format!("Invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| source_error(format!("Invalid value for header {name}")))?;
        header_map.insert(name, value);
    }

    let client = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    let response = client
        .get(url.clone())
        .headers(header_map)
        .send()
        .await
        .map_err(|e| {
            warn!("Failed to fetch source file from {url}: {e:?}");
            e
        })?
        .error_for_status()?;

    Ok(response.bytes().await?.to_vec())
}

/// A transcript file (`.json` or `.txt`).
#[derive(Clone)]
pub struct GenericSource {
    base: BaseSource,
    file_object: Vec<u8>,
}

impl GenericSource {
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        Self::from_base(BaseSource::from_path(path)?).await
    }

    pub async fn from_url(url: &str, headers: HashMap<String, String>) -> Result<Self, Error> {
        Self::from_base(BaseSource::from_url(url, headers)?).await
    }

    /// Check the file format, then load the file.
    pub async fn from_base(base: BaseSource) -> Result<Self, Error> {
        if !base.has_suffix_in(AVAILABLE_GENERIC_FORMATS) {
            return Err(source_error(format!(
                "{} is not a valid generic file format",
                base.suffix()
            )));
        }
        let file_object = base.load().await?;
        Ok(Self { base, file_object })
    }

    pub fn base(&self) -> &BaseSource {
        &self.base
    }

    pub fn file_object(&self) -> &[u8] {
        &self.file_object
    }

    /// `{"transcript": ...}` where a `.json` file is embedded as is and a
    /// `.txt` file becomes its list of lines.
    pub fn payload(&self) -> Result<Value, Error> {
        let transcript = if self.base.suffix.eq_ignore_ascii_case(".json") {
            serde_json::from_slice::<Value>(&self.file_object).map_err(|err| {
                warn!("Source file {} is not valid JSON: {:?}", self.base.file_name(), err);
                source_error(format!("{} is not valid JSON: {err}", self.base.file_name()))
            })?
        } else {
            let text = std::str::from_utf8(&self.file_object).map_err(|_| {
                source_error(format!("{} is not valid UTF-8", self.base.file_name()))
            })?;
            Value::from(split_lines(text))
        };

        Ok(json!({ "transcript": transcript }))
    }
}

/// Break on `\n`, `\r\n` and a lone `\r`.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(end) => {
                lines.push(&rest[..end]);
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + width..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

impl fmt::Debug for GenericSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericSource")
            .field("base", &self.base)
            .field("file_object", &format_args!("{} bytes", self.file_object.len()))
            .finish()
    }
}

/// An audio recording to transcribe.
#[derive(Clone)]
pub struct AudioSource {
    base: BaseSource,
    file_object: Vec<u8>,
}

impl AudioSource {
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        Self::from_base(BaseSource::from_path(path)?).await
    }

    pub async fn from_url(url: &str, headers: HashMap<String, String>) -> Result<Self, Error> {
        Self::from_base(BaseSource::from_url(url, headers)?).await
    }

    pub async fn from_base(base: BaseSource) -> Result<Self, Error> {
        if !base.has_suffix_in(AVAILABLE_AUDIO_FORMATS) {
            return Err(source_error(format!(
                "{} is not a valid audio file format",
                base.suffix()
            )));
        }
        let file_object = base.load().await?;
        Ok(Self { base, file_object })
    }

    pub fn base(&self) -> &BaseSource {
        &self.base
    }

    pub fn file_object(&self) -> &[u8] {
        &self.file_object
    }
}

impl fmt::Debug for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSource")
            .field("base", &self.base)
            .field("file_object", &format_args!("{} bytes", self.file_object.len()))
            .finish()
    }
}

/// A transcript already held in memory, one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemorySource {
    transcript: Vec<String>,
}

impl InMemorySource {
    pub fn new(lines: Vec<String>) -> Self {
        Self { transcript: lines }
    }

    /// Accepts a list of strings or an object holding that list under
    /// `transcript`.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let lines = match value {
            Value::Array(_) => value,
            Value::Object(mut obj) => obj.remove("transcript").ok_or_else(|| {
                source_error("An in-memory object must have a `transcript` key")
            })?,
            _ => {
                return Err(source_error(
                    "An in-memory object must be a list or an object",
                ))
            }
        };

        let transcript = serde_json::from_value::<Vec<String>>(lines)
            .map_err(|_| source_error("The `transcript` value must be a list of strings"))?;
        Ok(Self { transcript })
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn payload(&self) -> Value {
        json!({ "transcript": self.transcript })
    }
}

/// Request body for a job.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart { file_name: String, bytes: Vec<u8> },
}

/// Any source a job can be started from.
#[derive(Debug, Clone)]
pub enum Source {
    Generic(GenericSource),
    Audio(AudioSource),
    InMemory(InMemorySource),
}

impl Source {
    /// Load a local file, picking the source kind from its extension.
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        Self::from_base(BaseSource::from_path(path)?).await
    }

    /// Fetch a remote file, picking the source kind from its extension.
    pub async fn from_url(url: &str, headers: HashMap<String, String>) -> Result<Self, Error> {
        Self::from_base(BaseSource::from_url(url, headers)?).await
    }

    async fn from_base(base: BaseSource) -> Result<Self, Error> {
        if base.has_suffix_in(AVAILABLE_AUDIO_FORMATS) {
            Ok(Source::Audio(AudioSource::from_base(base).await?))
        } else {
            Ok(Source::Generic(GenericSource::from_base(base).await?))
        }
    }

    /// Value of the `source` query parameter.
    pub fn source(&self) -> &'static str {
        match self {
            Source::Audio(_) => "audio",
            Source::Generic(_) | Source::InMemory(_) => "generic",
        }
    }

    /// `local`, `remote` or `in_memory`.
    pub fn source_type(&self) -> &'static str {
        match self {
            Source::Generic(source) => source.base.source_type(),
            Source::Audio(source) => source.base.source_type(),
            Source::InMemory(_) => "in_memory",
        }
    }

    pub fn payload(&self) -> Result<Payload, Error> {
        match self {
            Source::Generic(source) => Ok(Payload::Json(source.payload()?)),
            Source::Audio(source) => Ok(Payload::Multipart {
                file_name: source.base.file_name(),
                bytes: source.file_object.clone(),
            }),
            Source::InMemory(source) => Ok(Payload::Json(source.payload())),
        }
    }
}

impl From<GenericSource> for Source {
    fn from(source: GenericSource) -> Self {
        Source::Generic(source)
    }
}

impl From<AudioSource> for Source {
    fn from(source: AudioSource) -> Self {
        Source::Audio(source)
    }
}

impl From<InMemorySource> for Source {
    fn from(source: InMemorySource) -> Self {
        Source::InMemory(source)
    }
}
