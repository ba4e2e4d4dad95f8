//! Allowed parameter values and limits of the Wordcab API.

use std::ops::RangeInclusive;

/// Base URL of the hosted API.
pub const WORDCAB_API_URL: &str = "https://wordcab.com/api/v1";

/// Default timeout for a single API call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const AVAILABLE_AUDIO_FORMATS: &[&str] = &[".flac", ".m4a", ".mp3", ".mpga", ".ogg", ".wav"];

pub const AVAILABLE_GENERIC_FORMATS: &[&str] = &[".json", ".txt"];

/// Context elements that can be extracted alongside a summary.
pub const CONTEXT_ELEMENTS: &[&str] = &[
    "discussion_points",
    "issue",
    "keywords",
    "next_steps",
    "purpose",
];

pub const EXTRACT_PIPELINES: &[&str] = &[
    "emotions",
    "questions_answers",
    "speaker_talk_ratios",
    "topic_segments",
];

pub const SOURCE_LANG: &[&str] = &["de", "en", "es", "fr", "it", "nl", "pt", "sv"];

pub const TARGET_LANG: &[&str] = &["de", "en", "es", "fr", "it", "nl", "pt", "sv"];

pub const SUMMARY_PIPELINES: &[&str] = &["transcribe", "summarize"];

pub const SUMMARY_TYPES: &[&str] = &[
    "conversational",
    "narrative",
    "no_speaker",
    "reason_conclusion",
];

/// Inclusive bounds for a requested summary length.
pub const SUMMARY_LENGTHS_RANGE: RangeInclusive<u32> = 1..=5;

/// Summary type that ignores the requested lengths.
pub const REASON_CONCLUSION: &str = "reason_conclusion";
