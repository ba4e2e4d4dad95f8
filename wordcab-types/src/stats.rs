//! Account statistics.

use serde::{Deserialize, Serialize};

/// Account usage for a time window, optionally filtered by tags.
///
/// Returned by the stats endpoint as is; the fields carry no invariants of
/// their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub account_email: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub monthly_request_limit: Option<u64>,
    #[serde(default)]
    pub request_count: u64,
    #[serde(default)]
    pub minutes_summarized: f64,
    #[serde(default)]
    pub transcripts_summarized: u64,
    #[serde(default)]
    pub metered_charge: Option<String>,
    #[serde(default)]
    pub min_created: Option<String>,
    #[serde(default)]
    pub max_created: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
