use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Minimum length of the trimmed need description, in UTF-16 code units.
pub const MIN_NEED_CHARS: usize = 5;

/// Maximum number of requirements accepted per request.
pub const MAX_REQUIREMENTS: usize = 10;

/// Weight applied when a requirement has no (or an invalid) weight.
pub const DEFAULT_WEIGHT: u8 = 5;

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 10;

/// Session used when the caller does not identify one.
pub const DEFAULT_SESSION: &str = "default";

/// Unique identifier for a shortlist, wrapping a random UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortlistId(pub Uuid);

impl ShortlistId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight characters of the id, used in export file names.
    pub fn short(&self) -> String {
        self.0.to_string().chars().take(8).collect()
    }
}

impl Default for ShortlistId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShortlistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShortlistId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Raw submit body as sent by a client.
///
/// Fields are loosely typed so that validation can report the same
/// human-readable messages regardless of how the body is malformed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistRequest {
    #[serde(default)]
    pub need: Option<serde_json::Value>,
    #[serde(default)]
    pub requirements: Option<serde_json::Value>,
    #[serde(default)]
    pub weights: Option<serde_json::Value>,
    #[serde(default)]
    pub excluded_vendors: Option<serde_json::Value>,
}

/// A validated, normalised shortlist request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistInput {
    pub need: String,
    pub requirements: Vec<String>,
    /// Every requirement has an entry in 1..=10.
    pub weights: BTreeMap<String, u8>,
    pub excluded_vendors: Vec<String>,
}

impl ShortlistInput {
    /// Weight for a requirement, falling back to the default.
    pub fn weight(&self, requirement: &str) -> u8 {
        self.weights
            .get(requirement)
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }
}

/// Whether a vendor covers one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMatch {
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub matched: bool,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceLink {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// One vendor entry in a shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorResult {
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub summary: String,
    /// Weighted match against the requirements, 0-100.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub matched_features: Vec<FeatureMatch>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub evidence_links: Vec<EvidenceLink>,
}

/// Accept any JSON number (or numeric string) and clamp it into 0..=100.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// The result blob of one shortlist build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub vendors: Vec<VendorResult>,
    #[serde(default)]
    pub recommendation: String,
    /// Missing on results stored before the field existed; see
    /// [`Shortlist::with_generated_at_fallback`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Set when the LLM quota was exhausted and the static catalogue was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_exhausted: Option<bool>,
}

/// A persisted shortlist record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortlist {
    pub id: ShortlistId,
    pub session_id: String,
    pub need: String,
    pub requirements: Vec<String>,
    pub weights: BTreeMap<String, u8>,
    pub excluded_vendors: Vec<String>,
    pub results: ShortlistResult,
    pub created_at: DateTime<Utc>,
}

impl Shortlist {
    /// Assemble a new record from validated input and a build result.
    pub fn new(
        id: ShortlistId,
        session_id: impl Into<String>,
        input: ShortlistInput,
        results: ShortlistResult,
    ) -> Self {
        Self {
            id,
            session_id: session_id.into(),
            need: input.need,
            requirements: input.requirements,
            weights: input.weights,
            excluded_vendors: input.excluded_vendors,
            results,
            created_at: Utc::now(),
        }
    }

    /// Fill a missing `generatedAt` with the record's creation time.
    pub fn with_generated_at_fallback(mut self) -> Self {
        if self.results.generated_at.is_none() {
            self.results.generated_at = Some(self.created_at);
        }
        self
    }
}

/// Aggregate numbers about the backing store, shown in the health report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    pub count: i64,
    pub size_mb: f64,
}
