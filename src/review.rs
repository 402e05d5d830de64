//! Merged pull request records as returned by `gh pr list --json`, and the
//! per-item metrics derived from them.
//!
//! Defaults are applied at deserialization time: missing or null
//! `additions`/`deletions` become 0, missing or null `labels`/`reviews` become
//! empty, a null label name is empty, and review states outside the counted
//! set (null included) collapse into `Other`.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// A merged pull request. Read-only once fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub merged_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deletions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: ReviewState,
}

/// Review states. Only the first three count as a review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    ChangesRequested,
    Approved,
    Commented,
    /// DISMISSED, PENDING, or anything else the API adds later.
    #[default]
    #[serde(other)]
    Other,
}

impl ReviewState {
    pub fn is_cycle(self) -> bool {
        matches!(
            self,
            ReviewState::ChangesRequested | ReviewState::Approved | ReviewState::Commented
        )
    }
}

impl ReviewRequest {
    /// Hours from creation to merge, or `None` if the PR has no merge time.
    pub fn time_to_merge_hours(&self) -> Option<f64> {
        let merged_at = self.merged_at?;
        let delta = merged_at - self.created_at;
        Some(delta.num_milliseconds() as f64 / 3_600_000.0)
    }

    /// Total lines changed.
    pub fn size(&self) -> u64 {
        self.additions + self.deletions
    }

    pub fn review_cycles(&self) -> u32 {
        self.reviews.iter().filter(|r| r.state.is_cycle()).count() as u32
    }
}

/// Parse an ISO-8601 timestamp, normalizing a trailing `Z` to `+00:00`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .map_err(|e| serde::de::Error::custom(format!("bad timestamp {raw:?}: {e}")))
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => parse_timestamp(&raw)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("bad timestamp {raw:?}: {e}"))),
        _ => Ok(None),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
