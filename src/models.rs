//! Data models for per-article analyses and the summaries derived from them.
//!
//! Input records are produced by an LLM, so every input field is optional
//! and loosely typed:
//! - string fields holding anything other than a JSON string read as absent
//! - flags count only when they are JSON `true`
//! - numeric fields stay raw [`Value`]s until [`to_integer`] converts them
//! - nested objects holding anything other than a JSON object read as absent
//!
//! Output records are strict and serialize with a fixed field order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A per-article analysis as returned by the analysis service.
///
/// Protest data sits under `analysis`, matching the structured-output prompt;
/// the article-level scores sit at the top level.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "lenient_object")]
    pub analysis: Option<ProtestAnalysis>,
    /// Name of the publication, e.g. a state outlet or an independent portal.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    /// Publication date of the article (`YYYY-MM-DD` when the model managed it).
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_of_news_issue: Option<String>,
    /// Propaganda score, `0..=10`.
    #[serde(default)]
    pub state_driven_messaging: Option<Value>,
    /// Sympathy-toward-students score, `0..=10`.
    #[serde(default)]
    pub pro_student_messaging: Option<Value>,
    /// How the article speaks about students.
    #[serde(default, deserialize_with = "lenient_object")]
    pub student_mentions: Option<MentionCounts>,
    /// How the article speaks about the state.
    #[serde(default, deserialize_with = "lenient_object")]
    pub state_mentions: Option<MentionCounts>,
    #[serde(default)]
    pub propaganda_count: Option<Value>,
    #[serde(default)]
    pub pro_protest_count: Option<Value>,
}

/// The protest-related part of an analysis.
///
/// `protest_info` is only consulted when `mentions_protest` is JSON `true`;
/// the model often fills it with `"unknown"` placeholders otherwise.
#[derive(Debug, Default, Deserialize)]
pub struct ProtestAnalysis {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub mentions_protest: bool,
    #[serde(default, deserialize_with = "lenient_object")]
    pub protest_info: Option<ProtestInfo>,
}

/// What the article says about the protest itself. The model writes
/// `"unknown"` for fields it could not find; that literal is kept as-is.
#[derive(Debug, Default, Deserialize)]
pub struct ProtestInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub organizer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub count: Option<HeadCountEstimates>,
    /// Latitude, when an upstream step already geolocated the protest.
    #[serde(default, deserialize_with = "lenient_number")]
    pub x: Option<f64>,
    /// Longitude, paired with `x`.
    #[serde(default, deserialize_with = "lenient_number")]
    pub y: Option<f64>,
}

/// Crowd size estimates as reported by each side. Raw values; see [`to_integer`].
#[derive(Debug, Default, Deserialize)]
pub struct HeadCountEstimates {
    #[serde(default)]
    pub government: Option<Value>,
    #[serde(default)]
    pub independent: Option<Value>,
}

/// Positive and negative mention counts for one subject of an article.
///
/// Both values are raw and go through [`to_integer`] before being summed.
#[derive(Debug, Default, Deserialize)]
pub struct MentionCounts {
    #[serde(default)]
    pub good_count: Option<Value>,
    #[serde(default)]
    pub bad_count: Option<Value>,
}

/// A per-article analysis tagged with publication date and outlet type,
/// consumed by the daily rollup.
#[derive(Debug, Default, Deserialize)]
pub struct ExtendedAnalysisRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub publish_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub analysis: Option<ArticleFlags>,
}

/// Per-article yes/no answers used by the daily rollup.
///
/// A flag counts only when it is JSON `true`; `"true"`, `1` or a missing
/// field all read as `false`. `student_mention_sentiment` is expected to be
/// `"good"` or `"bad"` (see [`Sentiment::from_label`]).
#[derive(Debug, Default, Deserialize)]
pub struct ArticleFlags {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub mentions_students: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_mention_sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_propaganda: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub mentions_protest: bool,
}

/// One distinct protest, keyed by `(date, location)`.
///
/// `x`/`y` (latitude/longitude) are only serialized when known, so a protest
/// in an unrecognized place keeps the four-field shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtestRecord {
    pub date: String,
    pub location: String,
    pub organizer: Option<String>,
    pub count: ProtestCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl ProtestRecord {
    /// Create a record for a newly seen protest key.
    ///
    /// # Arguments
    ///
    /// * `date` - The (possibly normalized) protest date
    /// * `location` - The protest location, verbatim
    ///
    /// # Returns
    ///
    /// A record with no organizer, no crowd estimates and no coordinates;
    /// the deduplicator fills those in first-write-wins.
    pub fn new(date: String, location: String) -> Self {
        Self {
            date,
            location,
            organizer: None,
            count: ProtestCount::default(),
            x: None,
            y: None,
        }
    }

    /// `true` once both coordinates are set.
    pub fn is_located(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtestCount {
    pub government: Option<i64>,
    pub independent: Option<i64>,
}

/// Outlet classification used by the daily rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Government,
    Independent,
}

impl SourceType {
    /// Exact match only; `"Government"` or `"unknown"` are not source types.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "government" => Some(SourceType::Government),
            "independent" => Some(SourceType::Independent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Good,
    Bad,
}

impl Sentiment {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "good" => Some(Sentiment::Good),
            "bad" => Some(Sentiment::Bad),
            _ => None,
        }
    }
}

/// Counters for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    pub student_mentions: StudentMentions,
    /// Number of articles flagged as propaganda.
    pub state_driven_messaging: u64,
    /// Number of articles mentioning a protest.
    pub protest_count: u64,
}

impl DailyRecord {
    /// Create the all-zero record for a date.
    ///
    /// # Arguments
    ///
    /// * `date` - The publication date this record counts
    ///
    /// # Returns
    ///
    /// A record whose counters are all zero. A date that only ever sees
    /// unqualifying articles is still emitted in this shape.
    pub fn empty(date: String) -> Self {
        Self {
            date,
            student_mentions: StudentMentions::default(),
            state_driven_messaging: 0,
            protest_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentMentions {
    pub government: SentimentTally,
    pub independent: SentimentTally,
}

impl StudentMentions {
    pub fn bump(&mut self, source: SourceType, sentiment: Sentiment) {
        let tally = match source {
            SourceType::Government => &mut self.government,
            SourceType::Independent => &mut self.independent,
        };
        match sentiment {
            Sentiment::Good => tally.good += 1,
            Sentiment::Bad => tally.bad += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    pub good: u64,
    pub bad: u64,
}

/// Summed article scores for one publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDayRecord {
    pub date: String,
    /// Number of articles folded into this day.
    pub articles: u64,
    pub state_driven_messaging: i64,
    pub pro_student_messaging: i64,
    pub student_mentions: MentionTally,
    pub state_mentions: MentionTally,
    pub propaganda_count: i64,
    pub pro_protest_count: i64,
}

impl IssueDayRecord {
    pub fn empty(date: String) -> Self {
        Self {
            date,
            articles: 0,
            state_driven_messaging: 0,
            pro_student_messaging: 0,
            student_mentions: MentionTally::default(),
            state_mentions: MentionTally::default(),
            propaganda_count: 0,
            pro_protest_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionTally {
    pub good_count: i64,
    pub bad_count: i64,
}

/// Convert a loosely typed JSON value to an integer.
///
/// Integers pass through, finite floats truncate toward zero, and strings
/// convert when their trimmed text is a base-10 integer. Booleans, `"unknown"`
/// and anything structured fail.
pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// `Some(s)` only for non-empty strings.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        _ => None,
    })
}

/// Decode a nested object, treating any non-object (`"unknown"`, a number, a
/// list) as absent instead of failing the whole line.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}
