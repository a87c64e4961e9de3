use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of the source a report comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// World Health Organization.
    Who,
    /// Centers for Disease Control and Prevention.
    Cdc,
    /// News media.
    News,
    /// User submitted report.
    User,
}

impl SourceType {
    /// Icon shown next to the feed entry.
    pub fn icon(&self) -> &'static str {
        match self {
            SourceType::Who => "🛡️",
            SourceType::Cdc => "🏛️",
            SourceType::News => "📰",
            SourceType::User => "👤",
        }
    }
}

/// A source report about an outbreak. Every report belongs to exactly one outbreak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Row id.
    pub id: String,
    /// Id of the parent outbreak.
    pub outbreak_id: String,
    /// Source classification.
    pub source_type: SourceType,
    /// Display name of the source.
    pub source_name: String,
    /// Report title.
    pub title: String,
    /// Link to the original report.
    #[serde(default)]
    pub url: Option<String>,
    /// Report text.
    #[serde(default)]
    pub content: Option<String>,
    /// Publication time. Reports without it are sorted after all others.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// When the row was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
