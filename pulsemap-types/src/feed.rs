use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outbreak::{lenient_severity, Severity};
use crate::report::SourceType;

/// Display location used when a report's outbreak has no locations.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// A report flattened with its parent outbreak, as shown in the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Id of the source report.
    pub id: String,
    /// Id of the parent outbreak.
    pub outbreak_id: String,
    /// Source classification.
    pub source_type: SourceType,
    /// Display name of the source.
    pub source_name: String,
    /// Disease name of the parent outbreak.
    pub disease_name: String,
    /// Report title.
    pub title: String,
    /// Country of the outbreak's first location, or [`UNKNOWN_LOCATION`].
    pub location: String,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Severity of the parent outbreak.
    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: Option<Severity>,
}
