use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PulseTypesError;

/// Severity tier of an outbreak. Tiers are ordered from `Low` to `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low severity.
    Low,
    /// Moderate severity.
    Moderate,
    /// Severe outbreak.
    Severe,
    /// Critical outbreak.
    Critical,
}

impl Severity {
    /// All tiers, from the lowest to the highest.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Moderate,
        Severity::Severe,
        Severity::Critical,
    ];

    /// Lowercase identifier of the tier, as stored in the data source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Critical => "critical",
        }
    }

    /// Human readable name of the tier (used by the legend).
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Critical => "Critical",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = PulseTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| PulseTypesError::UnknownVariant {
                kind: "severity",
                value: s.to_string(),
            })
    }
}

/// Deserializes an optional severity, mapping unknown tiers to `None`.
pub fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.parse().ok()))
}

/// Lifecycle status of an outbreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutbreakStatus {
    /// Ongoing transmission.
    Active,
    /// Under observation.
    Monitoring,
    /// Over.
    Resolved,
}

impl OutbreakStatus {
    /// Capitalized name of the status.
    pub fn label(&self) -> &'static str {
        match self {
            OutbreakStatus::Active => "Active",
            OutbreakStatus::Monitoring => "Monitoring",
            OutbreakStatus::Resolved => "Resolved",
        }
    }
}

/// An outbreak row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outbreak {
    /// Row id.
    pub id: String,
    /// Name of the disease.
    pub disease_name: String,
    /// Lifecycle status.
    pub status: OutbreakStatus,
    /// Severity tier. `None` if the stored value is not one of the known tiers.
    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: Option<Severity>,
    /// When the outbreak was first reported.
    pub first_reported: DateTime<Utc>,
    /// Last upstream update of the row.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Free text summary.
    #[serde(default)]
    pub summary: Option<String>,
}

/// A geographic location affected by an outbreak. Every location belongs to exactly one
/// [`Outbreak`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakLocation {
    /// Row id.
    pub id: String,
    /// Id of the parent outbreak.
    pub outbreak_id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Country name.
    pub country: String,
    /// Region inside the country.
    #[serde(default)]
    pub region: Option<String>,
    /// Number of reported cases.
    pub case_count: u64,
    /// Severity score in `[0.0, 1.0]`.
    pub severity_score: f64,
    /// When the location was reported.
    #[serde(default)]
    pub reported_at: Option<DateTime<Utc>>,
}
