//! Projection of flat relational rows into the map feature set and the feed list.
//!
//! Rows are joined with their parents by foreign key in two steps: the parent rows are put into
//! an [`OutbreakIndex`], then every child row is resolved against it. A child whose parent is
//! missing from the batch is dropped, the rest of the batch is kept.

use std::cmp::Ordering;
use std::collections::HashMap;

use pulsemap_types::{
    FeatureCollection, FeatureProperties, FeedItem, GeoPoint, Outbreak, OutbreakFeature,
    OutbreakLocation, Report, UNKNOWN_LOCATION,
};

/// Side table of outbreaks keyed by id.
#[derive(Debug, Default, Clone)]
pub struct OutbreakIndex<'a> {
    outbreaks: HashMap<&'a str, &'a Outbreak>,
}

impl<'a> OutbreakIndex<'a> {
    /// Builds the index. If several rows share an id, the first one is used.
    pub fn new(outbreaks: &'a [Outbreak]) -> Self {
        let mut index = HashMap::with_capacity(outbreaks.len());
        for outbreak in outbreaks {
            index.entry(outbreak.id.as_str()).or_insert(outbreak);
        }

        Self { outbreaks: index }
    }

    /// Returns the outbreak with the given id.
    pub fn get(&self, id: &str) -> Option<&'a Outbreak> {
        self.outbreaks.get(id).copied()
    }

    /// Number of indexed outbreaks.
    pub fn len(&self) -> usize {
        self.outbreaks.len()
    }

    /// True if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.outbreaks.is_empty()
    }
}

/// Converts location rows into a feature collection, one feature per location.
///
/// Locations whose parent outbreak is not in `outbreaks` are dropped.
pub fn project_features(
    locations: &[OutbreakLocation],
    outbreaks: &OutbreakIndex,
) -> FeatureCollection {
    let features: FeatureCollection = locations
        .iter()
        .filter_map(|location| project_location(location, outbreaks))
        .collect();

    let dropped = locations.len() - features.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} location rows without a matching outbreak");
    }

    features
}

fn project_location(
    location: &OutbreakLocation,
    outbreaks: &OutbreakIndex,
) -> Option<OutbreakFeature> {
    let Some(outbreak) = outbreaks.get(&location.outbreak_id) else {
        log::debug!(
            "Location {} references unknown outbreak {}",
            location.id,
            location.outbreak_id
        );
        return None;
    };

    let properties = FeatureProperties {
        id: location.id.clone(),
        outbreak_id: location.outbreak_id.clone(),
        disease_name: outbreak.disease_name.clone(),
        severity: outbreak.severity,
        severity_score: location.severity_score,
        case_count: location.case_count,
        country: location.country.clone(),
        region: location.region.clone(),
        status: outbreak.status,
        summary: outbreak.summary.clone(),
    };

    Some(OutbreakFeature::new(
        GeoPoint::lonlat(location.longitude, location.latitude),
        properties,
    ))
}

/// Converts report rows into feed items, newest first.
///
/// The display location of an item is the country of the first location (in `locations`
/// order) of the report's outbreak, or [`UNKNOWN_LOCATION`] if the outbreak has none. Reports
/// whose outbreak is not in `outbreaks` are dropped.
pub fn project_feed(
    reports: &[Report],
    outbreaks: &OutbreakIndex,
    locations: &[OutbreakLocation],
) -> Vec<FeedItem> {
    let mut first_country: HashMap<&str, &str> = HashMap::new();
    for location in locations {
        first_country
            .entry(location.outbreak_id.as_str())
            .or_insert(location.country.as_str());
    }

    let mut items: Vec<FeedItem> = reports
        .iter()
        .filter_map(|report| {
            let Some(outbreak) = outbreaks.get(&report.outbreak_id) else {
                log::debug!(
                    "Report {} references unknown outbreak {}",
                    report.id,
                    report.outbreak_id
                );
                return None;
            };

            let location = first_country
                .get(report.outbreak_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_LOCATION);

            Some(FeedItem {
                id: report.id.clone(),
                outbreak_id: report.outbreak_id.clone(),
                source_type: report.source_type,
                source_name: report.source_name.clone(),
                disease_name: outbreak.disease_name.clone(),
                title: report.title.clone(),
                location: location.to_string(),
                published_at: report.published_at,
                severity: outbreak.severity,
            })
        })
        .collect();

    let dropped = reports.len() - items.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} report rows without a matching outbreak");
    }

    sort_feed(&mut items);
    items
}

/// Sorts feed items by publication time, newest first. Items without a publication time go
/// last. The sort is stable.
pub fn sort_feed(items: &mut [FeedItem]) {
    items.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, Utc};
    use pulsemap_types::{latlon, OutbreakStatus, Severity, SourceType};

    use super::*;

    pub(crate) fn outbreak(id: &str, disease_name: &str, severity: Severity) -> Outbreak {
        Outbreak {
            id: id.to_string(),
            disease_name: disease_name.to_string(),
            status: OutbreakStatus::Active,
            severity: Some(severity),
            first_reported: timestamp("2025-03-10T00:00:00Z"),
            last_updated: None,
            summary: Some(format!("{disease_name} outbreak")),
        }
    }

    pub(crate) fn location(
        id: &str,
        outbreak_id: &str,
        country: &str,
        (lat, lon): (f64, f64),
        case_count: u64,
    ) -> OutbreakLocation {
        OutbreakLocation {
            id: id.to_string(),
            outbreak_id: outbreak_id.to_string(),
            latitude: lat,
            longitude: lon,
            country: country.to_string(),
            region: None,
            case_count,
            severity_score: 0.5,
            reported_at: None,
        }
    }

    pub(crate) fn report(id: &str, outbreak_id: &str, published_at: Option<&str>) -> Report {
        Report {
            id: id.to_string(),
            outbreak_id: outbreak_id.to_string(),
            source_type: SourceType::Who,
            source_name: "WHO".to_string(),
            title: format!("Report {id}"),
            url: None,
            content: None,
            published_at: published_at.map(timestamp),
            created_at: None,
        }
    }

    pub(crate) fn timestamp(value: &str) -> DateTime<Utc> {
        value.parse().unwrap()
    }

    #[test]
    fn features_merge_location_and_outbreak_fields() {
        let outbreaks = vec![outbreak("o1", "Cholera", Severity::Critical)];
        let mut loc = location("l1", "o1", "Somalia", (2.0469, 47.5321), 35000);
        loc.region = Some("Banadir".to_string());
        loc.severity_score = 0.9;

        let collection = project_features(&[loc], &OutbreakIndex::new(&outbreaks));

        assert_eq!(collection.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(feature.position(), latlon!(2.0469, 47.5321));
        assert_eq!(feature.geometry.coordinates.to_position(), [47.5321, 2.0469]);

        let p = &feature.properties;
        assert_eq!(p.id, "l1");
        assert_eq!(p.outbreak_id, "o1");
        assert_eq!(p.disease_name, "Cholera");
        assert_eq!(p.severity, Some(Severity::Critical));
        assert_eq!(p.status, OutbreakStatus::Active);
        assert_eq!(p.summary.as_deref(), Some("Cholera outbreak"));
        assert_eq!(p.country, "Somalia");
        assert_eq!(p.region.as_deref(), Some("Banadir"));
        assert_eq!(p.case_count, 35000);
        assert_eq!(p.severity_score, 0.9);
    }

    #[test]
    fn rows_without_outbreak_are_dropped() {
        let outbreaks = vec![
            outbreak("o1", "Cholera", Severity::Critical),
            outbreak("o2", "Dengue", Severity::Severe),
        ];
        let locations = vec![
            location("l1", "o1", "Somalia", (2.0, 47.0), 10),
            location("l2", "missing", "Nowhere", (0.0, 0.0), 10),
            location("l3", "o2", "Brazil", (-22.9, -43.2), 10),
            location("l4", "o1", "Ethiopia", (8.6, 39.7), 10),
        ];

        let collection = project_features(&locations, &OutbreakIndex::new(&outbreaks));

        let ids: Vec<_> = collection
            .iter()
            .map(|f| (f.properties.id.as_str(), f.outbreak_id()))
            .collect();
        assert_eq!(ids, [("l1", "o1"), ("l3", "o2"), ("l4", "o1")]);
    }

    #[test]
    fn empty_batch_gives_empty_collection() {
        let collection = project_features(&[], &OutbreakIndex::default());
        assert!(collection.is_empty());
    }

    #[test]
    fn feed_uses_first_location_country() {
        let outbreaks = vec![
            outbreak("o1", "Mpox (Clade Ib)", Severity::Critical),
            outbreak("o2", "Measles", Severity::Severe),
        ];
        let locations = vec![
            location("l1", "o1", "DR Congo", (-4.0, 21.7), 48251),
            location("l2", "o1", "Rwanda", (-1.9, 29.8), 3842),
        ];
        let reports = vec![
            report("r1", "o1", Some("2026-02-01T08:00:00Z")),
            report("r2", "o2", Some("2026-01-31T14:00:00Z")),
        ];

        let feed = project_feed(&reports, &OutbreakIndex::new(&outbreaks), &locations);

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].location, "DR Congo");
        assert_eq!(feed[0].disease_name, "Mpox (Clade Ib)");
        assert_eq!(feed[0].severity, Some(Severity::Critical));
        assert_eq!(feed[1].location, UNKNOWN_LOCATION);
    }

    #[test]
    fn feed_is_sorted_newest_first_with_missing_last() {
        let outbreaks = vec![outbreak("o1", "Cholera", Severity::Severe)];
        let reports = vec![
            report("undated-1", "o1", None),
            report("old", "o1", Some("2026-01-30T16:00:00Z")),
            report("new", "o1", Some("2026-02-01T06:30:00Z")),
            report("undated-2", "o1", None),
            report("mid", "o1", Some("2026-01-31T09:00:00Z")),
            report("orphan", "o9", Some("2026-02-02T00:00:00Z")),
        ];

        let feed = project_feed(&reports, &OutbreakIndex::new(&outbreaks), &[]);

        let ids: Vec<_> = feed.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old", "undated-1", "undated-2"]);

        for pair in feed.windows(2) {
            match (pair[0].published_at, pair[1].published_at) {
                (Some(a), Some(b)) => assert!(a >= b),
                (None, Some(_)) => panic!("undated item before a dated one"),
                _ => {}
            }
        }
    }

    #[test]
    fn index_keeps_first_duplicate() {
        let outbreaks = vec![
            outbreak("o1", "Cholera", Severity::Severe),
            outbreak("o1", "Dengue", Severity::Low),
        ];
        let index = OutbreakIndex::new(&outbreaks);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("o1").map(|o| o.disease_name.as_str()), Some("Cholera"));
    }
}
