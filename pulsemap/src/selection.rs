//! Selected feature and the detail panel contents.

use pulsemap_types::{FeatureCollection, GeoPoint, OutbreakFeature};

/// Holds at most one selected feature and the last camera target.
///
/// The camera target is sticky: closing the detail panel clears the selection but keeps the
/// target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<OutbreakFeature>,
    camera_target: Option<GeoPoint>,
}

impl Selection {
    /// Currently selected feature.
    pub fn selected(&self) -> Option<&OutbreakFeature> {
        self.selected.as_ref()
    }

    /// Last camera target set by a selection.
    pub fn camera_target(&self) -> Option<GeoPoint> {
        self.camera_target
    }

    /// Selects the feature and returns the new camera target (the feature position).
    pub fn select(&mut self, feature: OutbreakFeature) -> GeoPoint {
        let target = feature.position();
        self.selected = Some(feature);
        self.camera_target = Some(target);
        target
    }

    /// Selects the first feature of `collection` belonging to the outbreak.
    ///
    /// If no feature matches, the selection and the camera target stay unchanged and `None` is
    /// returned.
    pub fn select_outbreak(
        &mut self,
        outbreak_id: &str,
        collection: &FeatureCollection,
    ) -> Option<GeoPoint> {
        match collection.find_by_outbreak(outbreak_id) {
            Some(feature) => Some(self.select(feature.clone())),
            None => {
                log::debug!("No feature for outbreak {outbreak_id}, selection unchanged");
                None
            }
        }
    }

    /// Replaces the selected feature with a newer version of it, for example after a reload.
    /// The camera target is not affected.
    pub fn refresh(&mut self, feature: OutbreakFeature) {
        self.selected = Some(feature);
    }

    /// Clears the selection. The camera target is not affected.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Detail panel contents for the selected feature.
    pub fn detail(&self) -> Option<OutbreakDetail> {
        self.selected.as_ref().map(OutbreakDetail::new)
    }
}

/// Display strings of the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutbreakDetail {
    /// Severity tier, `moderate` when unknown.
    pub severity: String,
    /// Whether the severity badge pulses (critical outbreaks).
    pub pulsing: bool,
    /// Disease name.
    pub disease_name: String,
    /// `"<region>, <country>"`, or just the country.
    pub location: String,
    /// Case count: `1.2M`, `3.8K` or the plain number.
    pub cases: String,
    /// Severity score as a whole percentage.
    pub severity_score: String,
    /// Capitalized status.
    pub status: String,
    /// Summary, if any.
    pub summary: Option<String>,
    /// `"lat, lon"` with four decimals.
    pub coordinates: String,
}

impl OutbreakDetail {
    /// Builds the detail contents for a feature.
    pub fn new(feature: &OutbreakFeature) -> Self {
        use pulsemap_types::Severity;

        let p = &feature.properties;
        let severity = p.severity.unwrap_or(Severity::Moderate);
        let location = match &p.region {
            Some(region) => format!("{region}, {}", p.country),
            None => p.country.clone(),
        };
        let position = feature.position();

        Self {
            severity: severity.to_string(),
            pulsing: severity == Severity::Critical,
            disease_name: p.disease_name.clone(),
            location,
            cases: format_count(p.case_count),
            severity_score: format!("{:.0}%", p.severity_score * 100.0),
            status: p.status.label().to_string(),
            summary: p.summary.clone(),
            coordinates: format!("{:.4}, {:.4}", position.lat(), position.lon()),
        }
    }
}

/// Formats a count with a `K` or `M` suffix and one decimal.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pulsemap_types::{latlon, Severity};

    use super::*;
    use crate::view_state::tests::feature;

    #[test]
    fn select_sets_camera_target() {
        let mut selection = Selection::default();
        let a = feature("l1", "o1", latlon!(1.0, 2.0), 10, None);
        let b = feature("l2", "o2", latlon!(-3.0, 4.0), 10, None);

        selection.select(a);
        selection.select(b.clone());

        assert_eq!(selection.selected(), Some(&b));
        assert_eq!(selection.camera_target(), Some(latlon!(-3.0, 4.0)));
    }

    #[test]
    fn clear_keeps_camera_target() {
        let mut selection = Selection::default();
        selection.select(feature("l1", "o1", latlon!(1.0, 2.0), 10, None));
        selection.clear();

        assert!(selection.selected().is_none());
        assert!(selection.detail().is_none());
        assert_eq!(selection.camera_target(), Some(latlon!(1.0, 2.0)));
    }

    #[test]
    fn refresh_keeps_camera_target() {
        let mut selection = Selection::default();
        selection.select(feature("l1", "o1", latlon!(1.0, 2.0), 10, None));

        let mut updated = feature("l1", "o1", latlon!(1.5, 2.5), 3842, None);
        updated.properties.severity = Some(Severity::Low);
        selection.refresh(updated.clone());

        assert_eq!(selection.selected(), Some(&updated));
        assert_eq!(selection.detail().unwrap().cases, "3.8K");
        assert_eq!(selection.camera_target(), Some(latlon!(1.0, 2.0)));
    }

    #[test]
    fn select_outbreak_picks_first_feature() {
        let collection = FeatureCollection::new(vec![
            feature("l1", "o1", latlon!(1.0, 1.0), 10, None),
            feature("l2", "o2", latlon!(2.0, 2.0), 10, None),
            feature("l3", "o2", latlon!(3.0, 3.0), 10, None),
        ]);
        let mut selection = Selection::default();

        assert_eq!(
            selection.select_outbreak("o2", &collection),
            Some(latlon!(2.0, 2.0))
        );
        assert_eq!(
            selection.selected().map(|f| f.properties.id.as_str()),
            Some("l2")
        );
    }

    #[test]
    fn select_outbreak_miss_is_noop() {
        let collection =
            FeatureCollection::new(vec![feature("l1", "o1", latlon!(1.0, 1.0), 10, None)]);
        let mut selection = Selection::default();
        selection.select(feature("l9", "o9", latlon!(9.0, 9.0), 10, None));
        let before = selection.clone();

        assert_eq!(selection.select_outbreak("X", &collection), None);
        assert_eq!(selection, before);
    }

    #[test]
    fn detail_contents() {
        let mut f = feature(
            "l1",
            "o1",
            latlon!(-8.83834, 25.01361),
            2_100_000,
            Some(Severity::Critical),
        );
        f.properties.region = Some("Multiple Provinces".to_string());
        f.properties.severity_score = 0.76;
        f.properties.summary = Some("Endemic malaria".to_string());

        let detail = OutbreakDetail::new(&f);
        assert_eq!(detail.severity, "critical");
        assert!(detail.pulsing);
        assert_eq!(detail.location, "Multiple Provinces, Country l1");
        assert_eq!(detail.cases, "2.1M");
        assert_eq!(detail.severity_score, "76%");
        assert_eq!(detail.status, "Active");
        assert_eq!(detail.coordinates, "-8.8383, 25.0136");
    }

    #[test]
    fn detail_of_unknown_severity() {
        let detail = OutbreakDetail::new(&feature("l1", "o1", latlon!(0.0, 0.0), 5, None));
        assert_eq!(detail.severity, "moderate");
        assert!(!detail.pulsing);
        assert_eq!(detail.location, "Country l1");
    }

    #[test]
    fn count_formatting() {
        assert_eq!(format_count(845), "845");
        assert_eq!(format_count(3842), "3.8K");
        assert_eq!(format_count(48251), "48.3K");
        assert_eq!(format_count(2_100_000), "2.1M");
    }
}
