//! City scoping for filter and search operations.
//!
//! City identity is compared case-insensitively at the query boundary.
//! Upstream variants represent cities inconsistently (exact-case keys,
//! uppercase, free-form strings), so normalization lives here rather
//! than relying on exact string equality.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::record::ObservationRecord;

/// The "all cities" sentinel accepted from UI input, matched
/// case-insensitively.
const ALL_SENTINEL: &str = "all";

/// A city scope for queries: either every city or one specific city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum CitySelection {
    /// No city restriction; every record is in scope.
    All,
    /// Restrict to records whose city equals this name,
    /// case-insensitively.
    City(String),
}

impl CitySelection {
    /// Parse a UI selection string.
    ///
    /// `"all"` (in any case, surrounding whitespace ignored) is the
    /// all-cities sentinel; anything else is a specific city name.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            Self::All
        } else {
            Self::City(trimmed.to_owned())
        }
    }

    /// Whether a record falls within this selection.
    ///
    /// Records without a city field never match a specific city; they
    /// are only in scope under [`CitySelection::All`].
    pub fn matches(&self, record: &ObservationRecord) -> bool {
        match self {
            Self::All => true,
            Self::City(city) => record
                .city
                .as_deref()
                .is_some_and(|record_city| eq_city(record_city, city)),
        }
    }
}

/// Case-insensitive city name comparison.
///
/// Uses full Unicode lowercasing: Swedish city names carry non-ASCII
/// letters ("Luleå", "Göteborg", "Malmö").
fn eq_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record_in(city: Option<&str>) -> ObservationRecord {
        ObservationRecord {
            lat: 65.58,
            lon: 22.15,
            people_count: 1,
            alert: false,
            timestamp: Utc::now(),
            city: city.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn all_sentinel_parses_case_insensitively() {
        assert_eq!(CitySelection::parse("all"), CitySelection::All);
        assert_eq!(CitySelection::parse("ALL"), CitySelection::All);
        assert_eq!(CitySelection::parse("  All "), CitySelection::All);
    }

    #[test]
    fn specific_city_parses_trimmed() {
        assert_eq!(
            CitySelection::parse(" Luleå "),
            CitySelection::City("Luleå".to_owned())
        );
    }

    #[test]
    fn all_matches_everything() {
        assert!(CitySelection::All.matches(&record_in(Some("Stockholm"))));
        assert!(CitySelection::All.matches(&record_in(None)));
    }

    #[test]
    fn city_match_ignores_case_including_unicode() {
        let selection = CitySelection::parse("luleå");
        assert!(selection.matches(&record_in(Some("Luleå"))));
        assert!(selection.matches(&record_in(Some("LULEÅ"))));
        assert!(!selection.matches(&record_in(Some("Stockholm"))));
    }

    #[test]
    fn cityless_record_never_matches_specific_city() {
        let selection = CitySelection::parse("Luleå");
        assert!(!selection.matches(&record_in(None)));
    }

    #[test]
    fn selection_round_trips_through_json() {
        // The city picker sends its selection as JSON; both variants
        // must survive the trip.
        let all_json = serde_json::to_string(&CitySelection::All).unwrap();
        let all: CitySelection = serde_json::from_str(&all_json).unwrap();
        assert_eq!(all, CitySelection::All);

        let city_json = serde_json::to_string(&CitySelection::City("Luleå".to_owned())).unwrap();
        let city: CitySelection = serde_json::from_str(&city_json).unwrap();
        assert_eq!(city, CitySelection::City("Luleå".to_owned()));
    }
}
