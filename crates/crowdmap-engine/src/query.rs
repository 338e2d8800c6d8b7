//! Pure query operations over a snapshot.
//!
//! Every function here is stateless and deterministic: it takes a
//! snapshot (or an already-scoped record sequence) plus parameters and
//! returns a derived view. Results are recomputed on every call -- with
//! tens to low hundreds of places per snapshot there is nothing to
//! index.
//!
//! "No match" is always an empty result, never an error.

use crowdmap_types::{CitySelection, HeatPoint, ObservationRecord, Snapshot};

/// Find the first place whose name contains the search term,
/// case-insensitively, in snapshot iteration order.
///
/// An empty or whitespace-only term matches nothing: a cleared search
/// box means "no search", not "match everything".
pub fn search<'a>(
    snapshot: &'a Snapshot,
    term: &str,
) -> Option<(&'a str, &'a ObservationRecord)> {
    search_in_city(snapshot, term, &CitySelection::All)
}

/// Like [`search`], but restricted to a city selection.
///
/// The name predicate and the city predicate apply conjunctively: a
/// result must both match the term and fall within the selection.
pub fn search_in_city<'a>(
    snapshot: &'a Snapshot,
    term: &str,
    selection: &CitySelection,
) -> Option<(&'a str, &'a ObservationRecord)> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    snapshot
        .iter()
        .find(|&(name, record)| name.to_lowercase().contains(&needle) && selection.matches(record))
}

/// All places within a city selection, in snapshot iteration order.
///
/// [`CitySelection::All`] returns every record. Records without a city
/// field are excluded from any specific-city filter.
pub fn filter_by_city<'a>(
    snapshot: &'a Snapshot,
    selection: &CitySelection,
) -> Vec<(&'a str, &'a ObservationRecord)> {
    snapshot
        .iter()
        .filter(|&(_, record)| selection.matches(record))
        .collect()
}

/// The record with the maximum `people_count` among the given records.
///
/// Ties are broken by first-encountered in input order; the comparison
/// is strictly-greater, so a later record with an equal count never
/// displaces an earlier one. This is an explicit stability policy, not
/// incidental ordering. Empty input yields `None` -- never a synthetic
/// zero-count placeholder.
pub fn most_crowded<'a, I>(records: I) -> Option<(&'a str, &'a ObservationRecord)>
where
    I: IntoIterator<Item = (&'a str, &'a ObservationRecord)>,
{
    let mut best: Option<(&str, &ObservationRecord)> = None;
    for (name, record) in records {
        let is_better = best
            .map_or(true, |(_, current)| record.people_count > current.people_count);
        if is_better {
            best = Some((name, record));
        }
    }
    best
}

/// Project every record in the snapshot to a heatmap point.
///
/// Exactly one point per record, weight equal to the record's
/// `people_count`. Zero-count places still project as zero-weight
/// points; dropping them is a rendering decision, not a query
/// decision.
pub fn heatmap_points(snapshot: &Snapshot) -> Vec<HeatPoint> {
    snapshot.iter().map(|(_, record)| record.heat_point()).collect()
}

/// All places whose server-side alert flag is set, in snapshot
/// iteration order.
pub fn active_alerts(snapshot: &Snapshot) -> Vec<(&str, &ObservationRecord)> {
    snapshot.iter().filter(|&(_, record)| record.alert).collect()
}
