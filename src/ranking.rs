//! Per-athlete ranking with a cyclic multi-key sort state machine.
//!
//! [`build_ranking`] groups the record collection by athlete in
//! first-seen order, derives totals and ratios, and returns the table in
//! its default order (descending total elevation). [`RankingSort`] is the
//! only mutable state in the crate: a per-column three-state cycle
//! (none → ascending → descending → none) where activating one column
//! resets every other, matching the dashboard's header toggles.
//!
//! ## Example
//! ```rust
//! use activity_stats::{build_ranking, RankingSort, SortKey};
//!
//! let records = activity_stats::records_from_json(
//!     r#"[{"athlete_id": 1, "elevation_gain_m": 1000},
//!         {"athlete_id": 2, "elevation_gain_m": 500}]"#,
//! )
//! .unwrap();
//!
//! let mut table = build_ranking(&records);
//! assert_eq!(table[0].athlete_id, "1"); // default: descending elevation
//!
//! let mut sort = RankingSort::new();
//! sort.request_sort(SortKey::TotalElevation); // ascending
//! sort.apply(&mut table);
//! assert_eq!(table[0].athlete_id, "2");
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ActivityRecord;

/// Accumulated and derived statistics for one athlete.
///
/// Recomputed in full from the current record collection on every
/// [`build_ranking`] call; never persisted or updated incrementally.
/// Ratio fields are pre-rounded to 2 decimal places for display but
/// still compared as floats when sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteStat {
    pub athlete_id: String,
    /// Display name, `Athlète {id}`.
    pub name: String,
    /// Sum of elevation gain in meters.
    pub total_elevation: f64,
    pub activity_count: usize,
    /// Sum of distance in meters.
    pub total_distance: f64,
    /// Sum of moving time in seconds.
    pub total_time: f64,
    /// Distance in kilometers, rounded to 2 decimals.
    pub total_distance_km: f64,
    /// Moving time in hours, rounded to 2 decimals.
    pub total_time_h: f64,
    /// Elevation per kilometer; 0 when the athlete has no distance.
    pub elevation_per_distance: f64,
    /// Elevation per hour; 0 when the athlete has no moving time.
    pub elevation_per_time: f64,
    /// Elevation per activity.
    pub elevation_per_activity: f64,
}

/// Sortable ranking-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    AthleteId,
    TotalElevation,
    ActivityCount,
    TotalDistanceKm,
    TotalTimeH,
    ElevationPerDistance,
    ElevationPerTime,
    ElevationPerActivity,
}

/// Sort direction of a column: one step of the none/asc/desc cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    None,
    Ascending,
    Descending,
}

/// Cyclic sort state for the ranking table.
///
/// At most one column is ever active. Requesting a sort on the active
/// column advances its cycle (ascending → descending → none); requesting
/// any other column resets the previous one and starts that column at
/// ascending. With no active column the table falls back to its default
/// order, re-derived rather than left as last displayed.
///
/// Scoped to one rendering session; create a fresh instance per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingSort {
    active: Option<(SortKey, SortOrder)>,
}

/// Build the ranking table in its default order (descending elevation).
///
/// Athletes are grouped in first-seen order before sorting; ratio
/// derivation never divides by zero (missing distance or time yields 0).
pub fn build_ranking(records: &[ActivityRecord]) -> Vec<AthleteStat> {
    struct Accumulator {
        athlete_id: String,
        total_elevation: f64,
        activity_count: usize,
        total_distance: f64,
        total_time: f64,
    }

    let mut groups: Vec<Accumulator> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|g| g.athlete_id == record.athlete_id)
        {
            Some(group) => {
                group.total_elevation += record.elevation_gain_m;
                group.activity_count += 1;
                group.total_distance += record.distance_m;
                group.total_time += record.moving_time_s;
            }
            None => groups.push(Accumulator {
                athlete_id: record.athlete_id.clone(),
                total_elevation: record.elevation_gain_m,
                activity_count: 1,
                total_distance: record.distance_m,
                total_time: record.moving_time_s,
            }),
        }
    }

    let mut stats: Vec<AthleteStat> = groups
        .into_iter()
        .map(|g| {
            let distance_km = g.total_distance / 1000.0;
            let time_h = g.total_time / 3600.0;
            AthleteStat {
                name: format!("Athlète {}", g.athlete_id),
                athlete_id: g.athlete_id,
                total_elevation: g.total_elevation,
                activity_count: g.activity_count,
                total_distance: g.total_distance,
                total_time: g.total_time,
                total_distance_km: round2(distance_km),
                total_time_h: round2(time_h),
                elevation_per_distance: if distance_km > 0.0 {
                    round2(g.total_elevation / distance_km)
                } else {
                    0.0
                },
                elevation_per_time: if time_h > 0.0 {
                    round2(g.total_elevation / time_h)
                } else {
                    0.0
                },
                elevation_per_activity: round2(g.total_elevation / g.activity_count as f64),
            }
        })
        .collect();

    sort_default(&mut stats);
    stats
}

impl RankingSort {
    /// Create the state machine with no active column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a "sort requested" signal for a column.
    ///
    /// Advances the column one step in its cycle, resets every other
    /// column, and returns the column's new order.
    pub fn request_sort(&mut self, key: SortKey) -> SortOrder {
        let next = match self.active {
            Some((active_key, order)) if active_key == key => match order {
                SortOrder::Ascending => SortOrder::Descending,
                SortOrder::Descending => SortOrder::None,
                SortOrder::None => SortOrder::Ascending,
            },
            // A different column was active (or none was): start fresh.
            _ => SortOrder::Ascending,
        };

        self.active = match next {
            SortOrder::None => None,
            order => Some((key, order)),
        };
        next
    }

    /// Current order of a column.
    pub fn order_for(&self, key: SortKey) -> SortOrder {
        match self.active {
            Some((active_key, order)) if active_key == key => order,
            _ => SortOrder::None,
        }
    }

    /// The active column, if any.
    pub fn active_key(&self) -> Option<SortKey> {
        self.active.map(|(key, _)| key)
    }

    /// Re-sort the table according to the current state.
    ///
    /// With no active column the default order is re-derived. Tie order
    /// under an active column is unspecified (the sort is stable relative
    /// to the current order, but callers must not rely on it).
    pub fn apply(&self, stats: &mut [AthleteStat]) {
        match self.active {
            None => sort_default(stats),
            Some((key, order)) => {
                stats.sort_by(|a, b| {
                    let ordering = compare_by_key(a, b, key);
                    match order {
                        SortOrder::Descending => ordering.reverse(),
                        _ => ordering,
                    }
                });
            }
        }
    }
}

/// Default table order: descending total elevation.
fn sort_default(stats: &mut [AthleteStat]) {
    stats.sort_by(|a, b| b.total_elevation.total_cmp(&a.total_elevation));
}

/// Ascending comparison for one column. Ratio columns compare as floats
/// despite their fixed-2-decimal display; `athlete_id` compares lexically.
fn compare_by_key(a: &AthleteStat, b: &AthleteStat, key: SortKey) -> Ordering {
    match key {
        SortKey::AthleteId => a.athlete_id.cmp(&b.athlete_id),
        SortKey::TotalElevation => a.total_elevation.total_cmp(&b.total_elevation),
        SortKey::ActivityCount => a.activity_count.cmp(&b.activity_count),
        SortKey::TotalDistanceKm => a.total_distance_km.total_cmp(&b.total_distance_km),
        SortKey::TotalTimeH => a.total_time_h.total_cmp(&b.total_time_h),
        SortKey::ElevationPerDistance => {
            a.elevation_per_distance.total_cmp(&b.elevation_per_distance)
        }
        SortKey::ElevationPerTime => a.elevation_per_time.total_cmp(&b.elevation_per_time),
        SortKey::ElevationPerActivity => {
            a.elevation_per_activity.total_cmp(&b.elevation_per_activity)
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(athlete_id: &str, elevation: f64, distance: f64, time: f64) -> ActivityRecord {
        ActivityRecord {
            athlete_id: athlete_id.to_string(),
            elevation_gain_m: elevation,
            distance_m: distance,
            moving_time_s: time,
            ..Default::default()
        }
    }

    fn two_athletes() -> Vec<ActivityRecord> {
        vec![
            record("a", 200.0, 5000.0, 1800.0),
            record("b", 1000.0, 20000.0, 7200.0),
            record("a", 300.0, 5000.0, 1800.0),
        ]
    }

    #[test]
    fn test_default_order_descending_elevation() {
        let table = build_ranking(&two_athletes());
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].athlete_id, "b");
        assert_eq!(table[0].total_elevation, 1000.0);
        assert_eq!(table[1].total_elevation, 500.0);
    }

    #[test]
    fn test_grouping_accumulates_per_athlete() {
        let table = build_ranking(&two_athletes());
        let a = table.iter().find(|s| s.athlete_id == "a").unwrap();
        assert_eq!(a.activity_count, 2);
        assert_eq!(a.total_distance, 10000.0);
        assert_eq!(a.total_distance_km, 10.0);
        assert_eq!(a.total_time_h, 1.0);
        assert_eq!(a.name, "Athlète a");
    }

    #[test]
    fn test_ratio_derivation() {
        // 500m over 10km = 50.00 m/km
        let table = build_ranking(&[record("a", 500.0, 10000.0, 3600.0)]);
        assert_eq!(table[0].elevation_per_distance, 50.0);
        assert_eq!(table[0].elevation_per_time, 500.0);
        assert_eq!(table[0].elevation_per_activity, 500.0);
    }

    #[test]
    fn test_ratio_zero_distance_no_fault() {
        let table = build_ranking(&[record("a", 500.0, 0.0, 0.0)]);
        assert_eq!(table[0].elevation_per_distance, 0.0);
        assert_eq!(table[0].elevation_per_time, 0.0);
        assert_eq!(table[0].elevation_per_activity, 500.0);
    }

    #[test]
    fn test_empty_records_empty_table() {
        assert!(build_ranking(&[]).is_empty());
    }

    #[test]
    fn test_sort_cycle_asc_desc_none() {
        let mut table = build_ranking(&two_athletes());
        let mut sort = RankingSort::new();

        // First request: ascending by activity count (a has 2, b has 1).
        assert_eq!(sort.request_sort(SortKey::ActivityCount), SortOrder::Ascending);
        sort.apply(&mut table);
        assert_eq!(table[0].athlete_id, "b");

        // Second request: descending.
        assert_eq!(
            sort.request_sort(SortKey::ActivityCount),
            SortOrder::Descending
        );
        sort.apply(&mut table);
        assert_eq!(table[0].athlete_id, "a");

        // Third request: back to none, default order re-derived.
        assert_eq!(sort.request_sort(SortKey::ActivityCount), SortOrder::None);
        assert_eq!(sort.active_key(), None);
        sort.apply(&mut table);
        assert_eq!(table[0].athlete_id, "b");
        assert_eq!(table[0].total_elevation, 1000.0);
    }

    #[test]
    fn test_switching_column_resets_previous() {
        let mut sort = RankingSort::new();
        sort.request_sort(SortKey::TotalElevation);
        sort.request_sort(SortKey::TotalElevation);
        assert_eq!(
            sort.order_for(SortKey::TotalElevation),
            SortOrder::Descending
        );

        // A new column starts at ascending and clears the old one.
        assert_eq!(
            sort.request_sort(SortKey::TotalTimeH),
            SortOrder::Ascending
        );
        assert_eq!(sort.order_for(SortKey::TotalElevation), SortOrder::None);
        assert_eq!(sort.order_for(SortKey::TotalTimeH), SortOrder::Ascending);
    }

    #[test]
    fn test_ratio_keys_compare_as_floats() {
        // 100.0 vs 99.5: lexical comparison of the display strings would
        // put "99.50" after "100.00"; float comparison must not.
        let mut table = build_ranking(&[
            record("a", 995.0, 10000.0, 3600.0),
            record("b", 1000.0, 10000.0, 3600.0),
        ]);
        let mut sort = RankingSort::new();
        sort.request_sort(SortKey::ElevationPerDistance);
        sort.apply(&mut table);
        assert_eq!(table[0].elevation_per_distance, 99.5);
        assert_eq!(table[1].elevation_per_distance, 100.0);
    }

    #[test]
    fn test_athlete_id_sorts_lexically() {
        let mut table = build_ranking(&[
            record("10", 100.0, 0.0, 0.0),
            record("2", 200.0, 0.0, 0.0),
        ]);
        let mut sort = RankingSort::new();
        sort.request_sort(SortKey::AthleteId);
        sort.apply(&mut table);
        // Lexically "10" < "2".
        assert_eq!(table[0].athlete_id, "10");
    }
}
