//! Display-oriented helpers for the dashboard UI.
//!
//! Pure formatting and lookup functions: French long-form dates, compact
//! elevation labels, sport-name simplification, and a caller-owned
//! athlete color table. Nothing here touches the DOM or any renderer;
//! the UI layer consumes the returned strings and colors as-is.

use chrono::{Datelike, NaiveDate};

/// French month names, indexed by `month0`.
const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Fixed athlete palette, assigned in first-seen order.
const ATHLETE_PALETTE: [&str; 13] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#F8B88B", "#52B788", "#F06292", "#AED581", "#FFD54F",
];

/// Fallback color for sports without a category color.
const DEFAULT_SPORT_COLOR: &str = "#888888";

/// Format a date in French long form: `1er janvier 2025`, `15 mars 2025`.
///
/// The day-of-month 1 takes the ordinal `1er`; every other day is a plain
/// numeral.
pub fn format_date_fr(date: NaiveDate) -> String {
    let day = date.day();
    let month = MONTHS_FR[date.month0() as usize];
    if day == 1 {
        format!("1er {} {}", month, date.year())
    } else {
        format!("{} {} {}", day, month, date.year())
    }
}

/// Compact elevation label: values from 10 000 m render as `10.0k`.
pub fn format_elevation(value: f64) -> String {
    if value >= 10_000.0 {
        format!("{:.1}k", value / 1000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// Map a raw sport label onto its simplified dashboard category.
///
/// Unknown sports pass through unchanged.
pub fn map_sport_name(sport: &str) -> &str {
    match sport {
        "Run" | "TrailRun" => "Run",
        "Ride" | "MountainBike" => "Bike",
        "Hike" | "Walk" => "Hike",
        "BackcountrySki" | "Alpinism" => "Ski mountaineering",
        other => other,
    }
}

/// Color for a simplified sport category.
pub fn sport_color(sport: &str) -> &'static str {
    match map_sport_name(sport) {
        "Run" => "#B7705C",
        "Bike" => "#F4C430",
        "Hike" => "#52B788",
        "Ski mountaineering" => "#45B7D1",
        _ => DEFAULT_SPORT_COLOR,
    }
}

/// Caller-owned athlete→color table.
///
/// Colors come from a fixed palette and are assigned in first-seen order,
/// wrapping when the palette is exhausted. The table is an explicit value
/// owned by the rendering session, not process-wide state; two sessions
/// seeing athletes in the same order assign the same colors.
#[derive(Debug, Clone, Default)]
pub struct AthleteColors {
    assigned: Vec<(String, &'static str)>,
}

impl AthleteColors {
    /// Create an empty color table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for an athlete, assigning the next palette entry on first use.
    pub fn color_for(&mut self, athlete_id: &str) -> &'static str {
        if let Some((_, color)) = self.assigned.iter().find(|(id, _)| id == athlete_id) {
            return color;
        }
        let color = ATHLETE_PALETTE[self.assigned.len() % ATHLETE_PALETTE.len()];
        self.assigned.push((athlete_id.to_string(), color));
        color
    }

    /// Number of athletes with an assigned color.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
