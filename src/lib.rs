//! # Activity Stats
//!
//! Analytics and geometry core for a sport-activity dashboard.
//!
//! This library provides:
//! - Polyline decoding for map geometry (signed delta + zig-zag varint)
//! - Activity aggregation: running totals, best day, best week
//! - Per-athlete ranking with a cyclic multi-key sort state machine
//! - Display helpers (French date formatting, athlete color palette)
//!
//! Everything is synchronous and side-effect free: the surrounding UI
//! layer loads and filters the records, calls into this core with plain
//! data, and receives plain data back. The only mutable state in the
//! crate is the sort-direction machine in [`ranking::RankingSort`].
//!
//! ## Quick Start
//! ```rust
//! use activity_stats::{summarize, ActivityRecord};
//!
//! let records = vec![ActivityRecord {
//!     athlete_id: "7".to_string(),
//!     date: Some("2025-03-15".to_string()),
//!     elevation_gain_m: 1200.0,
//!     distance_m: 18000.0,
//!     moving_time_s: 7200.0,
//!     ..Default::default()
//! }];
//!
//! let totals = summarize(&records);
//! assert_eq!(totals.total_elevation, 1200.0);
//! assert_eq!(totals.total_distance_km, 18.0);
//! ```

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

// Unified error handling
pub mod error;
pub use error::{Error, Result};

// Polyline decoding (map geometry)
pub mod polyline;
pub use polyline::decode_polyline;

// Totals, best day, best week
pub mod stats;
pub use stats::{find_best_day, find_best_week, summarize, BestDay, BestWeek, Totals};

// Athlete ranking and cyclic sort state
pub mod ranking;
pub use ranking::{build_ranking, AthleteStat, RankingSort, SortKey, SortOrder};

// Display-oriented helpers (date/elevation formatting, colors)
pub mod display;
pub use display::{format_date_fr, format_elevation, map_sport_name, sport_color, AthleteColors};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use activity_stats::GeoPoint;
/// let point = GeoPoint::new(45.89623, 6.71683); // Chamonix
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Map geometry attached to an activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceMap {
    /// Encoded polyline, decodable with [`decode_polyline`].
    #[serde(default)]
    pub polyline: Option<String>,
}

/// One activity as supplied by the external record source.
///
/// The JSON contract is owned by the surrounding system; this type accepts
/// it as-is. Numeric measures default to 0 when absent, and `athlete_id`
/// accepts both string and numeric JSON representations (the exported data
/// ships numeric ids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(deserialize_with = "flexible_id", default)]
    pub athlete_id: String,
    #[serde(deserialize_with = "flexible_opt_id", default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sport: String,
    /// ISO-8601 date, optionally with a time component. Records without a
    /// date are skipped by day/week bucketing.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub elevation_gain_m: f64,
    #[serde(default)]
    pub distance_m: f64,
    #[serde(default)]
    pub moving_time_s: f64,
    #[serde(default)]
    pub tracemap: Option<TraceMap>,
}

impl ActivityRecord {
    /// The encoded polyline for this activity, when present and non-blank.
    pub fn encoded_trace(&self) -> Option<&str> {
        self.tracemap
            .as_ref()
            .and_then(|t| t.polyline.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Parse a collection of activity records from the external JSON contract.
///
/// The input must be a JSON array of record objects; anything else is a
/// contract violation reported as [`Error::InvalidRecords`].
pub fn records_from_json(json: &str) -> Result<Vec<ActivityRecord>> {
    let records: Vec<ActivityRecord> =
        serde_json::from_str(json).map_err(|e| Error::InvalidRecords {
            message: e.to_string(),
        })?;
    debug!("[ActivityStats] Parsed {} activity records", records.len());
    Ok(records)
}

/// Accept a JSON string or number as a string id.
fn flexible_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Num(u64),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Num(n) => n.to_string(),
    })
}

fn flexible_opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Num(u64),
    }

    let id: Option<IdRepr> = Option::deserialize(deserializer)?;
    Ok(id.map(|id| match id {
        IdRepr::Text(s) => s,
        IdRepr::Num(n) => n.to_string(),
    }))
}
