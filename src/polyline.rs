//! Encoded polyline decoding.
//!
//! Decodes the compact ASCII polyline format (signed delta + zig-zag +
//! base-64-like varint, 1e-5 precision) into a sequence of [`GeoPoint`]s.
//! This is the only geometry the dashboard core owns; map rendering is an
//! external collaborator that consumes the decoded points.
//!
//! ## Example
//! ```rust
//! use activity_stats::decode_polyline;
//!
//! let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
//! assert_eq!(points.len(), 3);
//! assert!((points[0].latitude - 38.5).abs() < 1e-5);
//! ```

use crate::error::{Error, Result};
use crate::GeoPoint;

/// Precision factor: encoded integers are coordinates scaled by 1e5.
const PRECISION: f64 = 1e-5;

/// Every encoded character carries 5 payload bits offset by 63 (`?`).
const CHAR_OFFSET: u8 = b'?';

/// Continuation bit: set on every chunk except the last of a varint.
const CONTINUATION_BIT: u64 = 0x20;

/// Decode an encoded polyline string into geographic points.
///
/// An empty string is the recoverable "no geometry" condition and yields
/// an empty vector. Points are emitted in strict decode order, one per
/// latitude/longitude delta pair.
///
/// Malformed input fails hard with [`Error::MalformedPolyline`]: a string
/// that ends mid-pair, a character outside `?`..`~`, or a varint that
/// overflows. No partial output is returned and no non-finite coordinate
/// is ever produced.
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut cursor = 0usize;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while cursor < bytes.len() {
        lat += decode_delta(bytes, &mut cursor)?;
        lng += decode_delta(bytes, &mut cursor)?;
        points.push(GeoPoint::new(lat as f64 * PRECISION, lng as f64 * PRECISION));
    }

    Ok(points)
}

/// Decode one zig-zag varint delta, advancing the cursor past it.
fn decode_delta(bytes: &[u8], cursor: &mut usize) -> Result<i64> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *cursor;
        let &byte = bytes
            .get(position)
            .ok_or(Error::MalformedPolyline { position })?;
        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(Error::MalformedPolyline { position });
        }
        // Standard encoders never need more than 7 chunks for a
        // coordinate; past 64 bits the value is garbage.
        if shift >= 64 {
            return Err(Error::MalformedPolyline { position });
        }
        let chunk = (byte - CHAR_OFFSET) as u64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *cursor += 1;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    // Zig-zag: odd values are complements of negatives.
    if result & 1 == 1 {
        Ok(!(result >> 1) as i64)
    } else {
        Ok((result >> 1) as i64)
    }
}
