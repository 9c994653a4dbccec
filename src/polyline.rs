//! Encoded polyline codec for route geometries.
//!
//! Directions services ship route shapes as delta-coded, variable-length
//! ASCII strings. Decoding happens once at the fetch boundary; everything
//! downstream works on [`GeoPoint`] sequences.

use crate::geo::GeoPoint;

/// Decimal places carried by the Google encoding.
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: i64 = 63;

/// Decodes an encoded polyline into points ordered from route start to end.
///
/// Input is not validated. Decoding stops at the first value cut short by the
/// end of the string and returns the points completed before it.
pub fn decode(encoded: &str, precision: u32) -> Vec<GeoPoint> {
    let scale = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        let Some(lat_delta) = read_delta(bytes, &mut index) else {
            break;
        };
        let Some(lon_delta) = read_delta(bytes, &mut index) else {
            break;
        };
        lat += lat_delta;
        lon += lon_delta;
        points.push(GeoPoint::new(lat as f64 / scale, lon as f64 / scale));
    }

    points
}

/// Reads one zig-zag encoded delta starting at `index`.
fn read_delta(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let chunk = i64::from(*bytes.get(*index)?) - ASCII_OFFSET;
        *index += 1;
        result |= (chunk & CHUNK_MASK).checked_shl(shift)?;
        shift += CHUNK_BITS;
        if chunk < CONTINUATION {
            break;
        }
    }

    if result & 1 == 1 {
        Some(!(result >> 1))
    } else {
        Some(result >> 1)
    }
}

/// Encodes points into the polyline format.
pub fn encode(points: &[GeoPoint], precision: u32) -> String {
    let scale = 10f64.powi(precision as i32);
    let mut encoded = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for point in points {
        let lat = (point.latitude * scale).round() as i64;
        let lon = (point.longitude * scale).round() as i64;
        write_delta(lat - prev_lat, &mut encoded);
        write_delta(lon - prev_lon, &mut encoded);
        prev_lat = lat;
        prev_lon = lon;
    }

    encoded
}

fn write_delta(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION {
        out.push(char::from(((CONTINUATION | (value & CHUNK_MASK)) + ASCII_OFFSET) as u8));
        value >>= CHUNK_BITS;
    }
    out.push(char::from((value + ASCII_OFFSET) as u8));
}
