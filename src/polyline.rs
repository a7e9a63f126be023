//! Encoded polyline codec for route geometries.
//!
//! The routing engine ships each leg's shape as a Google-style encoded
//! polyline: per coordinate, a zig-zag encoded delta from the previous value,
//! split into 5-bit chunks offset by 63 with `0x20` as continuation bit.
//! Decoding happens once at the boundary; the rest of the gateway only sees
//! `Polyline` points.

use crate::error::PolylineError;
use crate::traits::Point;

/// Precision (decimal digits) of the routing engine's leg shapes.
pub const ROUTE_SHAPE_PRECISION: u32 = 6;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Decodes `encoded` at `precision` decimal digits.
    ///
    /// An input that ends inside a value is rejected, never truncated.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = 10f64.powi(precision as i32);
        let bytes = encoded.as_bytes();

        let mut idx = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while idx < bytes.len() {
            lat = accumulate(lat, bytes, &mut idx)?;
            lng = accumulate(lng, bytes, &mut idx)?;
            points.push(Point::new(lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the points at `precision` decimal digits.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::new();
        let mut prev_lat: i64 = 0;
        let mut prev_lng: i64 = 0;

        for point in &self.points {
            let lat = (point.latitude * factor).round() as i64;
            let lng = (point.longitude * factor).round() as i64;
            write_delta(&mut out, lat - prev_lat);
            write_delta(&mut out, lng - prev_lng);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

fn accumulate(total: i64, bytes: &[u8], idx: &mut usize) -> Result<i64, PolylineError> {
    let start = *idx;
    let delta = read_delta(bytes, idx)?;
    total
        .checked_add(delta)
        .ok_or(PolylineError::Overflow { offset: start })
}

fn read_delta(bytes: &[u8], idx: &mut usize) -> Result<i64, PolylineError> {
    let start = *idx;
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*idx) else {
            return Err(PolylineError::Truncated { offset: *idx });
        };
        if !(CHUNK_OFFSET..=CHUNK_OFFSET + 0x3f).contains(&byte) {
            return Err(PolylineError::InvalidCharacter { offset: *idx, byte });
        }
        if shift >= u64::BITS {
            return Err(PolylineError::Overflow { offset: start });
        }
        let chunk = u64::from(byte - CHUNK_OFFSET);
        // At shift 60 only four payload bits still fit in 64.
        if shift == u64::BITS - 4 && chunk & CHUNK_MASK > 0xf {
            return Err(PolylineError::Overflow { offset: start });
        }
        *idx += 1;

        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        if chunk < CONTINUATION {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Ok(if result & 1 != 0 { !value } else { value })
}

fn write_delta(out: &mut String, delta: i64) {
    let mut value = ((delta << 1) ^ (delta >> 63)) as u64;
    while value >= CONTINUATION {
        out.push(char::from((CONTINUATION | (value & CHUNK_MASK)) as u8 + CHUNK_OFFSET));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHUNK_OFFSET));
}
