//! Decoder for the compact polyline geometry encoding.
//!
//! Each value is a signed delta from the previous vertex, zig-zag encoded and
//! split into 5-bit chunks. Every chunk is offset by 63 to land in printable
//! ASCII, with `0x20` marking that another chunk follows. Latitude and
//! longitude use five decimal places, elevation two.

use thiserror::Error;

use crate::route::Position;

const CHAR_OFFSET: u8 = 63;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const MAX_SHIFT: u32 = 60;
const DEGREE_SCALE: f64 = 1e-5;
const ELEVATION_DIVISOR: f64 = 100.0;

/// Errors raised while decoding a compact polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The string ended in the middle of a vertex.
    #[error("polyline ended unexpectedly at offset {offset}")]
    Truncated {
        /// Byte offset that was expected to hold more data.
        offset: usize,
    },
    /// A byte outside the encoding alphabet was found.
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidCharacter {
        /// Offending byte.
        byte: u8,
        /// Byte offset of the offending byte.
        offset: usize,
    },
    /// A value used more continuation chunks than fit in 64 bits, or pushed a
    /// running coordinate total past the `i64` range.
    #[error("polyline value starting before offset {offset} overflows")]
    Overflow {
        /// Byte offset where the overflow was detected.
        offset: usize,
    },
}

/// Decode `encoded` into positions, in `[lng, lat(, elevation)]` order.
///
/// Set `with_elevation` when the geometry was requested in three dimensions;
/// every vertex then carries a third delta.
///
/// # Errors
///
/// Returns [`PolylineError`] when the input is truncated, contains bytes
/// outside the encoding alphabet, or encodes a value wider than 64 bits.
///
/// # Examples
/// ```
/// use waymark_core::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U", false)?;
/// assert!((points[0].lng + 120.2).abs() < 1e-9);
/// assert!((points[0].lat - 38.5).abs() < 1e-9);
/// # Ok::<(), waymark_core::PolylineError>(())
/// ```
pub fn decode_polyline(encoded: &str, with_elevation: bool) -> Result<Vec<Position>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat = 0_i64;
    let mut lng = 0_i64;
    let mut ele = 0_i64;
    let mut positions = Vec::new();

    while cursor < bytes.len() {
        lat = accumulate(lat, bytes, &mut cursor)?;
        lng = accumulate(lng, bytes, &mut cursor)?;
        let elevation = if with_elevation {
            ele = accumulate(ele, bytes, &mut cursor)?;
            Some(ele as f64 / ELEVATION_DIVISOR)
        } else {
            None
        };
        positions.push(Position {
            lng: lng as f64 * DEGREE_SCALE,
            lat: lat as f64 * DEGREE_SCALE,
            elevation,
        });
    }

    Ok(positions)
}

/// Add the next delta to a running total, failing when the total leaves `i64`.
fn accumulate(total: i64, bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let offset = *cursor;
    let delta = next_value(bytes, cursor)?;
    total
        .checked_add(delta)
        .ok_or(PolylineError::Overflow { offset })
}

/// Read one zig-zag encoded value starting at `cursor`.
fn next_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0_i64;
    let mut shift = 0_u32;
    loop {
        let offset = *cursor;
        let byte = *bytes
            .get(offset)
            .ok_or(PolylineError::Truncated { offset })?;
        let chunk = chunk_value(byte, offset)?;
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { offset });
        }
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        *cursor = offset + 1;
        if chunk < CONTINUATION {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn chunk_value(byte: u8, offset: usize) -> Result<i64, PolylineError> {
    byte.checked_sub(CHAR_OFFSET)
        .filter(|chunk| *chunk < 64)
        .map(i64::from)
        .ok_or(PolylineError::InvalidCharacter { byte, offset })
}
