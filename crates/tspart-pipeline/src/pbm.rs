//! Monochrome PBM bitmap decoding.
//!
//! Two sub-encodings share a header: `P4` (packed, one bit per pixel,
//! rows padded to whole bytes) and `P1` (ASCII `0`/`1` characters).
//! Both store the top row of the image first, so cities come out with
//! non-increasing `y` and, within a row, increasing `x`. Row 0 is the
//! bottom of the bitmap.

use std::io::{BufRead, ErrorKind};

use crate::types::{City, CityMap, DecodeError, Dimensions};

/// Read the dimensions line: the first non-comment line after the
/// magic tag, containing `<width> <height>`.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedHeader`] when the line is missing,
/// does not hold exactly two integers, or either value is zero.
pub(crate) fn read_dimensions<R: BufRead>(reader: &mut R) -> Result<Dimensions, DecodeError> {
    loop {
        let mut raw = Vec::new();
        let n = reader.read_until(b'\n', &mut raw)?;
        if n == 0 {
            return Err(DecodeError::MalformedHeader {
                reason: "missing dimensions line".to_string(),
            });
        }
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let width = parse_dimension(fields.next(), line)?;
        let height = parse_dimension(fields.next(), line)?;
        if fields.next().is_some() {
            return Err(DecodeError::MalformedHeader {
                reason: format!("expected \"<width> <height>\", found {line:?}"),
            });
        }
        if width == 0 || height == 0 {
            return Err(DecodeError::MalformedHeader {
                reason: format!("dimensions must be positive, found {width}x{height}"),
            });
        }
        return Ok(Dimensions { width, height });
    }
}

fn parse_dimension(field: Option<&str>, line: &str) -> Result<u32, DecodeError> {
    field
        .and_then(|f| f.parse::<u32>().ok())
        .ok_or_else(|| DecodeError::MalformedHeader {
            reason: format!("expected \"<width> <height>\", found {line:?}"),
        })
}

/// Decode a packed (`P4`) pixel section.
///
/// Rows arrive top-of-image first (y = height−1 down to 0), each
/// padded to `ceil(width / 8)` bytes, most significant bit = leftmost
/// pixel. Every set bit becomes a city.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedData`] when a row's bytes cannot be
/// fully read.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn decode_packed<R: BufRead>(
    reader: &mut R,
    dimensions: Dimensions,
) -> Result<CityMap, DecodeError> {
    let row_bytes = dimensions.width.div_ceil(8) as usize;
    let mut row_buf = vec![0_u8; row_bytes];
    let mut map = CityMap::new(dimensions);

    for y in (0..dimensions.height).rev() {
        reader.read_exact(&mut row_buf).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                DecodeError::TruncatedData {
                    row: i64::from(y),
                    reason: format!("expected {row_bytes} row bytes"),
                }
            } else {
                DecodeError::Io(err)
            }
        })?;

        // Bit cursor: byte index plus MSB-first mask, advanced one
        // pixel at a time.
        let mut byte_index = 0_usize;
        let mut mask = 0x80_u8;
        for x in 0..dimensions.width {
            if row_buf[byte_index] & mask != 0 {
                map.push(City::new(x, y));
            }
            mask >>= 1;
            if mask == 0 && x + 1 < dimensions.width {
                byte_index += 1;
                mask = 0x80;
            }
        }
    }
    Ok(map)
}

/// Decode a text (`P1`) pixel section.
///
/// The pixel data is one continuous character stream wrapped at
/// `width` characters per row, top row first; line breaks carry no
/// meaning. Blank lines and `#` comment lines are skipped whole.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidContent`] for any character other
/// than `0`/`1`, or when data continues past the final row, and
/// [`DecodeError::TruncatedData`] when the stream ends before exactly
/// `width * height` pixels were consumed.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn decode_text<R: BufRead>(
    reader: &mut R,
    dimensions: Dimensions,
) -> Result<CityMap, DecodeError> {
    let mut map = CityMap::new(dimensions);
    let mut x: u32 = 0;
    let mut row: i64 = i64::from(dimensions.height) - 1;

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for ch in line.chars() {
            if row < 0 {
                return Err(DecodeError::InvalidContent {
                    line: line_index + 1,
                    reason: format!(
                        "pixel data continues past {}x{} pixels",
                        dimensions.width, dimensions.height,
                    ),
                });
            }
            match ch {
                '1' => map.push(City::new(x, row as u32)),
                '0' => {}
                other => {
                    return Err(DecodeError::InvalidContent {
                        line: line_index + 1,
                        reason: format!("unexpected character {other:?} in pixel data"),
                    });
                }
            }
            x += 1;
            if x >= dimensions.width {
                x = 0;
                row -= 1;
            }
        }
    }

    // The cursor must land exactly one row below the bottom, at the
    // start of a row.
    if x == 0 && row == -1 {
        Ok(map)
    } else {
        Err(DecodeError::TruncatedData {
            row,
            reason: format!(
                "pixel data ended at column {x}; expected {}x{} pixels",
                dimensions.width, dimensions.height,
            ),
        })
    }
}
