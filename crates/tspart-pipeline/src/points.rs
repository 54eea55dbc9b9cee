//! Point coordinate file decoding.
//!
//! Records are floating point `x y` or `x y radius` lines (the radius
//! is always discarded; typically output from a weighted Voronoi
//! stippler). The whole cloud is rescaled into a fixed square box so
//! the downstream coordinates are small integers, which keeps the
//! rendered SVG compact.
//!
//! One `min`/`max` pair is tracked across both axes together, so the
//! scaling preserves the cloud's aspect ratio relative to its combined
//! extent. This deliberately differs from the bitmap decoder's
//! independent width/height.

use std::io::BufRead;

use crate::types::{City, CityMap, DecodeError, Dimensions};

/// Default normalization box side length.
pub const DEFAULT_BOX_SIZE: f64 = 800.0;

/// Decode a point coordinate section into a city map normalized to
/// `[0, box_size]` on both axes.
///
/// The header line is expected to have been consumed already by the
/// format dispatcher. Comment lines (leading `#`) are ignored; every
/// other line must hold exactly 2 or 3 whitespace-separated numbers.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidContent`] for a bad field count or an
/// unparsable number, and [`DecodeError::EmptyInput`] when no records
/// were read.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn decode_points<R: BufRead>(
    reader: &mut R,
    box_size: f64,
) -> Result<CityMap, DecodeError> {
    // First pass: collect raw pairs and the combined extrema.
    let mut raw: Vec<(f64, f64)> = Vec::new();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 && fields.len() != 3 {
            return Err(DecodeError::InvalidContent {
                line: line_index + 1,
                reason: format!("expected 2 or 3 fields, found {}", fields.len()),
            });
        }
        let x = parse_coordinate(fields[0], line_index)?;
        let y = parse_coordinate(fields[1], line_index)?;

        min = min.min(x).min(y);
        max = max.max(x).max(y);
        raw.push((x, y));
    }

    if raw.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    // Second pass: translate the bounding box to the origin and scale
    // it to the target side length. All-equal inputs collapse to a
    // single point rather than dividing by zero.
    let scale = if max > min { box_size / (max - min) } else { 1.0 };

    let side = box_size.round() as u32;
    let mut map = CityMap::new(Dimensions {
        width: side,
        height: side,
    });
    for (x, y) in raw {
        map.push(City::new(
            ((x - min) * scale).round() as u32,
            ((y - min) * scale).round() as u32,
        ));
    }
    Ok(map)
}

fn parse_coordinate(field: &str, line_index: usize) -> Result<f64, DecodeError> {
    field
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidContent {
            line: line_index + 1,
            reason: format!("unparsable coordinate {field:?}"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::BufReader;

    use super::*;

    fn decode(data: &str, box_size: f64) -> Result<CityMap, DecodeError> {
        decode_points(&mut BufReader::new(data.as_bytes()), box_size)
    }

    #[test]
    fn corner_points_span_the_box() {
        let map = decode("0 0 1\n10 10 1\n", 800.0).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 0), City::new(800, 800)]);
        assert_eq!(map.dimensions().width, 800);
        assert_eq!(map.dimensions().height, 800);
    }

    #[test]
    fn radius_field_is_optional_and_ignored() {
        let with_radius = decode("0 0 5\n1 1 5\n", 100.0).unwrap();
        let without = decode("0 0\n1 1\n", 100.0).unwrap();
        assert_eq!(with_radius, without);
    }

    #[test]
    fn extrema_couple_both_axes() {
        // x spans [0, 10], y spans [0, 2]: one shared scale of
        // 100 / 10, so y never reaches the top of the box.
        let map = decode("0 0\n10 2\n", 100.0).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 0), City::new(100, 20)]);
    }

    #[test]
    fn negative_coordinates_translate_to_origin() {
        let map = decode("-5 -5\n5 5\n", 100.0).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 0), City::new(100, 100)]);
    }

    #[test]
    fn all_identical_points_do_not_divide_by_zero() {
        let map = decode("3.5 3.5\n3.5 3.5 1\n3.5 3.5\n", 800.0).unwrap();
        assert_eq!(map.len(), 3);
        for city in map.cities() {
            assert_eq!(*city, map.cities()[0]);
        }
    }

    #[test]
    fn comment_lines_ignored() {
        let map = decode("# leading comment\n0 0\n# between\n1 1\n", 100.0).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(decode("", 800.0), Err(DecodeError::EmptyInput)));
        assert!(matches!(
            decode("# only comments\n", 800.0),
            Err(DecodeError::EmptyInput),
        ));
    }

    #[test]
    fn wrong_field_count_fails() {
        let err = decode("0 0\n1\n", 800.0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidContent { line: 2, .. }));
        let err = decode("0 0 1 9\n", 800.0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidContent { line: 1, .. }));
    }

    #[test]
    fn unparsable_number_fails() {
        let err = decode("0 zero\n", 800.0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidContent { line: 1, .. }));
    }

    #[test]
    fn file_order_is_preserved() {
        // Unlike bitmap decoding, no sort guarantee: file order stands.
        let map = decode("10 10\n0 0\n5 5\n", 100.0).unwrap();
        assert_eq!(
            map.cities(),
            &[City::new(100, 100), City::new(0, 0), City::new(50, 50)],
        );
    }

    #[test]
    fn alternate_box_size() {
        let map = decode("0 0\n2 2\n", 10.0).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 0), City::new(10, 10)]);
        assert_eq!(map.dimensions().width, 10);
    }
}
