//! Shared types for the tspart decoding stages.

use serde::{Deserialize, Serialize};

/// A single "city": the integer coordinate of one lit bitmap pixel or
/// one normalized input point.
///
/// A city's index is implicit: it is the city's position in the
/// [`CityMap`] that produced it, and that index is the only handle by
/// which later stages (the TSPLIB writer, the tour renderer) refer to
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Horizontal position, `0 <= x < width`.
    pub x: u32,
    /// Vertical position, `0 <= y < height`. Row 0 is the **bottom**
    /// of the bitmap; the renderer flips into SVG's top-down space.
    pub y: u32,
}

impl City {
    /// Create a new city.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Source bitmap dimensions in pixels.
///
/// For point-file input both sides equal the normalization box size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The ordered, append-only collection of decoded cities plus the
/// bounding dimensions of their source.
///
/// Cities are appended during decoding only; once a decode succeeds
/// the map is read-only to downstream consumers. Bitmap-sourced maps
/// list cities in scan order: non-increasing `y`, and increasing `x`
/// within a row. Point-file maps keep file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityMap {
    cities: Vec<City>,
    dimensions: Dimensions,
}

impl CityMap {
    pub(crate) const fn new(dimensions: Dimensions) -> Self {
        Self {
            cities: Vec::new(),
            dimensions,
        }
    }

    pub(crate) fn push(&mut self, city: City) {
        self.cities.push(city);
    }

    /// All cities in decode order.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// The city at `index`, or `None` when the index is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<City> {
        self.cities.get(index).copied()
    }

    /// Number of cities.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` when no cities were decoded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Bounding dimensions of the source.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

/// A visiting order over city indices, as proposed by an external
/// solver.
///
/// No validity invariant holds at construction; the tour originates
/// from an unverified process, so the renderer checks every index
/// against the [`CityMap`] it draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Create a tour from raw city indices.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The city indices in visiting order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of tour entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a tour with no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for Tour {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

/// Errors that can occur while decoding an input file into a
/// [`CityMap`].
///
/// A failed decode exposes no partial city map: callers either get the
/// whole map or one of these.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input matched none of the recognized container signatures.
    #[error(
        "unrecognized input format (first line {found:?}); \
         expected a P1/P4 bitmap or a point coordinate file"
    )]
    UnsupportedFormat {
        /// The first line of the input, as read.
        found: String,
    },

    /// The format tag was recognized but the dimensions line was
    /// missing or unusable.
    #[error("malformed bitmap header: {reason}")]
    MalformedHeader {
        /// What was wrong with the header.
        reason: String,
    },

    /// The input ended before the expected pixel count was satisfied.
    #[error("input ended early at row {row}: {reason}")]
    TruncatedData {
        /// Bitmap row being scanned when the data ran out.
        row: i64,
        /// Expected-versus-found detail.
        reason: String,
    },

    /// A text-format line contained an unexpected character or field
    /// count.
    #[error("invalid content on line {line}: {reason}")]
    InvalidContent {
        /// 1-based line number within the data section.
        line: usize,
        /// What was found there.
        reason: String,
    },

    /// A point file contained zero usable records.
    #[error("no coordinate records in input")]
    EmptyInput,

    /// The underlying read failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn city_new() {
        let c = City::new(3, 4);
        assert_eq!(c.x, 3);
        assert_eq!(c.y, 4);
    }

    #[test]
    fn city_map_accessors() {
        let mut map = CityMap::new(Dimensions {
            width: 10,
            height: 10,
        });
        assert!(map.is_empty());
        map.push(City::new(1, 9));
        map.push(City::new(2, 9));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(0), Some(City::new(1, 9)));
        assert_eq!(map.get(1), Some(City::new(2, 9)));
        assert_eq!(map.get(2), None);
        assert_eq!(map.cities(), &[City::new(1, 9), City::new(2, 9)]);
        assert_eq!(
            map.dimensions(),
            Dimensions {
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn tour_accessors() {
        let tour = Tour::new(vec![2, 0, 1]);
        assert_eq!(tour.len(), 3);
        assert!(!tour.is_empty());
        assert_eq!(tour.indices(), &[2, 0, 1]);
        assert!(Tour::new(vec![]).is_empty());
    }

    #[test]
    fn tour_from_vec() {
        let tour: Tour = vec![1, 2, 3].into();
        assert_eq!(tour.indices(), &[1, 2, 3]);
    }

    // --- DecodeError display ---

    #[test]
    fn error_unsupported_format_display() {
        let err = DecodeError::UnsupportedFormat {
            found: "P6".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("unrecognized input format"));
        assert!(text.contains("\"P6\""));
    }

    #[test]
    fn error_truncated_display_carries_row() {
        let err = DecodeError::TruncatedData {
            row: 7,
            reason: "expected 4 row bytes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "input ended early at row 7: expected 4 row bytes",
        );
    }

    #[test]
    fn error_invalid_content_display_carries_line() {
        let err = DecodeError::InvalidContent {
            line: 3,
            reason: "unexpected character 'x'".to_string(),
        };
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn error_empty_input_display() {
        assert_eq!(
            DecodeError::EmptyInput.to_string(),
            "no coordinate records in input",
        );
    }

    // --- Serde round trips ---

    #[test]
    fn city_serde_round_trip() {
        let c = City::new(12, 800);
        let json = serde_json::to_string(&c).unwrap();
        let back: City = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn city_map_serde_round_trip() {
        let mut map = CityMap::new(Dimensions {
            width: 4,
            height: 4,
        });
        map.push(City::new(0, 3));
        map.push(City::new(3, 0));
        let json = serde_json::to_string(&map).unwrap();
        let back: CityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    fn tour_serde_round_trip() {
        let tour = Tour::new(vec![0, 2, 1]);
        let json = serde_json::to_string(&tour).unwrap();
        let back: Tour = serde_json::from_str(&json).unwrap();
        assert_eq!(tour, back);
    }
}
