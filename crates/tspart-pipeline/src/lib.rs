//! tspart-pipeline: bitmap and point-file decoding (sans-IO core).
//!
//! Turns the lit pixels of a monochrome PBM bitmap, or the records of
//! a floating point coordinate file, into an ordered [`CityMap`] of
//! integer "cities", the shared input of the TSPLIB writer and the
//! SVG tour renderer.
//!
//! This crate performs no file I/O of its own beyond reading from the
//! caller's `BufRead`; the small [`decode_file`] convenience is the
//! only filesystem touchpoint.

mod pbm;
mod points;
pub mod types;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use points::DEFAULT_BOX_SIZE;
pub use types::{City, CityMap, DecodeError, Dimensions, Tour};

/// Fixed header line identifying a point coordinate file.
const POINTS_MAGIC: &str = "# x-coord y-coord radius";

/// Decode any supported input format into a [`CityMap`].
///
/// The first line selects the container: `P4` (packed bitmap), `P1`
/// (text bitmap), or the literal point-file header
/// `# x-coord y-coord radius`. Point clouds are normalized into the
/// default box ([`DEFAULT_BOX_SIZE`]).
///
/// # Errors
///
/// Returns [`DecodeError::UnsupportedFormat`] when the first line
/// matches none of the recognized signatures, or the failing
/// sub-decoder's error otherwise. On failure no partial city map is
/// exposed.
pub fn decode<R: BufRead>(reader: &mut R) -> Result<CityMap, DecodeError> {
    decode_with_box_size(reader, DEFAULT_BOX_SIZE)
}

/// Like [`decode`], with an explicit normalization box size for
/// point-file input. Bitmap input ignores `box_size`.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_box_size<R: BufRead>(
    reader: &mut R,
    box_size: f64,
) -> Result<CityMap, DecodeError> {
    // Read the magic line as raw bytes: for P4 input the rest of the
    // stream is binary, so the line must not be assumed UTF-8 clean.
    let mut magic = Vec::new();
    reader.read_until(b'\n', &mut magic)?;
    let magic = String::from_utf8_lossy(&magic);

    match magic.trim_end() {
        "P4" => {
            let dimensions = pbm::read_dimensions(reader)?;
            pbm::decode_packed(reader, dimensions)
        }
        "P1" => {
            let dimensions = pbm::read_dimensions(reader)?;
            pbm::decode_text(reader, dimensions)
        }
        POINTS_MAGIC => points::decode_points(reader, box_size),
        other => Err(DecodeError::UnsupportedFormat {
            found: other.to_string(),
        }),
    }
}

/// Open `path` and decode it with the default box size.
///
/// # Errors
///
/// Returns [`DecodeError::Io`] when the file cannot be opened, or any
/// [`decode`] error.
pub fn decode_file(path: &Path) -> Result<CityMap, DecodeError> {
    let file = File::open(path)?;
    decode(&mut BufReader::new(file))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_packed_bitmap() {
        let mut data: Vec<u8> = b"P4\n4 4\n".to_vec();
        data.extend_from_slice(&[0x80, 0x00, 0x00, 0x10]);
        let map = decode(&mut data.as_slice()).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 3), City::new(3, 0)]);
        assert_eq!(
            map.dimensions(),
            Dimensions {
                width: 4,
                height: 4
            }
        );
    }

    #[test]
    fn dispatch_text_bitmap() {
        let data = b"P1\n# a comment before the dimensions\n4 4\n1000\n0000\n0000\n0001\n";
        let map = decode(&mut data.as_slice()).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 3), City::new(3, 0)]);
    }

    #[test]
    fn dispatch_point_file() {
        let data = b"# x-coord y-coord radius\n0 0 1\n10 10 1\n";
        let map = decode(&mut data.as_slice()).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 0), City::new(800, 800)]);
    }

    #[test]
    fn packed_and_text_forms_of_same_image_agree() {
        let text = b"P1\n5 3\n10010\n01100\n00011\n";
        let mut packed: Vec<u8> = b"P4\n5 3\n".to_vec();
        packed.extend_from_slice(&[0b1001_0000, 0b0110_0000, 0b0001_1000]);

        let from_text = decode(&mut text.as_slice()).unwrap();
        let from_packed = decode(&mut packed.as_slice()).unwrap();
        assert_eq!(from_text, from_packed);
    }

    #[test]
    fn unsupported_magic_fails() {
        let data = b"P6\n4 4 255\n";
        let err = decode(&mut data.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnsupportedFormat { ref found } if found == "P6",
        ));
    }

    #[test]
    fn near_miss_points_header_fails() {
        let data = b"# x-coordinate list\n0 0\n";
        assert!(matches!(
            decode(&mut data.as_slice()).unwrap_err(),
            DecodeError::UnsupportedFormat { .. },
        ));
    }

    #[test]
    fn empty_stream_fails() {
        let data: &[u8] = b"";
        assert!(matches!(
            decode(&mut &data[..]).unwrap_err(),
            DecodeError::UnsupportedFormat { .. },
        ));
    }

    #[test]
    fn custom_box_size_reaches_point_decoder() {
        let data = b"# x-coord y-coord radius\n0 0\n4 4\n";
        let map = decode_with_box_size(&mut data.as_slice(), 100.0).unwrap();
        assert_eq!(map.cities(), &[City::new(0, 0), City::new(100, 100)]);
        assert_eq!(map.dimensions().width, 100);
    }

    #[test]
    fn binary_garbage_after_valid_p4_header_is_pixels_not_text() {
        // The packed body may contain arbitrary bytes, including ones
        // that are not valid UTF-8.
        let mut data: Vec<u8> = b"P4\n8 1\n".to_vec();
        data.push(0xFF);
        let map = decode(&mut data.as_slice()).unwrap();
        assert_eq!(map.len(), 8);
    }
}
