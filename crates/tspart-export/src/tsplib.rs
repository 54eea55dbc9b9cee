//! TSPLIB problem file serialization.
//!
//! Writes a [`CityMap`] as the textual weighted-graph description the
//! linkern solver consumes: a fixed header block, one
//! `<index> <x> <y>` node line per city in registry order, and a
//! terminal `EOF:` marker. City index `i` is written as node `i`, so
//! tour indices returned by the solver map straight back onto the
//! registry.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tspart_pipeline::CityMap;

/// Write the TSPLIB description of `cities` to `writer`.
///
/// Deterministic and order-preserving; `name` fills the `NAME:`
/// header field.
///
/// # Errors
///
/// Any error from the underlying writer.
pub fn write_tsplib<W: Write>(writer: &mut W, cities: &CityMap, name: &str) -> io::Result<()> {
    writeln!(writer, "NAME:{name}")?;
    writeln!(writer, "TYPE:TSP")?;
    writeln!(writer, "DIMENSION:{}", cities.len())?;
    writeln!(writer, "EDGE_WEIGHT_TYPE:EUC_2D")?;
    writeln!(writer, "NODE_COORD_TYPE:TWOD_COORDS")?;
    writeln!(writer, "NODE_COORD_SECTION:")?;
    for (index, city) in cities.cities().iter().enumerate() {
        writeln!(writer, "{index} {} {}", city.x, city.y)?;
    }
    writeln!(writer, "EOF:")
}

/// Write the TSPLIB description of `cities` to a file at `path`.
///
/// On failure the partially written file is removed before the error
/// is returned; callers never observe a half-written problem file.
///
/// # Errors
///
/// Any error from creating or writing the file.
pub fn write_tsplib_file(path: &Path, cities: &CityMap, name: &str) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let result = write_tsplib(&mut writer, cities, name).and_then(|()| writer.flush());
    if let Err(err) = result {
        let _ = fs::remove_file(path);
        return Err(err);
    }
    Ok(())
}
