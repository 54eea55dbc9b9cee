//! SVG tour renderer.
//!
//! Draws a solver tour over a [`CityMap`] as one or more `<path>`
//! elements with relative coordinate deltas, streaming every primitive
//! straight to the destination sink. Tours can reach hundreds of
//! thousands of cities, so nothing buffers the whole drawing: long
//! tours are split into bounded-length chained paths to keep both this
//! writer and downstream SVG viewers within sane memory.
//!
//! City space is bottom-up (row 0 at the bottom of the bitmap); SVG is
//! top-down, so every emitted y coordinate is flipped against the
//! source height.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use tspart_pipeline::{City, CityMap, Tour};

/// Which portion of the SVG document to emit.
///
/// Fragment modes let a caller stitch one large drawing out of
/// independently rendered pieces: one preamble, any number of bodies,
/// one postamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentMode {
    /// Preamble, paths, and postamble: a complete SVG document.
    #[default]
    Full,
    /// Document preamble only.
    Preamble,
    /// Path elements only.
    Body,
    /// Document postamble only.
    Postamble,
}

/// Rendering parameters for [`render_tour`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Maximum line segments per `<path>` element; 0 draws the whole
    /// tour as a single path.
    pub max_segments: usize,

    /// Stroke (line) color.
    pub stroke: String,

    /// Fill color. Honored only when the tour is drawn as a single
    /// unbounded path (`max_segments == 0`); a set of disconnected
    /// open polylines is not a coherent closed shape, so split
    /// renders force `none`.
    pub fill: String,

    /// Which portion of the document to emit.
    pub mode: ContentMode,

    /// Optional Inkscape layer label. When present, body paths are
    /// wrapped in a layer group.
    pub layer: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_segments: 0,
            stroke: "#000000".to_string(),
            fill: "none".to_string(),
            mode: ContentMode::Full,
            layer: None,
        }
    }
}

/// Errors that can occur while rendering a tour.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The tour referenced a city index outside the registry. The
    /// tour comes from an external, unverified process, so this is
    /// checked for every entry.
    #[error("tour contains invalid city index {index} (city count {city_count})")]
    InvalidTourIndex {
        /// The offending tour entry.
        index: usize,
        /// Number of cities in the registry being drawn.
        city_count: usize,
    },

    /// The underlying write failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Render `tour` over `cities` into `writer`.
///
/// Emits the portions of the SVG document selected by
/// [`RenderOptions::mode`]. Paths use relative deltas: each starts
/// with `m x,y` at the chain position and continues with ` dx,dy`
/// line segments. With `max_segments = k > 0`, a path is ended after
/// `k` segments and the next one chains from the current position, so
/// a tour of `n` entries produces `ceil((n-1)/k)` open paths. A tour
/// that fits in one never-split path is closed into a loop with `Z`.
/// An empty tour (or one with a single entry) draws nothing.
///
/// # Errors
///
/// [`RenderError::InvalidTourIndex`] on the first out-of-range tour
/// entry, or [`RenderError::Io`] from the sink. Callers writing to a
/// file should use [`render_tour_to_file`], which discards the
/// partial output on failure.
pub fn render_tour<W: Write>(
    writer: &mut W,
    tour: &Tour,
    cities: &CityMap,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    match options.mode {
        ContentMode::Preamble => {
            write_preamble(writer, cities)?;
        }
        ContentMode::Postamble => {
            writeln!(writer, "</svg>")?;
        }
        ContentMode::Body => {
            write_body(writer, tour, cities, options)?;
        }
        ContentMode::Full => {
            write_preamble(writer, cities)?;
            write_body(writer, tour, cities, options)?;
            writeln!(writer, "</svg>")?;
        }
    }
    Ok(())
}

/// Render `tour` into a file at `path`.
///
/// Atomic from the caller's point of view: on any validation or I/O
/// failure the partially written destination is removed before the
/// error is returned.
///
/// # Errors
///
/// See [`render_tour`].
pub fn render_tour_to_file(
    path: &Path,
    tour: &Tour,
    cities: &CityMap,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let result = render_tour(&mut writer, tour, cities, options)
        .and_then(|()| writer.flush().map_err(RenderError::from));
    if let Err(err) = result {
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(err);
    }
    Ok(())
}

fn write_preamble<W: Write>(writer: &mut W, cities: &CityMap) -> io::Result<()> {
    let dimensions = cities.dimensions();
    write!(
        writer,
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
         <!-- Created with the tspart toolkit -->\n\
         \n\
         <svg xmlns=\"http://www.w3.org/2000/svg\"\n\
         \x20    xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\"\n\
         \x20    xmlns:sodipodi=\"http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd\"\n\
         \x20    xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n\
         \x20    xmlns:dc=\"http://purl.org/dc/elements/1.1/\"\n\
         \x20    xmlns:cc=\"http://creativecommons.org/ns#\"\n\
         \x20    height=\"{height}\"\n\
         \x20    width=\"{width}\">\n\
         \x20 <sodipodi:namedview\n\
         \x20           showgrid=\"false\"\n\
         \x20           showborder=\"true\"\n\
         \x20           inkscape:showpageshadow=\"false\"/>\n\
         \x20 <metadata>\n\
         \x20   <rdf:RDF>\n\
         \x20     <cc:Work rdf:about=\"\">\n\
         \x20       <dc:format>image/svg+xml</dc:format>\n\
         \x20       <dc:type rdf:resource=\"http://purl.org/dc/dcmitype/StillImage\" />\n\
         \x20       <dc:subject>\n\
         \x20         <rdf:Bag>\n\
         \x20           <rdf:li>TSP</rdf:li>\n\
         \x20           <rdf:li>TSP art</rdf:li>\n\
         \x20         </rdf:Bag>\n\
         \x20       </dc:subject>\n\
         \x20       <dc:description>TSP art: one continuous tour of the source stipples</dc:description>\n\
         \x20     </cc:Work>\n\
         \x20   </rdf:RDF>\n\
         \x20 </metadata>\n",
        height = dimensions.height,
        width = dimensions.width,
    )
}

fn write_body<W: Write>(
    writer: &mut W,
    tour: &Tour,
    cities: &CityMap,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    if let Some(label) = options.layer.as_deref() {
        writeln!(
            writer,
            "  <g inkscape:groupmode=\"layer\" inkscape:label=\"{}\">",
            xml_escape(label),
        )?;
    }

    write_paths(writer, tour, cities, options)?;

    if options.layer.is_some() {
        writeln!(writer, "  </g>")?;
    }
    Ok(())
}

fn write_paths<W: Write>(
    writer: &mut W,
    tour: &Tour,
    cities: &CityMap,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let city_count = cities.len();
    let lookup = |index: usize| -> Result<City, RenderError> {
        cities
            .get(index)
            .ok_or(RenderError::InvalidTourIndex { index, city_count })
    };

    // Fill only makes sense for a single closed path.
    let fill = if options.max_segments == 0 {
        options.fill.as_str()
    } else {
        "none"
    };
    let height = i64::from(cities.dimensions().height);

    let mut entries = tour.indices().iter().copied();
    let Some(first) = entries.next() else {
        return Ok(());
    };
    let mut last = lookup(first)?;

    // Paths chain with continuity of position: each split path starts
    // where the previous one ended, never duplicating geometry. A
    // single-entry tour yields zero segments and so no path at all.
    let mut path_open = false;
    let mut split = false;
    let mut segments = 0_usize;

    for index in entries {
        let next = lookup(index)?;

        if path_open && options.max_segments > 0 && segments == options.max_segments {
            // End the full path open-ended; the loop marker is
            // reserved for a tour that never split.
            writeln!(writer, "\"/>")?;
            path_open = false;
            split = true;
            segments = 0;
        }
        if !path_open {
            write!(
                writer,
                "    <path style=\"fill:{fill};stroke:{};stroke-width:1\"\n          d=\"m {},{}",
                options.stroke,
                last.x,
                height - i64::from(last.y),
            )?;
            path_open = true;
        }

        // Relative delta in drawing space; the y axis flips sign.
        let dx = i64::from(next.x) - i64::from(last.x);
        let dy = i64::from(last.y) - i64::from(next.y);
        write!(writer, " {dx},{dy}")?;
        last = next;
        segments += 1;
    }

    if path_open {
        if split {
            writeln!(writer, "\"/>")?;
        } else {
            writeln!(writer, " Z\"/>")?;
        }
    }
    Ok(())
}

/// Escape the five XML special characters for safe embedding in
/// attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
