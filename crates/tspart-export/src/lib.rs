//! tspart-export: serializers for the two tspart output formats.
//!
//! [`tsplib`] writes a [`tspart_pipeline::CityMap`] as the TSPLIB
//! problem file an external solver consumes; [`svg`] renders the
//! solver's tour back over the map as an SVG line drawing.

pub mod svg;
pub mod tsplib;

pub use svg::{ContentMode, RenderError, RenderOptions, render_tour, render_tour_to_file};
pub use tsplib::{write_tsplib, write_tsplib_file};
