//! tspart: turn a stippled bitmap into a single-line SVG drawing.
//!
//! Decodes a monochrome bitmap (PBM `P4` or `P1`) or a point
//! coordinate file into "cities", hands them to an external TSP
//! solver, and renders the resulting tour as an SVG path drawing
//! suitable for pen plotters.
//!
//! # Usage
//!
//! ```text
//! tspart [OPTIONS] <INPUT>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use tspart_export::{ContentMode, RenderOptions};
use tspart_solver::{LinkernSolver, TspSolver};

/// Which portion of the SVG document to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum Content {
    /// Complete SVG document.
    #[default]
    Full,
    /// Document preamble only (no paths).
    Preamble,
    /// Path elements only.
    Body,
    /// Closing document tag only.
    Postamble,
}

impl From<Content> for ContentMode {
    fn from(content: Content) -> Self {
        match content {
            Content::Full => Self::Full,
            Content::Preamble => Self::Preamble,
            Content::Body => Self::Body,
            Content::Postamble => Self::Postamble,
        }
    }
}

/// Turn a stippled bitmap or point file into a single-line SVG tour
/// drawing.
#[derive(Parser)]
#[command(name = "tspart", version)]
struct Cli {
    /// Input file: PBM bitmap (P4 or P1) or point coordinate file.
    input: PathBuf,

    /// Output SVG path. Defaults to the input path with an `svg`
    /// extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the number of cities found in the input and exit without
    /// solving.
    #[arg(short, long)]
    count: bool,

    /// Fill color for the drawing. Only honored when the tour is a
    /// single unbounded path (`--max-segments 0`).
    #[arg(short, long, default_value = "none")]
    fill: String,

    /// Stroke color for the drawing.
    #[arg(short, long, default_value = "#000000")]
    stroke: String,

    /// Wrap the paths in an Inkscape layer with this label.
    #[arg(short = 'L', long, value_name = "LABEL")]
    layer: Option<String>,

    /// Maximum line segments per path element; 0 means unlimited (one
    /// closed path for the whole tour).
    #[arg(short, long, default_value_t = 0, value_name = "N")]
    max_segments: usize,

    /// Which portion of the SVG document to emit.
    #[arg(long, value_enum, default_value_t = Content::Full)]
    content: Content,

    /// Number of optimization runs to ask the solver for.
    #[arg(short, long, default_value_t = 1)]
    runs: u32,

    /// TSP solver executable (a bare name resolves through PATH).
    #[arg(short = 'S', long, default_value = "linkern", value_name = "PATH")]
    solver: PathBuf,

    /// Side length of the normalization box for point file input.
    #[arg(long, default_value_t = tspart_pipeline::DEFAULT_BOX_SIZE, value_name = "SIZE")]
    box_size: f64,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.fill != "none" && cli.max_segments != 0 {
        return Err("--fill requires --max-segments 0; split paths cannot be filled".into());
    }

    eprintln!("Reading {}", cli.input.display());
    let file = std::fs::File::open(&cli.input)?;
    let cities =
        tspart_pipeline::decode_with_box_size(&mut std::io::BufReader::new(file), cli.box_size)?;
    eprintln!(
        "Found {} cities in a {}x{} area",
        cities.len(),
        cities.dimensions().width,
        cities.dimensions().height,
    );

    if cli.count {
        println!("{}", cities.len());
        return Ok(());
    }

    let tour = match cli.content {
        // Preamble and postamble fragments need no visiting order.
        Content::Preamble | Content::Postamble => tspart_pipeline::Tour::new(Vec::new()),
        Content::Full | Content::Body => {
            eprintln!(
                "Solving with {} ({} run{})...",
                cli.solver.display(),
                cli.runs,
                if cli.runs == 1 { "" } else { "s" },
            );
            let solver = LinkernSolver::new(&cli.solver);
            let tour = solver.solve(&cities, cli.runs)?;
            eprintln!("Tour visits {} cities", tour.len());
            tour
        }
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("svg"));
    let options = RenderOptions {
        max_segments: cli.max_segments,
        stroke: cli.stroke.clone(),
        fill: cli.fill.clone(),
        mode: cli.content.into(),
        layer: cli.layer.clone(),
    };

    eprintln!("Writing {}", output.display());
    tspart_export::render_tour_to_file(&output, &tour, &cities, &options)?;
    eprintln!("Done.");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
