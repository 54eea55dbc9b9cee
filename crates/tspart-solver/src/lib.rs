//! tspart-solver: external TSP solver integration.
//!
//! The heavy lifting of tour optimization is delegated to an external
//! solver binary, canonically `linkern` from the Concorde TSP suite.
//! [`LinkernSolver`] writes the city registry as a TSPLIB problem file
//! in a scratch directory, runs the solver as a subprocess, and parses
//! the cycle file it writes back into a [`Tour`] of city indices.
//!
//! The [`TspSolver`] trait is the seam for substituting a different
//! solver, including an in-process fake in tests.

use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::Command;

use tspart_pipeline::{CityMap, Tour};

/// Errors from running an external solver or reading its tour.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Scratch file or subprocess I/O failed. A missing solver
    /// executable surfaces here as `NotFound`.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The solver process ran but exited unsuccessfully.
    #[error("solver command {command:?} failed with {status}")]
    SolverFailed {
        /// The command line that was executed.
        command: String,
        /// The process exit status.
        status: std::process::ExitStatus,
    },

    /// A tour file line did not start with a city index.
    #[error("malformed tour line {line}: {content:?}")]
    MalformedTour {
        /// 1-based line number within the tour file.
        line: usize,
        /// The offending line.
        content: String,
    },
}

/// A tour optimizer over a [`CityMap`].
pub trait TspSolver {
    /// Compute a visiting order for every city in `cities`.
    ///
    /// `runs` is a solver-specific effort knob; more runs trade time
    /// for shorter tours.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see [`SolverError`].
    fn solve(&self, cities: &CityMap, runs: u32) -> Result<Tour, SolverError>;
}

/// Driver for the Concorde `linkern` Lin-Kernighan solver.
#[derive(Debug, Clone)]
pub struct LinkernSolver {
    executable: PathBuf,
}

impl LinkernSolver {
    /// Use the solver at `executable` (a bare name resolves through
    /// `PATH`).
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for LinkernSolver {
    fn default() -> Self {
        Self::new("linkern")
    }
}

impl TspSolver for LinkernSolver {
    fn solve(&self, cities: &CityMap, runs: u32) -> Result<Tour, SolverError> {
        // A tour over fewer than two cities is its own optimum; the
        // solver rejects such degenerate problems.
        if cities.len() < 2 {
            return Ok(Tour::new((0..cities.len()).collect()));
        }

        let scratch = tempfile::tempdir()?;
        let problem_path = scratch.path().join("cities.tsp");
        let tour_path = scratch.path().join("cities.tour");
        tspart_export::write_tsplib_file(&problem_path, cities, "cities")?;

        let mut command = Command::new(&self.executable);
        command
            .arg("-r")
            .arg(runs.to_string())
            .arg("-o")
            .arg(&tour_path)
            .arg(&problem_path);
        let status = command.status()?;
        if !status.success() {
            return Err(SolverError::SolverFailed {
                command: format!("{command:?}"),
                status,
            });
        }

        let file = std::fs::File::open(&tour_path)?;
        let mut entries = read_tour(&mut BufReader::new(file))?;

        // linkern cycle files open with a "<count> <count>" summary
        // line; its first token parses like a city index and must be
        // stripped before the real visiting order.
        if entries.first() == Some(&cities.len()) {
            entries.remove(0);
        }
        Ok(Tour::new(entries))
    }
}

/// Parse a solver cycle file: the first whitespace-separated token of
/// each non-blank line is a city index, anything after it (edge
/// lengths and the like) is ignored. Lines starting with `#` are
/// skipped.
///
/// No range validation happens here; the renderer checks every index
/// against the registry it draws over.
///
/// # Errors
///
/// [`SolverError::MalformedTour`] when a line's first token is not an
/// unsigned integer, or [`SolverError::Io`] from the reader.
pub fn read_tour<R: BufRead>(reader: &mut R) -> Result<Vec<usize>, SolverError> {
    let mut entries = Vec::new();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if token.starts_with('#') {
            continue;
        }
        let index = token
            .parse::<usize>()
            .map_err(|_| SolverError::MalformedTour {
                line: line_index + 1,
                content: line.clone(),
            })?;
        entries.push(index);
    }
    Ok(entries)
}
