use thiserror::Error;

use crate::color::{CheckerResult, VertexId};

/** errors raised while reading instances or writing solutions.
The search engines themselves never fail (degenerate graphs are normalized to a valid coloring).
*/
#[derive(Error, Debug)]
pub enum ColorError {
    /// file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// file involved
        path: String,
        /// underlying error
        source: std::io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DIMACS file could not be parsed
    #[error("DIMACS parse error: {0}")]
    Dimacs(String),

    /// DIMACS edge refers to a vertex outside 1..=n
    #[error("edge ({0},{1}) refers to a vertex outside 1..={2}")]
    VertexOutOfRange(usize, usize, usize),

    /// the timetable expands to zero lessons
    #[error("timetable contains no lessons")]
    NoLessons,

    /// unknown instance type given on the command line
    #[error("unknown instance type {0} (valid: 'dimacs', 'timetable')")]
    UnknownInstanceType(String),

    /// time limit given on the command line is not a number
    #[error("unable to parse the time given: {0}")]
    InvalidTime(String),

    /// the coloring does not match the instance it is exported for
    #[error("coloring has {0} entries but the instance has {1} vertices")]
    ColoringSize(usize, usize),

    /// vertex without a slot in an exported coloring
    #[error("vertex {0} is not colored")]
    Uncolored(VertexId),

    /// the checker rejected a solution
    #[error("invalid solution: {0:?}")]
    InvalidSolution(CheckerResult),
}

impl ColorError {
    /// wraps an I/O error with the file it happened on
    pub fn io(path:&str, source:std::io::Error) -> Self {
        ColorError::Io { path: path.to_string(), source }
    }
}
