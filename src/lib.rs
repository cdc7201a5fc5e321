//! Timetable construction as a graph coloring problem (exact and heuristic search engines)

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// conflict graph trait, solutions and checker
pub mod color;

/// errors of the instance/solution layer
pub mod error;

/// read DIMACS formats
pub mod dimacs;

/// compact conflict graph (adjacency lists + bitset matrix)
pub mod compact_instance;

/// timetable records, conflict graph construction and schedule export
pub mod timetable;

/// helper and utility methods for executables
pub mod util;

/// search engines for the coloring problem
pub mod search;
