pub mod condense;
pub mod format;
pub mod index;
pub mod model;
pub mod solve;
pub mod standard;

pub use condense::{
    condense_constraint, condense_terms, normalize_constraint, Coefficients, Condensed, NormalizedRow, RowKind,
};
pub use format::{format_general, model_to_string, parse_solution, write_model, FormatError};
pub use index::NameIndex;
pub use model::*;
pub use solve::{LpError, Solver, DEFAULT_TOLERANCE};
pub use standard::{standardize, BuildError, StandardLp};

pub use lpwrap_solver::{LinearSolver, Optimum, Simplex, SolveError, StandardForm};
