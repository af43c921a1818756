mod problem;
mod simplex;
mod solution;

pub use problem::StandardForm;
pub use simplex::{LinearSolver, Simplex};
pub use solution::{Optimum, SolveError};
