use lpwrap_solver::{LinearSolver, Simplex, SolveError};
use thiserror::Error;

use crate::index::NameIndex;
use crate::model::{Lp, Solution};
use crate::standard::{standardize, BuildError};

/// Tolerance handed to the solving routine unless configured otherwise
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Solver(#[from] SolveError),
}

/// Solves symbolic [`Lp`]s through a standard-form [`LinearSolver`]
#[derive(Debug, Clone)]
pub struct Solver<S = Simplex> {
    backend: S,
    tolerance: f64,
}

impl Default for Solver<Simplex> {
    fn default() -> Self {
        Self::with_backend(Simplex::default())
    }
}

impl Solver<Simplex> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: LinearSolver> Solver<S> {
    pub fn with_backend(backend: S) -> Self {
        Self {
            backend,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Solve `lp` with a single call to the backend.
    ///
    /// Backend failures (infeasible, unbounded, ...) are returned unchanged.
    pub fn solve(&self, lp: &Lp) -> Result<Solution, LpError> {
        let index = NameIndex::from_lp(lp);
        let standard = standardize(lp, &index)?;

        let optimum = match self.backend.solve(&standard.form, self.tolerance) {
            Ok(optimum) => optimum,
            Err(e) => {
                tracing::warn!(
                    component = "solve",
                    operation = "solve",
                    status = "error",
                    error = %e,
                    "Solving routine failed"
                );
                return Err(e.into());
            }
        };

        if optimum.x.len() != index.len() {
            return Err(SolveError::DimensionMismatch {
                what: "x",
                expected: index.len(),
                found: optimum.x.len(),
            }
            .into());
        }

        let value = standard.objective_value(optimum.objective);
        let values = index
            .names()
            .iter()
            .cloned()
            .zip(optimum.x)
            .collect();

        tracing::debug!(
            component = "solve",
            operation = "solve",
            status = "success",
            num_variables = index.len(),
            value,
            "Solved LP"
        );

        Ok(Solution { value, values })
    }
}
