use thiserror::Error;

/// An optimal point of a [`StandardForm`](crate::StandardForm) problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Optimum {
    /// Optimal objective value `c·x`
    pub objective: f64,
    /// Optimal primal values, one per column
    pub x: Vec<f64>,
}

/// Why a solving routine produced no optimum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// No point satisfies every constraint
    #[error("lp: infeasible problem")]
    Infeasible,
    /// The objective decreases without bound over the feasible set
    #[error("lp: unbounded problem")]
    Unbounded,
    /// Pivoting did not settle, usually from cycling on a degenerate problem
    #[error("lp: no optimum after {0} iterations")]
    IterationLimit(usize),
    #[error("lp: {what} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
