use crate::problem::StandardForm;
use crate::solution::{Optimum, SolveError};

/// A routine that minimizes `c·x` subject to `G·x <= h`, `A·x = b` and `x >= 0`.
///
/// Implementations report infeasible, unbounded or numerically stuck problems
/// as a [`SolveError`] rather than a sentinel value.
pub trait LinearSolver {
    fn solve(&self, problem: &StandardForm, tolerance: f64) -> Result<Optimum, SolveError>;
}

/// Two-phase simplex over a dense tableau
#[derive(Debug, Clone)]
pub struct Simplex {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
}

impl Default for Simplex {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
        }
    }
}

impl Simplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Drive the phase 1 objective (sum of artificials) to zero, then restore
    /// the real objective priced out against the resulting basis.
    fn phase1(&self, tableau: &mut Tableau, tolerance: f64) -> Result<(), SolveError> {
        let n_constraints = tableau.data.len() - 1;
        let n_cols = tableau.data[0].len();
        let art_start = tableau.n_vars + tableau.n_slack;

        let orig_obj = tableau.data[n_constraints].clone();

        // Maximize -sum(artificials)
        tableau.data[n_constraints].fill(0.0);
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[n_constraints][j] = -1.0;
        }
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] += tableau.data[i][j];
                }
            }
        }

        match self.iterate(tableau, n_cols - 1, tolerance) {
            Ok(()) => {}
            // Phase 1 is bounded by zero, so this only happens on breakdown
            Err(SolveError::Unbounded) => return Err(SolveError::Infeasible),
            Err(e) => return Err(e),
        }

        let rhs_col = n_cols - 1;
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > tolerance {
                return Err(SolveError::Infeasible);
            }
        }

        drive_out_artificials(tableau, art_start, tolerance);

        let n_constraints = tableau.data.len() - 1;
        tableau.data[n_constraints] = orig_obj;
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[n_constraints][basic];
            if ratio != 0.0 {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        Ok(())
    }

    fn phase2(&self, tableau: &mut Tableau, tolerance: f64) -> Result<(), SolveError> {
        // Artificial columns never re-enter the basis
        let exclude_from = tableau.n_vars + tableau.n_slack;
        self.iterate(tableau, exclude_from, tolerance)
    }

    /// Pivot until no column below `n_cols` can improve the objective row.
    fn iterate(&self, tableau: &mut Tableau, n_cols: usize, tolerance: f64) -> Result<(), SolveError> {
        let mut pivots = 0;
        loop {
            let Some(pivot_col) = find_pivot_column(tableau, n_cols, tolerance) else {
                return Ok(());
            };
            if pivots == self.max_iterations {
                return Err(SolveError::IterationLimit(self.max_iterations));
            }
            let Some(pivot_row) = find_pivot_row(tableau, pivot_col, tolerance) else {
                return Err(SolveError::Unbounded);
            };
            pivot(tableau, pivot_row, pivot_col);
            pivots += 1;
            tableau.pivots += 1;
        }
    }
}

impl LinearSolver for Simplex {
    fn solve(&self, problem: &StandardForm, tolerance: f64) -> Result<Optimum, SolveError> {
        problem.validate()?;

        let mut tableau = build_tableau(problem);
        if tableau.n_artificial > 0 {
            self.phase1(&mut tableau, tolerance)?;
        }
        self.phase2(&mut tableau, tolerance)?;

        let x = tableau.primal_values();
        let objective: f64 = problem.c.iter().zip(&x).map(|(c, x)| c * x).sum();

        tracing::debug!(
            component = "simplex",
            operation = "solve",
            status = "success",
            pivots = tableau.pivots,
            objective,
            "Simplex reached an optimum"
        );

        Ok(Optimum { objective, x })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOp {
    Le,
    Ge,
    Eq,
}

struct Row<'a> {
    coeffs: &'a [f64],
    sign: f64,
    op: RowOp,
    rhs: f64,
}

fn build_tableau(problem: &StandardForm) -> Tableau {
    let n_vars = problem.num_variables();

    // Every right-hand side must start non-negative; negating a `<=` row turns it into `>=`
    let mut rows = Vec::with_capacity(problem.num_inequalities() + problem.num_equalities());
    for (coeffs, &rhs) in problem.g.iter().zip(&problem.h) {
        if rhs < 0.0 {
            rows.push(Row { coeffs, sign: -1.0, op: RowOp::Ge, rhs: -rhs });
        } else {
            rows.push(Row { coeffs, sign: 1.0, op: RowOp::Le, rhs });
        }
    }
    for (coeffs, &rhs) in problem.a.iter().zip(&problem.b) {
        let sign = if rhs < 0.0 { -1.0 } else { 1.0 };
        rows.push(Row { coeffs, sign, op: RowOp::Eq, rhs: sign * rhs });
    }

    let n_slack = rows.iter().filter(|r| r.op != RowOp::Eq).count();
    let n_artificial = rows.iter().filter(|r| r.op != RowOp::Le).count();

    let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS
    let total_rows = rows.len() + 1; // +1 for objective

    let mut tableau = Tableau {
        data: vec![vec![0.0; total_cols]; total_rows],
        basic_vars: vec![0; rows.len()],
        n_vars,
        n_slack,
        n_artificial,
        pivots: 0,
    };

    let mut slack_idx = n_vars;
    let mut artificial_idx = n_vars + n_slack;

    for (i, row) in rows.iter().enumerate() {
        for (j, &coef) in row.coeffs.iter().enumerate() {
            tableau.data[i][j] = row.sign * coef;
        }
        tableau.data[i][total_cols - 1] = row.rhs;

        match row.op {
            RowOp::Le => {
                tableau.data[i][slack_idx] = 1.0;
                tableau.basic_vars[i] = slack_idx;
                slack_idx += 1;
            }
            RowOp::Ge => {
                tableau.data[i][slack_idx] = -1.0; // surplus
                slack_idx += 1;
                tableau.data[i][artificial_idx] = 1.0;
                tableau.basic_vars[i] = artificial_idx;
                artificial_idx += 1;
            }
            RowOp::Eq => {
                tableau.data[i][artificial_idx] = 1.0;
                tableau.basic_vars[i] = artificial_idx;
                artificial_idx += 1;
            }
        }
    }

    // The pivot rules maximize, and maximizing -c·x minimizes c·x
    let obj_row = rows.len();
    for (j, &coef) in problem.c.iter().enumerate() {
        tableau.data[obj_row][j] = -coef;
    }

    tableau
}

/// Replace every artificial still basic (at level zero) after phase 1 with a
/// real or slack column from its row. A row with no such column is a
/// linear combination of the others and is dropped.
fn drive_out_artificials(tableau: &mut Tableau, art_start: usize, tolerance: f64) {
    let mut i = 0;
    while i < tableau.basic_vars.len() {
        if tableau.basic_vars[i] < art_start {
            i += 1;
            continue;
        }
        match (0..art_start).find(|&j| tableau.data[i][j].abs() > tolerance) {
            Some(col) => {
                pivot(tableau, i, col);
                i += 1;
            }
            None => {
                tableau.data.remove(i);
                tableau.basic_vars.remove(i);
            }
        }
    }
}

/// Most positive objective-row entry among the first `n_cols` columns
fn find_pivot_column(tableau: &Tableau, n_cols: usize, tolerance: f64) -> Option<usize> {
    let obj_row = tableau.data.len() - 1;

    let mut max_val = tolerance;
    let mut max_col = None;
    for j in 0..n_cols {
        if tableau.data[obj_row][j] > max_val {
            max_val = tableau.data[obj_row][j];
            max_col = Some(j);
        }
    }
    max_col
}

/// Minimum ratio test
fn find_pivot_row(tableau: &Tableau, col: usize, tolerance: f64) -> Option<usize> {
    let n_constraints = tableau.data.len() - 1;
    let rhs_col = tableau.data[0].len() - 1;

    let mut min_ratio = f64::INFINITY;
    let mut min_row = None;
    for i in 0..n_constraints {
        let val = tableau.data[i][col];
        if val > tolerance {
            let ratio = tableau.data[i][rhs_col] / val;
            if ratio >= 0.0 && ratio < min_ratio {
                min_ratio = ratio;
                min_row = Some(i);
            }
        }
    }
    min_row
}

fn pivot(tableau: &mut Tableau, row: usize, col: usize) {
    let n_rows = tableau.data.len();
    let n_cols = tableau.data[0].len();

    tableau.basic_vars[row] = col;

    let pivot_val = tableau.data[row][col];
    for j in 0..n_cols {
        tableau.data[row][j] /= pivot_val;
    }

    for i in 0..n_rows {
        if i != row {
            let factor = tableau.data[i][col];
            if factor != 0.0 {
                for j in 0..n_cols {
                    tableau.data[i][j] -= factor * tableau.data[row][j];
                }
            }
        }
    }
}

struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    pivots: usize,
}

impl Tableau {
    fn primal_values(&self) -> Vec<f64> {
        let rhs_col = self.data[0].len() - 1;
        let mut values = vec![0.0; self.n_vars];
        for (i, &basic) in self.basic_vars.iter().enumerate() {
            if basic < self.n_vars {
                values[basic] = self.data[i][rhs_col];
            }
        }
        values
    }
}
