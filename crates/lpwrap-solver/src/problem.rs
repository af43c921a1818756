use crate::solution::SolveError;

/// A linear program in the dense shape generic solving routines expect:
///
/// ```text
/// minimize    c·x
/// subject to  G·x <= h
///             A·x  = b
///             x   >= 0
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandardForm {
    /// Objective coefficients, one per column
    pub c: Vec<f64>,
    /// Inequality rows (`<=`)
    pub g: Vec<Vec<f64>>,
    /// Inequality right-hand sides
    pub h: Vec<f64>,
    /// Equality rows
    pub a: Vec<Vec<f64>>,
    /// Equality right-hand sides
    pub b: Vec<f64>,
}

impl StandardForm {
    /// An empty problem over `n_vars` columns with a zero objective.
    pub fn new(n_vars: usize) -> Self {
        Self {
            c: vec![0.0; n_vars],
            ..Self::default()
        }
    }

    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    pub fn num_equalities(&self) -> usize {
        self.a.len()
    }

    pub fn num_inequalities(&self) -> usize {
        self.g.len()
    }

    pub fn add_equality(&mut self, row: Vec<f64>, rhs: f64) {
        self.a.push(row);
        self.b.push(rhs);
    }

    pub fn add_inequality(&mut self, row: Vec<f64>, rhs: f64) {
        self.g.push(row);
        self.h.push(rhs);
    }

    /// Check that every block agrees with the column count and its right-hand side.
    pub fn validate(&self) -> Result<(), SolveError> {
        let n = self.num_variables();
        check_block("G", &self.g, &self.h, n)?;
        check_block("A", &self.a, &self.b, n)
    }
}

fn check_block(what: &'static str, rows: &[Vec<f64>], rhs: &[f64], n: usize) -> Result<(), SolveError> {
    if rows.len() != rhs.len() {
        return Err(SolveError::DimensionMismatch {
            what,
            expected: rows.len(),
            found: rhs.len(),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != n) {
        return Err(SolveError::DimensionMismatch {
            what,
            expected: n,
            found: row.len(),
        });
    }
    Ok(())
}
