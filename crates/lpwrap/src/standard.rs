use lpwrap_solver::StandardForm;
use thiserror::Error;

use crate::condense::{condense_terms, normalize_constraint, Coefficients, RowKind};
use crate::index::NameIndex;
use crate::model::{CompKind, Lp, OptKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Unknown variable: {0} is not in the name index")]
    UnknownVariable(String),
}

/// An [`Lp`] in minimize-only standard form, plus what is needed to map the
/// solver's answer back to the original objective.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardLp {
    pub form: StandardForm,
    /// Constant dropped from the objective, added back after solving
    pub offset: f64,
    /// Direction of the original objective
    pub kind: OptKind,
}

impl StandardLp {
    /// Whether `form.c` is the negated objective of a maximization
    pub fn negated(&self) -> bool {
        self.kind == OptKind::Maximize
    }

    /// Map an optimal value of `form` back to the original objective.
    pub fn objective_value(&self, optimum: f64) -> f64 {
        let value = if self.negated() { -optimum } else { optimum };
        value + self.offset
    }
}

/// Build the dense `c`, `A`/`b` and `G`/`h` blocks of `lp` over the columns of `index`.
///
/// Equality constraints become rows of `A` and every `<=`/`>=` constraint a
/// `<=` row of `G`, each keeping its relative order from `lp`.
pub fn standardize(lp: &Lp, index: &NameIndex) -> Result<StandardLp, BuildError> {
    let n_vars = index.len();
    let mut form = StandardForm::new(n_vars);

    let objective = condense_terms(&lp.objective.terms);
    scatter(&objective.coeffs, index, &mut form.c)?;
    if lp.objective.kind == OptKind::Maximize {
        for coef in form.c.iter_mut() {
            *coef = -*coef;
        }
    }

    let (equalities, inequalities): (Vec<_>, Vec<_>) = lp
        .constraints
        .iter()
        .partition(|c| c.comp == CompKind::Eq);

    for constraint in equalities.into_iter().chain(inequalities) {
        let normalized = normalize_constraint(constraint);
        let mut row = vec![0.0; n_vars];
        scatter(&normalized.coeffs, index, &mut row)?;
        match normalized.kind {
            RowKind::Eq => form.add_equality(row, normalized.rhs),
            RowKind::Le => form.add_inequality(row, normalized.rhs),
        }
    }

    tracing::debug!(
        component = "standard",
        operation = "standardize",
        status = "success",
        num_variables = n_vars,
        num_equalities = form.num_equalities(),
        num_inequalities = form.num_inequalities(),
        "Built standard form"
    );

    Ok(StandardLp {
        form,
        offset: objective.constant,
        kind: lp.objective.kind,
    })
}

fn scatter(coeffs: &Coefficients, index: &NameIndex, dense: &mut [f64]) -> Result<(), BuildError> {
    for (name, &value) in coeffs {
        let pos = index
            .position(name)
            .ok_or_else(|| BuildError::UnknownVariable(name.clone()))?;
        dense[pos] += value;
    }
    Ok(())
}
