use std::collections::BTreeMap;

use crate::model::{CompKind, Constraint, Term};

/// Sparse coefficients keyed by variable name, iterated in name order.
/// A missing name reads as zero.
pub type Coefficients = BTreeMap<String, f64>;

/// A linear expression `coeffs·x + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condensed {
    pub coeffs: Coefficients,
    pub constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// `coeffs·x = rhs`
    Eq,
    /// `coeffs·x <= rhs`
    Le,
}

/// A constraint reduced to `coeffs·x (= | <=) rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub coeffs: Coefficients,
    pub rhs: f64,
    pub kind: RowKind,
}

/// Merge repeated variables and pull the constants out into one scalar.
pub fn condense_terms(terms: &[Term]) -> Condensed {
    let mut condensed = Condensed::default();
    for term in terms {
        match term {
            Term::Variable { name, coeff } => {
                *condensed.coeffs.entry(name.clone()).or_insert(0.0) += coeff;
            }
            Term::Constant(value) => condensed.constant += value,
        }
    }
    condensed
}

/// Rewrite `left comp right` as `coeffs·x comp constant`, with every variable
/// on the left and every constant on the right. The comparator is unchanged.
pub fn condense_constraint(constraint: &Constraint) -> Condensed {
    let left = condense_terms(&constraint.left);
    let right = condense_terms(&constraint.right);

    let mut coeffs = left.coeffs;
    for (name, value) in right.coeffs {
        *coeffs.entry(name).or_insert(0.0) -= value;
    }

    Condensed {
        coeffs,
        constant: right.constant - left.constant,
    }
}

/// Reduce a constraint to an equality row or a `<=` row. `>=` constraints
/// are negated on both sides.
pub fn normalize_constraint(constraint: &Constraint) -> NormalizedRow {
    let Condensed { mut coeffs, constant } = condense_constraint(constraint);

    match constraint.comp {
        CompKind::Eq => NormalizedRow {
            coeffs,
            rhs: constant,
            kind: RowKind::Eq,
        },
        CompKind::Le => NormalizedRow {
            coeffs,
            rhs: constant,
            kind: RowKind::Le,
        },
        CompKind::Ge => {
            for value in coeffs.values_mut() {
                *value = -*value;
            }
            NormalizedRow {
                coeffs,
                rhs: -constant,
                kind: RowKind::Le,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs(pairs: &[(&str, f64)]) -> Coefficients {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_condense_accumulates() {
        for name in ["x", "long_variable_name", ""] {
            let condensed = condense_terms(&[
                Term::var(name, 2.0),
                Term::var(name, 3.0),
                Term::constant(1.0),
            ]);
            assert_eq!(condensed.coeffs, coeffs(&[(name, 5.0)]));
            assert_eq!(condensed.constant, 1.0);
        }
    }

    #[test]
    fn test_condense_sums_constants() {
        let condensed = condense_terms(&[Term::constant(1.5), Term::var("y", -1.0), Term::constant(2.0)]);
        assert_eq!(condensed.constant, 3.5);
        assert_eq!(condensed.coeffs, coeffs(&[("y", -1.0)]));
    }

    #[test]
    fn test_condense_empty() {
        assert_eq!(condense_terms(&[]), Condensed::default());
    }

    #[test]
    fn test_normalize_ge_flips() {
        // a*x + b >= c*y + d
        let (a, b, c, d) = (2.0, 7.0, 3.0, 4.0);
        let constraint = Constraint::ge(
            vec![Term::var("x", a), Term::constant(b)],
            vec![Term::var("y", c), Term::constant(d)],
        );

        let row = normalize_constraint(&constraint);

        assert_eq!(row.kind, RowKind::Le);
        assert_eq!(row.coeffs, coeffs(&[("x", -a), ("y", c)]));
        assert_eq!(row.rhs, b - d);
    }

    #[test]
    fn test_normalize_le_and_eq_keep_sign() {
        let left = vec![Term::var("x", 2.0), Term::constant(7.0)];
        let right = vec![Term::var("y", 3.0), Term::constant(4.0)];

        let le = normalize_constraint(&Constraint::le(left.clone(), right.clone()));
        assert_eq!(le.kind, RowKind::Le);
        assert_eq!(le.coeffs, coeffs(&[("x", 2.0), ("y", -3.0)]));
        assert_eq!(le.rhs, -3.0);

        let eq = normalize_constraint(&Constraint::eq(left, right));
        assert_eq!(eq.kind, RowKind::Eq);
        assert_eq!(eq.coeffs, coeffs(&[("x", 2.0), ("y", -3.0)]));
        assert_eq!(eq.rhs, -3.0);
    }

    #[test]
    fn test_condense_constraint_keeps_direction() {
        let constraint = Constraint::ge(vec![Term::var("b", 1.0)], vec![Term::constant(3.0)]);

        let condensed = condense_constraint(&constraint);

        assert_eq!(condensed.coeffs, coeffs(&[("b", 1.0)]));
        assert_eq!(condensed.constant, 3.0);
    }

    #[test]
    fn test_same_variable_both_sides_cancels() {
        let constraint = Constraint::le(vec![Term::var("x", 2.0)], vec![Term::var("x", 2.0)]);

        let row = normalize_constraint(&constraint);

        // The key stays present with a zero coefficient
        assert_eq!(row.coeffs, coeffs(&[("x", 0.0)]));
        assert_eq!(row.rhs, 0.0);
    }
}
