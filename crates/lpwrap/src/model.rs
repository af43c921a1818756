use std::collections::HashMap;

/// A single contribution to one side of a linear expression
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `coeff * name`
    Variable { name: String, coeff: f64 },
    /// A constant offset, not a decision variable
    Constant(f64),
}

impl Term {
    pub fn var(name: impl Into<String>, coeff: f64) -> Self {
        Term::Variable {
            name: name.into(),
            coeff,
        }
    }

    pub fn constant(value: f64) -> Self {
        Term::Constant(value)
    }

    /// The variable name, or `None` for a constant
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Variable { name, .. } => Some(name.as_str()),
            Term::Constant(_) => None,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptKind {
    Minimize,
    Maximize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompKind {
    /// Equal (=)
    Eq,
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
}

impl CompKind {
    /// Operator token used by the LP text format
    pub fn token(self) -> &'static str {
        match self {
            CompKind::Eq => "=",
            CompKind::Le => "<=",
            CompKind::Ge => ">=",
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub terms: Vec<Term>,
    pub kind: OptKind,
}

impl Objective {
    pub fn minimize(terms: Vec<Term>) -> Self {
        Self {
            terms,
            kind: OptKind::Minimize,
        }
    }

    pub fn maximize(terms: Vec<Term>) -> Self {
        Self {
            terms,
            kind: OptKind::Maximize,
        }
    }
}

/// `sum(left) comp sum(right)`; either side may mix variables and constants.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub left: Vec<Term>,
    pub comp: CompKind,
    pub right: Vec<Term>,
}

impl Constraint {
    pub fn new(left: Vec<Term>, comp: CompKind, right: Vec<Term>) -> Self {
        Self { left, comp, right }
    }

    pub fn eq(left: Vec<Term>, right: Vec<Term>) -> Self {
        Self::new(left, CompKind::Eq, right)
    }

    pub fn le(left: Vec<Term>, right: Vec<Term>) -> Self {
        Self::new(left, CompKind::Le, right)
    }

    pub fn ge(left: Vec<Term>, right: Vec<Term>) -> Self {
        Self::new(left, CompKind::Ge, right)
    }

    /// Left terms followed by right terms
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.left.iter().chain(&self.right)
    }
}

/// A linear program over named variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Lp {
    pub objective: Objective,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
}

impl Lp {
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn subject_to(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }
}

/// Optimal objective value and variable bindings of a solved [`Lp`]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub value: f64,
    pub values: HashMap<String, f64>,
}

impl Solution {
    /// Evaluate the objective of `lp` (constant offset included) at externally
    /// produced bindings, such as a parsed solution file. Variables missing
    /// from `values` read as zero.
    pub fn from_bindings(lp: &Lp, values: HashMap<String, f64>) -> Self {
        let value = lp
            .objective
            .terms
            .iter()
            .map(|term| match term {
                Term::Variable { name, coeff } => coeff * values.get(name).copied().unwrap_or(0.0),
                Term::Constant(value) => *value,
            })
            .sum();
        Self { value, values }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Bindings sorted by variable name
    pub fn ordered(&self) -> Vec<(String, f64)> {
        let mut ordered: Vec<(String, f64)> = self
            .values
            .iter()
            .map(|(name, &value)| (name.clone(), value))
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_sorts_by_name() {
        let solution = Solution {
            value: 0.0,
            values: HashMap::from([
                ("c".to_string(), 7.0),
                ("a".to_string(), 6.0),
                ("b".to_string(), 3.0),
            ]),
        };

        assert_eq!(
            solution.ordered(),
            vec![
                ("a".to_string(), 6.0),
                ("b".to_string(), 3.0),
                ("c".to_string(), 7.0),
            ]
        );
        assert_eq!(solution.get("b"), Some(3.0));
        assert_eq!(solution.get("z"), None);
    }

    #[test]
    fn test_from_bindings_includes_offset() {
        let lp = Lp::new(Objective::minimize(vec![
            Term::var("a", 5.0),
            Term::var("c", 3.0),
            Term::constant(6.0),
            Term::var("a", 1.0),
        ]));
        let values = HashMap::from([("a".to_string(), 2.0), ("extra".to_string(), 100.0)]);

        let solution = Solution::from_bindings(&lp, values);

        // 6*2 + 3*0 + 6
        assert_eq!(solution.value, 18.0);
        assert_eq!(solution.get("extra"), Some(100.0));
        assert_eq!(solution.get("c"), None);
    }

    #[test]
    fn test_constraint_builders() {
        let c = Constraint::ge(vec![Term::var("x", 1.0)], vec![Term::constant(2.0)]);
        assert_eq!(c.comp, CompKind::Ge);
        assert_eq!(c.terms().filter_map(Term::name).collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(CompKind::Eq.token(), "=");
        assert_eq!(CompKind::Le.token(), "<=");
        assert_eq!(CompKind::Ge.token(), ">=");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_model() {
        let json = r#"{
            "objective": {
                "terms": [{"variable": {"name": "x", "coeff": 1.0}}, {"constant": 2.0}],
                "kind": "Maximize"
            },
            "constraints": [
                {"left": [{"variable": {"name": "x", "coeff": 1.0}}], "comp": "Le", "right": [{"constant": 4.0}]}
            ]
        }"#;

        let lp: Lp = serde_json::from_str(json).unwrap();

        assert_eq!(
            lp,
            Lp::new(Objective::maximize(vec![Term::var("x", 1.0), Term::constant(2.0)]))
                .subject_to(Constraint::le(vec![Term::var("x", 1.0)], vec![Term::constant(4.0)]))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_rejects_unknown_comparator() {
        let json = r#"{
            "objective": {"terms": [], "kind": "Minimize"},
            "constraints": [{"left": [], "comp": "GT", "right": []}]
        }"#;

        assert!(serde_json::from_str::<Lp>(json).is_err());
    }
}
