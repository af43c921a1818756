use std::collections::HashMap;

use crate::model::{Lp, Term};

/// Dense column positions for the variables of an [`Lp`].
///
/// Positions follow first sight: objective terms in order, then each
/// constraint's left terms and right terms, constraints in order. This order
/// fixes the column layout of every standard-form matrix built from the LP.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl NameIndex {
    pub fn from_lp(lp: &Lp) -> Self {
        let mut index = Self::default();
        let constraint_terms = lp.constraints.iter().flat_map(|c| c.terms());
        for term in lp.objective.terms.iter().chain(constraint_terms) {
            if let Term::Variable { name, .. } = term {
                index.insert(name);
            }
        }

        tracing::debug!(
            component = "index",
            operation = "from_lp",
            status = "success",
            num_variables = index.len(),
            "Indexed LP variables"
        );
        index
    }

    /// Build an index from an explicit column order. Repeated names keep
    /// their first position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for name in names {
            index.insert(name.as_ref());
        }
        index
    }

    fn insert(&mut self, name: &str) {
        if !self.positions.contains_key(name) {
            self.positions.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
