//! # Parameter Algebra
//!
//! Integer parameters index parametrized variables and are bound by quantifiers. This module
//! contains expressions ([`PExpr`]) and constraints ([`PConstraint`]) over parameters,
//! ordered parameter declarations ([`ParameterList`]) and the [`ParamTree`] that maps every
//! admissible parameter assignment of a declaration to a stored value.
//!
//! Expressions and constraints are immutable. Substitution builds new trees and simplifies
//! them locally so that repeated instantiation does not grow them.

use std::{collections::BTreeMap, fmt, rc::Rc};

use itertools::Itertools;

mod constraint;
mod expr;
mod list;
mod tree;

pub use constraint::{CmpOp, PConstraint};
pub use expr::{PExpr, ParamFunction};
pub use list::{Parameter, ParameterList};
pub use tree::ParamTree;

/// The set of free parameter names of a term
pub type ParamSet = std::collections::BTreeSet<Rc<str>>;

/// Values bound to parameter names
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<Rc<str>, i64>,
}

impl Assignment {
    /// Creates an empty assignment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a parameter, replacing a previous value
    pub fn insert(&mut self, name: impl Into<Rc<str>>, value: i64) {
        self.values.insert(name.into(), value);
    }

    /// Returns a copy of the assignment with one more binding
    #[must_use]
    pub fn with(&self, name: impl Into<Rc<str>>, value: i64) -> Self {
        let mut extended = self.clone();
        extended.insert(name, value);
        extended
    }

    /// Gets the value of a parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Checks whether a parameter is bound
    #[must_use]
    pub fn binds(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Gets the number of bound parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether no parameter is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(n, v)| (n.as_ref(), *v))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.values
                .iter()
                .format_with(", ", |(n, v), f| f(&format_args!("{n}={v}")))
        )
    }
}

impl<N: Into<Rc<str>>> FromIterator<(N, i64)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (N, i64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

/// Expressions replacing parameter names
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: BTreeMap<Rc<str>, PExpr>,
}

impl Substitution {
    /// Creates an empty substitution
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a replacement for a parameter
    pub fn insert(&mut self, name: impl Into<Rc<str>>, expr: PExpr) {
        self.map.insert(name.into(), expr);
    }

    /// Gets the replacement of a parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PExpr> {
        self.map.get(name)
    }

    /// Checks whether the substitution replaces nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns a copy of the substitution that leaves `name` untouched. Used when descending
    /// below a binder of `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        if !self.map.contains_key(name) {
            return self.clone();
        }
        let mut map = self.map.clone();
        map.remove(name);
        Self { map }
    }
}

impl From<&Assignment> for Substitution {
    fn from(assignment: &Assignment) -> Self {
        Self {
            map: assignment
                .values
                .iter()
                .map(|(n, v)| (Rc::clone(n), PExpr::constant(*v)))
                .collect(),
        }
    }
}

impl<N: Into<Rc<str>>> FromIterator<(N, PExpr)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (N, PExpr)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().map(|(n, e)| (n.into(), e)).collect(),
        }
    }
}
