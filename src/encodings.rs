//! # Bounded Integer Encodings
//!
//! Two CNF encodings of integers with a known range:
//!
//! - [`range::RangeInteger`]: the order encoding, one variable `x>=i` per value of the range
//! - [`binary::BinaryInteger`]: the two's-complement encoding, a bit vector with a sign bit
//!
//! Both encodings are built from variables, constants, sums, shifts and conditionals. The
//! nodes of an integer are immutable and shared. Clauses that restrict the encoding to
//! legal values (the _well-definedness_ clauses) are emitted lazily and only once per node,
//! keyed by the canonical string of the node in the memory of the clause collection.
//!
//! The two encodings cannot be mixed in one comparison or sum. [`Integer`] is the tagged
//! union used by the formula layer, dispatching comparisons to the shared encoding.

use std::{fmt, rc::Rc};

use tracing::trace;

use crate::{
    clause,
    instances::{CollectClauses, ManageVars},
    types::{Clause, Lit, Solution, TernaryVal},
    Error,
};

pub mod atomics;
pub mod binary;
pub mod range;

use binary::BinaryInteger;
use range::RangeInteger;

/// Common interface of ground bounded integers
pub trait BoundedInteger: fmt::Display {
    /// Gets the smallest value the integer can take
    fn min(&self) -> i64;

    /// Gets the largest value the integer can take
    fn max(&self) -> i64;

    /// Adds the clauses that restrict the encoding of the integer to legal values. Clauses
    /// of shared nodes are only added the first time they are requested from a collection.
    ///
    /// # Errors
    ///
    /// If a deferred definition of a condition fails.
    fn add_well_definedness(
        &self,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>;

    /// Decodes the value of the integer from a solution. Returns [`None`] if a variable of
    /// the encoding is not assigned.
    fn value(&self, solution: &Solution) -> Option<i64>;
}

/// The available integer encodings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Order encoding
    #[default]
    Range,
    /// Two's-complement encoding
    Binary,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Range => write!(f, "range"),
            Encoding::Binary => write!(f, "binary"),
        }
    }
}

/// Adds a clause after simplifying it with respect to the truth constant. Clauses
/// containing the truth constant are dropped, the false constant is removed from clauses.
/// A clause that only consists of false literals is added as the single false clause.
pub(crate) fn emit<I>(collector: &mut dyn CollectClauses, truth: Lit, lits: I)
where
    I: IntoIterator<Item = Lit>,
{
    let mut cl = Clause::new();
    for lit in lits {
        if lit == truth {
            return;
        }
        if lit != !truth {
            cl.add(lit);
        }
    }
    match cl.sanitize() {
        None => (),
        Some(cl) if cl.is_empty() => collector.add_clause(clause![!truth]),
        Some(cl) => collector.add_clause(cl),
    }
}

/// Reads the value of a literal from a solution, treating the truth constant as assigned
pub(crate) fn lit_value(solution: &Solution, truth: Lit, lit: Lit) -> Option<bool> {
    if lit == truth {
        return Some(true);
    }
    if lit == !truth {
        return Some(false);
    }
    match solution.lit_value(lit) {
        TernaryVal::True => Some(true),
        TernaryVal::False => Some(false),
        TernaryVal::DontCare => None,
    }
}

/// Marks a key as emitted in the memory of the collection. Returns `true` if the clauses
/// belonging to the key still need to be added.
pub(crate) fn first_request(collector: &mut dyn CollectClauses, key: String) -> bool {
    if collector.add_to_memory(key.clone()) {
        trace!(%key, "emitting memoized clauses");
        true
    } else {
        false
    }
}

/// Type of the clause adders stored in [`Deferred`]
pub type AddClauses = dyn Fn(&mut dyn CollectClauses, &mut dyn ManageVars) -> Result<(), Error>;

/// Clauses whose emission is deferred until they are first needed, at most once per
/// collection
#[derive(Clone)]
pub struct Deferred {
    key: String,
    adder: Rc<AddClauses>,
}

impl Deferred {
    /// Creates a deferred clause adder remembered under the given key
    pub fn new<F>(key: impl Into<String>, adder: F) -> Self
    where
        F: Fn(&mut dyn CollectClauses, &mut dyn ManageVars) -> Result<(), Error> + 'static,
    {
        Self {
            key: key.into(),
            adder: Rc::new(adder),
        }
    }

    /// Gets the memory key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds the clauses unless they were added to this collection before
    ///
    /// # Errors
    ///
    /// If the adder fails.
    pub fn add_once(
        &self,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        if self.key.is_empty() || !first_request(collector, format!("deferred:{}", self.key)) {
            return Ok(());
        }
        (self.adder)(collector, var_manager)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("key", &self.key).finish()
    }
}

/// A ground integer in one of the two encodings
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Integer {
    /// Order encoded integer
    Range(RangeInteger),
    /// Two's-complement encoded integer
    Binary(BinaryInteger),
}

impl Integer {
    /// Gets the encoding of the integer
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        match self {
            Integer::Range(_) => Encoding::Range,
            Integer::Binary(_) => Encoding::Binary,
        }
    }

    /// Gets the order encoded integer, if the integer is order encoded
    #[must_use]
    pub fn as_range(&self) -> Option<&RangeInteger> {
        match self {
            Integer::Range(int) => Some(int),
            Integer::Binary(_) => None,
        }
    }

    /// Gets the two's-complement encoded integer, if the integer is binary encoded
    #[must_use]
    pub fn as_binary(&self) -> Option<&BinaryInteger> {
        match self {
            Integer::Range(_) => None,
            Integer::Binary(int) => Some(int),
        }
    }

    fn incompatible(&self, other: &Integer) -> Error {
        Error::IncompatibleEncodings {
            lhs: self.to_string(),
            rhs: other.to_string(),
        }
    }

    /// Adds clauses enforcing `self >= other`, each extended by the guard literals
    ///
    /// # Errors
    ///
    /// [`Error::IncompatibleEncodings`] if the two integers use different encodings.
    pub fn geq(
        &self,
        other: &Integer,
        guard: &[Lit],
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        match (self, other) {
            (Integer::Range(a), Integer::Range(b)) => {
                range::geq(a, b, guard, collector);
                Ok(())
            }
            (Integer::Binary(a), Integer::Binary(b)) => {
                binary::geq(a, b, guard, collector, var_manager);
                Ok(())
            }
            _ => Err(self.incompatible(other)),
        }
    }

    /// Adds clauses enforcing `self < other`, each extended by the guard literals
    ///
    /// # Errors
    ///
    /// [`Error::IncompatibleEncodings`] if the two integers use different encodings.
    pub fn less(
        &self,
        other: &Integer,
        guard: &[Lit],
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        match (self, other) {
            (Integer::Range(a), Integer::Range(b)) => {
                range::less(a, b, guard, collector);
                Ok(())
            }
            (Integer::Binary(a), Integer::Binary(b)) => {
                binary::less(a, b, guard, collector, var_manager);
                Ok(())
            }
            _ => Err(self.incompatible(other)),
        }
    }

    /// Adds clauses enforcing `self = other`, each extended by the guard literals
    ///
    /// # Errors
    ///
    /// [`Error::IncompatibleEncodings`] if the two integers use different encodings.
    pub fn equals(
        &self,
        other: &Integer,
        guard: &[Lit],
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        match (self, other) {
            (Integer::Range(a), Integer::Range(b)) => {
                range::equals(a, b, guard, collector);
                Ok(())
            }
            (Integer::Binary(a), Integer::Binary(b)) => {
                binary::equals(a, b, guard, collector, var_manager);
                Ok(())
            }
            _ => Err(self.incompatible(other)),
        }
    }

    /// Adds clauses enforcing `self != other`, each extended by the guard literals
    ///
    /// # Errors
    ///
    /// [`Error::IncompatibleEncodings`] if the two integers use different encodings.
    pub fn not_equals(
        &self,
        other: &Integer,
        guard: &[Lit],
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        match (self, other) {
            (Integer::Range(a), Integer::Range(b)) => {
                range::not_equals(a, b, guard, collector);
                Ok(())
            }
            (Integer::Binary(a), Integer::Binary(b)) => {
                binary::not_equals(a, b, guard, collector, var_manager);
                Ok(())
            }
            _ => Err(self.incompatible(other)),
        }
    }
}

impl BoundedInteger for Integer {
    fn min(&self) -> i64 {
        match self {
            Integer::Range(int) => int.min(),
            Integer::Binary(int) => int.min(),
        }
    }

    fn max(&self) -> i64 {
        match self {
            Integer::Range(int) => int.max(),
            Integer::Binary(int) => int.max(),
        }
    }

    fn add_well_definedness(
        &self,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        match self {
            Integer::Range(int) => int.add_well_definedness(collector, var_manager),
            Integer::Binary(int) => int.add_well_definedness(collector, var_manager),
        }
    }

    fn value(&self, solution: &Solution) -> Option<i64> {
        match self {
            Integer::Range(int) => int.value(solution),
            Integer::Binary(int) => int.value(solution),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Range(int) => write!(f, "{int}"),
            Integer::Binary(int) => write!(f, "{int}"),
        }
    }
}

impl From<RangeInteger> for Integer {
    fn from(int: RangeInteger) -> Self {
        Integer::Range(int)
    }
}

impl From<BinaryInteger> for Integer {
    fn from(int: BinaryInteger) -> Self {
        Integer::Binary(int)
    }
}

#[cfg(test)]
mod tests {
    use super::{emit, Deferred};
    use crate::{
        clause,
        instances::{ClauseCollection, CollectClauses, ManageVars, VarManager},
        lit,
    };

    #[test]
    fn emit_simplifies_constants() {
        let mut vm = VarManager::new();
        let truth = vm.truth_lit();
        let a = vm.named_var("a").pos_atom().lit();
        let mut col = ClauseCollection::new(&vm);
        emit(&mut col, truth, [a, truth]);
        assert_eq!(col.n_clauses(), 1);
        emit(&mut col, truth, [a, !truth]);
        assert_eq!(col.iter().last(), Some(&clause![a]));
        emit(&mut col, truth, [!truth, !truth]);
        assert_eq!(col.iter().last(), Some(&clause![!truth]));
        emit(&mut col, truth, [a, !a]);
        assert_eq!(col.n_clauses(), 3);
    }

    #[test]
    fn deferred_once() {
        let mut vm = VarManager::new();
        let mut col = ClauseCollection::new(&vm);
        let def = Deferred::new("d", |col, _| {
            col.add_clause(clause![lit![0]]);
            Ok(())
        });
        def.add_once(&mut col, &mut vm).unwrap();
        def.clone().add_once(&mut col, &mut vm).unwrap();
        assert_eq!(col.n_clauses(), 2);
        assert!(col.is_in_memory("deferred:d"));
    }
}
