//! # Common Types for Clause Generation
//!
//! Common types used throughout the library to guarantee type safety.

use std::{fmt, ops, rc::Rc};

pub mod constraints;
pub use constraints::Clause;

/// The hash map to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
/// The hash map to use throughout the library
#[cfg(not(feature = "fxhash"))]
pub type RsHashMap<K, V> = std::collections::HashMap<K, V>;

/// The hash set to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashSet<V> = rustc_hash::FxHashSet<V>;
/// The hash set to use throughout the library
#[cfg(not(feature = "fxhash"))]
pub type RsHashSet<V> = std::collections::HashSet<V>;

/// Type representing boolean variables in a SAT problem. Variables indexing
/// starts from 0 and the maximum index is `(u32::MAX - 1) / 2`. This is
/// because literals are represented as a single `u32` as well.
#[derive(Hash, Eq, PartialEq, PartialOrd, Clone, Copy, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Var {
    idx: u32,
}

impl Var {
    /// The maximum index that can be represented.
    pub const MAX_IDX: u32 = (u32::MAX - 1) / 2;

    /// Creates a new variables with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32) -> Var {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Var { idx }
    }

    /// Creates a literal that is not negated.
    #[inline]
    #[must_use]
    pub fn pos_lit(self) -> Lit {
        Lit::new(self.idx, false)
    }

    /// Creates a negated literal.
    #[inline]
    #[must_use]
    pub fn neg_lit(self) -> Lit {
        Lit::new(self.idx, true)
    }

    /// Returns the index of the variable as a `usize`
    #[inline]
    #[must_use]
    pub fn idx(self) -> usize {
        self.idx as usize
    }

    /// Returns the 32 bit index of the variable.
    #[inline]
    #[must_use]
    pub fn idx32(self) -> u32 {
        self.idx
    }

    /// Converts the variable to its DIMACS index, which is `idx+1`
    #[must_use]
    pub fn to_dimacs(self) -> u32 {
        self.idx + 1
    }
}

/// Incrementing variables
impl ops::Add<u32> for Var {
    type Output = Var;

    fn add(self, rhs: u32) -> Self::Output {
        Var::new(self.idx + rhs)
    }
}

impl ops::AddAssign<u32> for Var {
    fn add_assign(&mut self, rhs: u32) {
        *self = *self + rhs;
    }
}

/// Variables can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.idx)
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use paramsat::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
///
/// The literal is stored as `2 * var_idx + negated`, so that negation is a single XOR.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Lit {
    lidx: u32,
}

impl Lit {
    /// Creates a new (negated or not) literal with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32, negated: bool) -> Lit {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Lit {
            lidx: (idx << 1) + u32::from(negated),
        }
    }

    /// Creates a new positive literal with a given index.
    #[inline]
    #[must_use]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given index.
    #[inline]
    #[must_use]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Gets the variable index of the literal
    #[inline]
    #[must_use]
    pub fn vidx(self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the variable that the literal corresponds to.
    #[inline]
    #[must_use]
    pub fn var(self) -> Var {
        Var::new(self.lidx >> 1)
    }

    /// True if the literal is positive.
    #[inline]
    #[must_use]
    pub fn is_pos(self) -> bool {
        (self.lidx & 1) == 0
    }

    /// True if the literal is negated.
    #[inline]
    #[must_use]
    pub fn is_neg(self) -> bool {
        (self.lidx & 1) == 1
    }

    /// Converts the literal to an integer as used in DIMACS files
    ///
    /// # Panics
    ///
    /// If the variable index does not fit in an `i64`, which cannot happen for valid indices.
    #[must_use]
    pub fn to_dimacs(self) -> i64 {
        let idx = i64::from(self.var().to_dimacs());
        if self.is_neg() {
            -idx
        } else {
            idx
        }
    }
}

/// Trait implementation allowing for negating literals with the `!` operator.
impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Literals can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neg() {
            write!(f, "~x{}", self.vidx())
        } else {
            write!(f, "x{}", self.vidx())
        }
    }
}

/// More easily creates literals. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use paramsat::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(!lit![42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::positive($l)
    };
}

/// A propositional variable together with the name it was registered under
///
/// Two variables are the same exactly if they have the same name, since names are
/// deduplicated by the [`ManageVars`](crate::instances::ManageVars) registry that hands out
/// variables. Comparison and hashing therefore only look at the index.
#[derive(Clone, Debug)]
pub struct Variable {
    var: Var,
    name: Rc<str>,
}

impl Variable {
    pub(crate) fn new(var: Var, name: Rc<str>) -> Self {
        Variable { var, name }
    }

    /// Gets the underlying index variable
    #[inline]
    #[must_use]
    pub fn var(&self) -> Var {
        self.var
    }

    /// Gets the name of the variable
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the positive atom of this variable
    #[must_use]
    pub fn pos_atom(&self) -> Atom {
        Atom {
            variable: self.clone(),
            negated: false,
        }
    }

    /// Gets the negated atom of this variable
    #[must_use]
    pub fn neg_atom(&self) -> Atom {
        Atom {
            variable: self.clone(),
            negated: true,
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.var == other.var
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.var.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A named literal: a [`Variable`] with a polarity
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Atom {
    variable: Variable,
    negated: bool,
}

impl Atom {
    /// Gets the variable of the atom
    #[must_use]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// Checks whether the atom is negated
    #[must_use]
    pub fn is_neg(&self) -> bool {
        self.negated
    }

    /// Gets the literal that the atom corresponds to
    #[inline]
    #[must_use]
    pub fn lit(&self) -> Lit {
        Lit::new(self.variable.var.idx32(), self.negated)
    }
}

impl ops::Not for Atom {
    type Output = Atom;

    fn not(self) -> Atom {
        Atom {
            variable: self.variable,
            negated: !self.negated,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~{}", self.variable)
        } else {
            write!(f, "{}", self.variable)
        }
    }
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Formula is satisfied, no matter the assignment.
    #[default]
    DontCare,
}

impl TernaryVal {
    /// Converts a [`TernaryVal`] to a bool with a default value for "don't cares"
    #[must_use]
    pub fn to_bool_with_def(self, def: bool) -> bool {
        match self {
            TernaryVal::True => true,
            TernaryVal::False => false,
            TernaryVal::DontCare => def,
        }
    }
}

/// Ternary values can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            TernaryVal::True
        } else {
            TernaryVal::False
        }
    }
}

impl ops::Not for TernaryVal {
    type Output = TernaryVal;

    fn not(self) -> TernaryVal {
        match self {
            TernaryVal::True => TernaryVal::False,
            TernaryVal::False => TernaryVal::True,
            TernaryVal::DontCare => TernaryVal::DontCare,
        }
    }
}

/// Type representing a (partial) assignment of values to variables, as returned by a
/// solver or fixed by a test harness.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Solution {
    assignment: Vec<TernaryVal>,
}

impl Solution {
    /// Gets the value that the solution assigns to a variable.
    /// If the variable is not included in the solution, will return `TernaryVal::DontCare`.
    #[must_use]
    pub fn var_value(&self, var: Var) -> TernaryVal {
        self.assignment
            .get(var.idx())
            .copied()
            .unwrap_or(TernaryVal::DontCare)
    }

    /// Same as [`Solution::var_value`], but for literals.
    #[must_use]
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        if lit.is_neg() {
            !self.var_value(lit.var())
        } else {
            self.var_value(lit.var())
        }
    }

    /// Assigns a value to a variable, growing the solution if needed
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() <= var.idx() {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assign_var(lit.var(), TernaryVal::from(lit.is_pos()));
    }

    /// Forces a named variable to a value. Only meant for test harnesses.
    pub fn force(&mut self, variable: &Variable, val: bool) {
        self.assign_var(variable.var(), TernaryVal::from(val));
    }

    /// Gets the number of variables covered by the solution
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    /// Checks whether the solution is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment.iter().try_for_each(|tv| write!(f, "{tv}"))
    }
}

impl FromIterator<Lit> for Solution {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut sol = Solution::default();
        iter.into_iter().for_each(|l| sol.assign_lit(l));
        sol
    }
}

impl From<Vec<TernaryVal>> for Solution {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}
