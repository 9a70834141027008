//! # Clause Collections and Variable Registries
//!
//! The two pieces of mutable state that a compilation pass writes to: a registry handing out
//! variables by name ([`ManageVars`]), and a sink for the produced clauses that also
//! remembers which shared definitions have already been emitted ([`CollectClauses`]).

use std::{rc::Rc, slice::Iter, vec::IntoIter};

use crate::{
    clause,
    types::{Atom, Clause, Lit, RsHashMap, RsHashSet, Var, Variable},
    Error,
};

pub mod dimacs;

/// The name of the designated truth constant
pub const TRUTH_NAME: &str = "TRUE";

/// Trait for variable managers keeping track of used variables
///
/// Variables are identified by their names: requesting the same name twice yields the same
/// variable. Every manager carries a designated truth constant, whose negation serves as the
/// false constant.
pub trait ManageVars {
    /// Uses up the next free variable under the given name, or returns the variable already
    /// registered under that name
    fn named_var(&mut self, name: &str) -> Variable;
    /// Looks up a variable by its name without registering it
    fn lookup(&self, name: &str) -> Option<Variable>;
    /// Registers a new variable that belongs to a declaration.
    ///
    /// # Errors
    ///
    /// [`Error::Redeclaration`] if a variable with this name is already registered.
    fn fresh_var(&mut self, name: &str) -> Result<Variable, Error> {
        if self.lookup(name).is_some() {
            return Err(Error::Redeclaration(name.to_string()));
        }
        Ok(self.named_var(name))
    }
    /// Gets the name of a variable, if it is managed by this manager
    fn name_of(&self, var: Var) -> Option<&str>;
    /// Gets the designated truth constant
    fn truth(&self) -> Atom;
    /// Marks a declaration name as used.
    ///
    /// # Errors
    ///
    /// [`Error::Redeclaration`] if the name was declared before or already names a
    /// variable, such as the truth constant.
    fn declare(&mut self, name: &str) -> Result<(), Error>;
    /// Gets the number of used variables. Typically this is just the index of
    /// the next free variable.
    fn n_used(&self) -> u32;
    /// Gets the used variable with the highest index
    fn max_var(&self) -> Option<Var> {
        match self.n_used() {
            0 => None,
            n => Some(Var::new(n - 1)),
        }
    }
    /// Gets the literal of the truth constant
    fn truth_lit(&self) -> Lit {
        self.truth().lit()
    }
}

/// Manager mapping variable names to variables
///
/// Variable `0` is always the truth constant named [`TRUTH_NAME`].
#[derive(Debug, PartialEq, Eq)]
pub struct VarManager {
    next_var: Var,
    names: Vec<Rc<str>>,
    name_map: RsHashMap<Rc<str>, Var>,
    declared: RsHashSet<String>,
}

impl VarManager {
    /// Creates a new variable manager that only contains the truth constant
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self {
            next_var: Var::new(0),
            names: Vec::new(),
            name_map: RsHashMap::default(),
            declared: RsHashSet::default(),
        };
        manager.named_var(TRUTH_NAME);
        manager
    }

    /// Gets an iterator over all registered variables in index order
    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| Variable::new(Var::new(idx as u32), Rc::clone(name)))
    }
}

impl Default for VarManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ManageVars for VarManager {
    fn named_var(&mut self, name: &str) -> Variable {
        if let Some(var) = self.name_map.get(name) {
            return Variable::new(*var, Rc::clone(&self.names[var.idx()]));
        }
        let var = self.next_var;
        self.next_var += 1;
        let name: Rc<str> = Rc::from(name);
        self.names.push(Rc::clone(&name));
        self.name_map.insert(Rc::clone(&name), var);
        tracing::trace!(%name, %var, "registered variable");
        Variable::new(var, name)
    }

    fn lookup(&self, name: &str) -> Option<Variable> {
        self.name_map
            .get(name)
            .map(|var| Variable::new(*var, Rc::clone(&self.names[var.idx()])))
    }

    fn name_of(&self, var: Var) -> Option<&str> {
        self.names.get(var.idx()).map(AsRef::as_ref)
    }

    fn truth(&self) -> Atom {
        Variable::new(Var::new(0), Rc::clone(&self.names[0])).pos_atom()
    }

    fn declare(&mut self, name: &str) -> Result<(), Error> {
        if self.name_map.contains_key(name) || !self.declared.insert(name.to_string()) {
            return Err(Error::Redeclaration(name.to_string()));
        }
        Ok(())
    }

    fn n_used(&self) -> u32 {
        self.next_var.idx32()
    }
}

/// Trait for collecting clauses. This is the only interface through which the compiler
/// emits its output.
///
/// Besides the clauses, a collection keeps a memory of string keys. The compiler uses it to
/// emit the definition of a shared subterm only once, no matter how often it is referenced.
pub trait CollectClauses {
    /// Adds a clause to the collection
    fn add_clause(&mut self, clause: Clause);
    /// Gets the number of clauses in the collection
    fn n_clauses(&self) -> usize;
    /// Checks whether a key has been remembered
    fn is_in_memory(&self, key: &str) -> bool;
    /// Remembers a key. Returns `true` if the key was not remembered before.
    ///
    /// Checking and inserting happen in one step, so callers should use the return value
    /// instead of a separate [`CollectClauses::is_in_memory`] call.
    fn add_to_memory(&mut self, key: String) -> bool;
}

/// Simple type representing a CNF formula. Other than [`ClauseCollection`], this
/// type only supports clauses and has no memory.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cnf {
    clauses: Vec<Clause>,
}

impl Cnf {
    /// Creates a new [`Cnf`]
    #[must_use]
    pub fn new() -> Cnf {
        Cnf::default()
    }

    /// Adds a clause to the CNF
    #[inline]
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Adds a unit clause to the CNF
    pub fn add_unit(&mut self, unit: Lit) {
        self.add_clause(clause![unit]);
    }

    /// Checks if the CNF is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the number of clauses in the instance
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns an iterator over references to the clauses
    pub fn iter(&self) -> Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Gets the highest variable index used in any clause
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        self.clauses
            .iter()
            .flat_map(|cl| cl.iter().map(|l| l.var()))
            .max()
    }
}

impl IntoIterator for Cnf {
    type Item = Clause;

    type IntoIter = IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cnf {
    type Item = &'a Clause;

    type IntoIter = Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl Extend<Clause> for Cnf {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        self.clauses.extend(iter);
    }
}

/// The clause sink handed to a compilation pass
///
/// Accumulates monotonically, clauses are never removed.
#[derive(Clone, Debug, Default)]
pub struct ClauseCollection {
    cnf: Cnf,
    memory: RsHashSet<String>,
}

impl ClauseCollection {
    /// Creates a new collection asserting the truth constant of the given variable manager
    pub fn new(var_manager: &dyn ManageVars) -> Self {
        let mut cnf = Cnf::new();
        cnf.add_unit(var_manager.truth_lit());
        ClauseCollection {
            cnf,
            memory: RsHashSet::default(),
        }
    }

    /// Gets the collected clauses
    #[must_use]
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Gets the number of remembered keys
    #[must_use]
    pub fn n_memorized(&self) -> usize {
        self.memory.len()
    }

    /// Returns an iterator over the collected clauses
    pub fn iter(&self) -> Iter<'_, Clause> {
        self.cnf.iter()
    }

    /// Converts the collection into its clauses
    #[must_use]
    pub fn into_cnf(self) -> Cnf {
        self.cnf
    }
}

impl CollectClauses for ClauseCollection {
    fn add_clause(&mut self, clause: Clause) {
        debug_assert!(!clause.is_empty(), "clauses must not be empty");
        self.cnf.add_clause(clause);
    }

    fn n_clauses(&self) -> usize {
        self.cnf.len()
    }

    fn is_in_memory(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    fn add_to_memory(&mut self, key: String) -> bool {
        self.memory.insert(key)
    }
}
