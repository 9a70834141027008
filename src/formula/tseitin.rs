//! # Tseitin Clause Generation
//!
//! The four clause contracts of a formula over a clause collection:
//!
//! - [`Formula::add_clauses`]: the formula holds
//! - [`Formula::add_clauses_if_implied_by`]: `l -> formula`
//! - [`Formula::add_clauses_if_implies`]: `formula -> l`
//! - [`Formula::add_clauses_def`]: `l <-> formula`
//!
//! Whenever a connective needs a non-atomic child as a single literal, it asks for
//! [`Formula::atom_for`]. The literal of a non-atomic formula is the variable named after the
//! canonical string of the formula, and its definition is added only the first time that name
//! enters the memory of the collection.

use tracing::trace;

use super::{ground_atom, Formula, FormulaKind};
use crate::{
    encodings::{emit, BoundedInteger},
    instances::{CollectClauses, ManageVars},
    params::Assignment,
    quantified::QuantifiedInteger,
    types::Lit,
    Error,
};

#[derive(Clone, Copy)]
enum Relation {
    Geq,
    Less,
    Equals,
    NotEquals,
}

/// Instantiates both sides of a comparison, adds their well-definedness clauses and the
/// clauses of the relation, each extended by the guard
fn compare(
    lhs: &QuantifiedInteger,
    rhs: &QuantifiedInteger,
    relation: Relation,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error> {
    let (a, b) = QuantifiedInteger::instantiate_pair(lhs, rhs, &Assignment::new(), var_manager)?;
    a.add_well_definedness(collector, var_manager)?;
    b.add_well_definedness(collector, var_manager)?;
    match relation {
        Relation::Geq => a.geq(&b, guard, collector, var_manager),
        Relation::Less => a.less(&b, guard, collector, var_manager),
        Relation::Equals => a.equals(&b, guard, collector, var_manager),
        Relation::NotEquals => a.not_equals(&b, guard, collector, var_manager),
    }
}

impl Formula {
    fn ensure_closed(&self) -> Result<(), Error> {
        if self.is_closed() {
            Ok(())
        } else {
            Err(Error::NotClosed {
                term: self.to_string(),
                operation: "encode",
            })
        }
    }

    /// Gets the literal of a formula that needs no definition: atoms and constants
    fn direct_lit(&self, var_manager: &dyn ManageVars) -> Result<Option<Lit>, Error> {
        Ok(match self.kind() {
            FormulaKind::Atom(atom) => Some(atom.lit()),
            FormulaKind::And(items) if items.is_empty() => Some(var_manager.truth_lit()),
            FormulaKind::Or(items) if items.is_empty() => Some(!var_manager.truth_lit()),
            FormulaKind::QuantifiedAtom {
                decl,
                args,
                negated,
            } if self.is_closed() => Some(ground_atom(decl, args, *negated)?.lit()),
            _ => None,
        })
    }

    fn tseitin_name(&self) -> String {
        format!("<{self}>")
    }

    /// Gets the literal standing for the formula without adding any clauses. For non-atomic
    /// formulas this is the Tseitin variable, which is only constrained once
    /// [`Formula::atom_for`] has been called for the formula on a collection.
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, [`Error::OutsideDomain`] if
    /// a quantified atom lies outside of its declaration.
    pub fn literal_for(&self, var_manager: &mut dyn ManageVars) -> Result<Lit, Error> {
        self.ensure_closed()?;
        if let Some(lit) = self.direct_lit(var_manager)? {
            return Ok(lit);
        }
        Ok(var_manager.named_var(&self.tseitin_name()).pos_atom().lit())
    }

    /// Gets a literal that is equivalent to the formula. For non-atomic formulas, the
    /// defining clauses are added the first time the formula is requested from the
    /// collection.
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, or an error of the
    /// definition.
    pub fn atom_for(
        &self,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Lit, Error> {
        self.ensure_closed()?;
        if let Some(lit) = self.direct_lit(var_manager)? {
            return Ok(lit);
        }
        let name = self.tseitin_name();
        let lit = var_manager.named_var(&name).pos_atom().lit();
        if collector.add_to_memory(name) {
            trace!(formula = %self, %lit, "introduced Tseitin atom");
            self.add_clauses_def(lit, collector, var_manager)?;
        }
        Ok(lit)
    }

    fn atoms_for(
        items: &[Formula],
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Vec<Lit>, Error> {
        items
            .iter()
            .map(|f| f.atom_for(collector, var_manager))
            .collect()
    }

    /// Adds clauses asserting the formula
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, or an instantiation error of
    /// an integer comparison.
    pub fn add_clauses(
        &self,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        self.ensure_closed()?;
        let truth = var_manager.truth_lit();
        match self.kind() {
            FormulaKind::Atom(_) | FormulaKind::QuantifiedAtom { .. } => {
                let lit = self.atom_for(collector, var_manager)?;
                emit(collector, truth, [lit]);
            }
            FormulaKind::And(items) => {
                for item in items {
                    item.add_clauses(collector, var_manager)?;
                }
            }
            FormulaKind::Or(items) => {
                let lits = Self::atoms_for(items, collector, var_manager)?;
                emit(collector, truth, lits);
            }
            FormulaKind::Implies(a, b) => {
                if let (None, Some(lb)) = (a.direct_lit(var_manager)?, b.direct_lit(var_manager)?)
                {
                    a.add_clauses_if_implies(lb, collector, var_manager)?;
                } else {
                    let la = a.atom_for(collector, var_manager)?;
                    b.add_clauses_if_implied_by(la, collector, var_manager)?;
                }
            }
            FormulaKind::Iff(a, b) => {
                let la = a.atom_for(collector, var_manager)?;
                b.add_clauses_def(la, collector, var_manager)?;
            }
            FormulaKind::Ite(c, t, e) => {
                let lc = c.atom_for(collector, var_manager)?;
                t.add_clauses_if_implied_by(lc, collector, var_manager)?;
                e.add_clauses_if_implied_by(!lc, collector, var_manager)?;
            }
            FormulaKind::Equals(a, b) => {
                compare(a, b, Relation::Equals, &[], collector, var_manager)?;
            }
            FormulaKind::NotEquals(a, b) => {
                compare(a, b, Relation::NotEquals, &[], collector, var_manager)?;
            }
            FormulaKind::Geq(a, b) => compare(a, b, Relation::Geq, &[], collector, var_manager)?,
            FormulaKind::Forall { .. } | FormulaKind::Exists { .. } => {
                self.translate()?.add_clauses(collector, var_manager)?;
            }
        }
        Ok(())
    }

    /// Adds clauses asserting `lit -> formula`
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, or an instantiation error of
    /// an integer comparison.
    pub fn add_clauses_if_implied_by(
        &self,
        lit: Lit,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        self.ensure_closed()?;
        let truth = var_manager.truth_lit();
        match self.kind() {
            FormulaKind::Atom(_) | FormulaKind::QuantifiedAtom { .. } => {
                let a = self.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lit, a]);
            }
            FormulaKind::And(items) => {
                for item in items {
                    item.add_clauses_if_implied_by(lit, collector, var_manager)?;
                }
            }
            FormulaKind::Or(items) => {
                let lits = Self::atoms_for(items, collector, var_manager)?;
                emit(collector, truth, std::iter::once(!lit).chain(lits));
            }
            FormulaKind::Implies(a, b) => {
                let la = a.atom_for(collector, var_manager)?;
                let lb = b.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lit, !la, lb]);
            }
            FormulaKind::Iff(a, b) => {
                let la = a.atom_for(collector, var_manager)?;
                let lb = b.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lit, !la, lb]);
                emit(collector, truth, [!lit, la, !lb]);
            }
            FormulaKind::Ite(c, t, e) => {
                let lc = c.atom_for(collector, var_manager)?;
                let lt = t.atom_for(collector, var_manager)?;
                let le = e.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lit, !lc, lt]);
                emit(collector, truth, [!lit, lc, le]);
                emit(collector, truth, [!lit, lt, le]);
            }
            FormulaKind::Equals(a, b) => {
                compare(a, b, Relation::Equals, &[!lit], collector, var_manager)?;
            }
            FormulaKind::NotEquals(a, b) => {
                compare(a, b, Relation::NotEquals, &[!lit], collector, var_manager)?;
            }
            FormulaKind::Geq(a, b) => {
                compare(a, b, Relation::Geq, &[!lit], collector, var_manager)?;
            }
            FormulaKind::Forall { .. } | FormulaKind::Exists { .. } => {
                self.translate()?
                    .add_clauses_if_implied_by(lit, collector, var_manager)?;
            }
        }
        Ok(())
    }

    /// Adds clauses asserting `formula -> lit`
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, or an instantiation error of
    /// an integer comparison.
    pub fn add_clauses_if_implies(
        &self,
        lit: Lit,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        self.ensure_closed()?;
        let truth = var_manager.truth_lit();
        match self.kind() {
            FormulaKind::Atom(_) | FormulaKind::QuantifiedAtom { .. } => {
                let a = self.atom_for(collector, var_manager)?;
                emit(collector, truth, [!a, lit]);
            }
            FormulaKind::And(items) => {
                let lits = Self::atoms_for(items, collector, var_manager)?;
                emit(
                    collector,
                    truth,
                    lits.into_iter().map(|l| !l).chain(std::iter::once(lit)),
                );
            }
            FormulaKind::Or(items) => {
                for item in items {
                    item.add_clauses_if_implies(lit, collector, var_manager)?;
                }
            }
            FormulaKind::Implies(a, b) => {
                let la = a.atom_for(collector, var_manager)?;
                emit(collector, truth, [la, lit]);
                b.add_clauses_if_implies(lit, collector, var_manager)?;
            }
            FormulaKind::Iff(a, b) => {
                let la = a.atom_for(collector, var_manager)?;
                let lb = b.atom_for(collector, var_manager)?;
                emit(collector, truth, [la, lb, lit]);
                emit(collector, truth, [!la, !lb, lit]);
            }
            FormulaKind::Ite(c, t, e) => {
                let lc = c.atom_for(collector, var_manager)?;
                let lt = t.atom_for(collector, var_manager)?;
                let le = e.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lc, !lt, lit]);
                emit(collector, truth, [lc, !le, lit]);
                emit(collector, truth, [!lt, !le, lit]);
            }
            // a >= b -> l  is  a < b | l
            FormulaKind::Geq(a, b) => {
                compare(a, b, Relation::Less, &[lit], collector, var_manager)?;
            }
            FormulaKind::Equals(a, b) => {
                compare(a, b, Relation::NotEquals, &[lit], collector, var_manager)?;
            }
            FormulaKind::NotEquals(a, b) => {
                compare(a, b, Relation::Equals, &[lit], collector, var_manager)?;
            }
            FormulaKind::Forall { .. } | FormulaKind::Exists { .. } => {
                self.translate()?
                    .add_clauses_if_implies(lit, collector, var_manager)?;
            }
        }
        Ok(())
    }

    /// Adds clauses asserting `lit <-> formula`
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, or an instantiation error of
    /// an integer comparison.
    pub fn add_clauses_def(
        &self,
        lit: Lit,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        self.ensure_closed()?;
        let truth = var_manager.truth_lit();
        match self.kind() {
            FormulaKind::Iff(a, b) => {
                let la = a.atom_for(collector, var_manager)?;
                let lb = b.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lit, !la, lb]);
                emit(collector, truth, [!lit, la, !lb]);
                emit(collector, truth, [lit, la, lb]);
                emit(collector, truth, [lit, !la, !lb]);
            }
            FormulaKind::Ite(c, t, e) => {
                let lc = c.atom_for(collector, var_manager)?;
                let lt = t.atom_for(collector, var_manager)?;
                let le = e.atom_for(collector, var_manager)?;
                emit(collector, truth, [!lit, !lc, lt]);
                emit(collector, truth, [!lit, lc, le]);
                emit(collector, truth, [!lit, lt, le]);
                emit(collector, truth, [lit, !lc, !lt]);
                emit(collector, truth, [lit, lc, !le]);
                emit(collector, truth, [lit, !lt, !le]);
            }
            FormulaKind::Forall { .. } | FormulaKind::Exists { .. } => {
                self.translate()?
                    .add_clauses_def(lit, collector, var_manager)?;
            }
            _ => {
                self.add_clauses_if_implied_by(lit, collector, var_manager)?;
                self.add_clauses_if_implies(lit, collector, var_manager)?;
            }
        }
        Ok(())
    }
}
