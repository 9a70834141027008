//! # Boolean Formulas
//!
//! The immutable formula tree over atoms, integer comparisons and parametrized atoms, with
//! quantifiers over parameters. Nodes are shared through reference counting, every node
//! knows its free parameters from construction on and renders to a canonical string that is
//! computed once. The canonical string identifies the formula: two formulas with the same
//! string share their Tseitin variable.
//!
//! Clause generation lives in the [`tseitin`] module.

use std::{cell::OnceCell, fmt, ops, rc::Rc};

use itertools::Itertools;
use tracing::debug;

use crate::{
    params::{Assignment, PExpr, ParamSet, Parameter, Substitution},
    quantified::{BoolVarDecl, QuantifiedInteger},
    types::{Atom, Solution, TernaryVal, Variable},
    Error,
};

mod tseitin;

/// The variants of a formula node
#[derive(Clone, Debug)]
pub enum FormulaKind {
    /// A propositional literal
    Atom(Atom),
    /// Conjunction, the empty conjunction is the true constant
    And(Vec<Formula>),
    /// Disjunction, the empty disjunction is the false constant
    Or(Vec<Formula>),
    /// `lhs -> rhs`
    Implies(Formula, Formula),
    /// `lhs <-> rhs`
    Iff(Formula, Formula),
    /// `cond ? then : else`
    Ite(Formula, Formula, Formula),
    /// `lhs = rhs`
    Equals(QuantifiedInteger, QuantifiedInteger),
    /// `lhs != rhs`
    NotEquals(QuantifiedInteger, QuantifiedInteger),
    /// `lhs >= rhs`
    Geq(QuantifiedInteger, QuantifiedInteger),
    /// A parametrized boolean variable indexed by expressions with free parameters
    QuantifiedAtom {
        /// The declaration
        decl: Rc<BoolVarDecl>,
        /// One index expression per parameter of the declaration
        args: Vec<PExpr>,
        /// Whether the atom is negated
        negated: bool,
    },
    /// Conjunction of the body over all values of the parameter
    Forall {
        /// The bound parameter
        param: Parameter,
        /// The body
        body: Formula,
    },
    /// Disjunction of the body over all values of the parameter
    Exists {
        /// The bound parameter
        param: Parameter,
        /// The body
        body: Formula,
    },
}

struct FormulaNode {
    kind: FormulaKind,
    params: ParamSet,
    repr: OnceCell<String>,
}

/// An immutable, cheaply clonable boolean formula
#[derive(Clone)]
pub struct Formula(Rc<FormulaNode>);

impl Formula {
    fn new(kind: FormulaKind) -> Self {
        let mut params = ParamSet::new();
        match &kind {
            FormulaKind::Atom(_) => (),
            FormulaKind::And(items) | FormulaKind::Or(items) => {
                items
                    .iter()
                    .for_each(|f| params.extend(f.params().iter().cloned()));
            }
            FormulaKind::Implies(a, b) | FormulaKind::Iff(a, b) => {
                params.extend(a.params().iter().cloned());
                params.extend(b.params().iter().cloned());
            }
            FormulaKind::Ite(c, t, e) => {
                for f in [c, t, e] {
                    params.extend(f.params().iter().cloned());
                }
            }
            FormulaKind::Equals(a, b) | FormulaKind::NotEquals(a, b) | FormulaKind::Geq(a, b) => {
                a.collect_params(&mut params);
                b.collect_params(&mut params);
            }
            FormulaKind::QuantifiedAtom { args, .. } => {
                args.iter().for_each(|a| a.collect_params(&mut params));
            }
            FormulaKind::Forall { param, body } | FormulaKind::Exists { param, body } => {
                params.extend(
                    body.params()
                        .iter()
                        .filter(|&p| &**p != param.name())
                        .cloned(),
                );
                params.extend(param.free_params());
            }
        }
        Formula(Rc::new(FormulaNode {
            kind,
            params,
            repr: OnceCell::new(),
        }))
    }

    /// A formula consisting of a single atom
    #[must_use]
    pub fn atom(atom: Atom) -> Self {
        Self::new(FormulaKind::Atom(atom))
    }

    /// The positive atom of a variable
    #[must_use]
    pub fn var(var: &Variable) -> Self {
        Self::atom(var.pos_atom())
    }

    /// The true or the false constant
    #[must_use]
    pub fn constant(value: bool) -> Self {
        if value {
            Self::new(FormulaKind::And(vec![]))
        } else {
            Self::new(FormulaKind::Or(vec![]))
        }
    }

    /// Conjunction of formulas. Nested conjunctions are flattened, a single formula is
    /// returned as is.
    #[must_use]
    pub fn and(items: Vec<Formula>) -> Self {
        Self::junction(items, true)
    }

    /// Disjunction of formulas. Nested disjunctions are flattened, a single formula is
    /// returned as is.
    #[must_use]
    pub fn or(items: Vec<Formula>) -> Self {
        Self::junction(items, false)
    }

    fn junction(items: Vec<Formula>, conjunction: bool) -> Self {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            let (same, absorbing) = match item.kind() {
                FormulaKind::And(sub) => (conjunction, !conjunction && sub.is_empty()),
                FormulaKind::Or(sub) => (!conjunction, conjunction && sub.is_empty()),
                _ => (false, false),
            };
            if absorbing {
                return item;
            }
            match item.kind() {
                FormulaKind::And(sub) | FormulaKind::Or(sub) if same => {
                    flat.extend(sub.iter().cloned());
                }
                _ => flat.push(item),
            }
        }
        if flat.len() == 1 {
            if let Some(single) = flat.pop() {
                return single;
            }
        }
        Self::new(if conjunction {
            FormulaKind::And(flat)
        } else {
            FormulaKind::Or(flat)
        })
    }

    /// `lhs -> rhs`
    #[must_use]
    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Self::new(FormulaKind::Implies(lhs, rhs))
    }

    /// `lhs <-> rhs`
    #[must_use]
    pub fn iff(lhs: Formula, rhs: Formula) -> Self {
        Self::new(FormulaKind::Iff(lhs, rhs))
    }

    /// `cond ? then : other`
    #[must_use]
    pub fn ite(cond: Formula, then: Formula, other: Formula) -> Self {
        Self::new(FormulaKind::Ite(cond, then, other))
    }

    /// `lhs = rhs`
    pub fn equals(lhs: impl Into<QuantifiedInteger>, rhs: impl Into<QuantifiedInteger>) -> Self {
        Self::new(FormulaKind::Equals(lhs.into(), rhs.into()))
    }

    /// `lhs != rhs`
    pub fn not_equals(
        lhs: impl Into<QuantifiedInteger>,
        rhs: impl Into<QuantifiedInteger>,
    ) -> Self {
        Self::new(FormulaKind::NotEquals(lhs.into(), rhs.into()))
    }

    /// `lhs >= rhs`
    pub fn geq(lhs: impl Into<QuantifiedInteger>, rhs: impl Into<QuantifiedInteger>) -> Self {
        Self::new(FormulaKind::Geq(lhs.into(), rhs.into()))
    }

    /// `lhs <= rhs`, expressed as `rhs >= lhs`
    pub fn leq(lhs: impl Into<QuantifiedInteger>, rhs: impl Into<QuantifiedInteger>) -> Self {
        Self::geq(rhs, lhs)
    }

    /// `lhs < rhs`, expressed as `rhs >= lhs + 1`
    pub fn less(lhs: impl Into<QuantifiedInteger>, rhs: impl Into<QuantifiedInteger>) -> Self {
        Self::geq(rhs, lhs.into().shift(1))
    }

    /// `lhs > rhs`, expressed as `lhs >= rhs + 1`
    pub fn greater(lhs: impl Into<QuantifiedInteger>, rhs: impl Into<QuantifiedInteger>) -> Self {
        Self::geq(lhs, rhs.into().shift(1))
    }

    /// An element of a parametrized boolean variable. If all index expressions are closed,
    /// the result is the atom of that element.
    ///
    /// # Errors
    ///
    /// [`Error::Arity`] if the number of index expressions does not match the declaration,
    /// [`Error::OutsideDomain`] if closed indices lie outside of the declared domain.
    pub fn quantified_atom(decl: &Rc<BoolVarDecl>, args: Vec<PExpr>) -> Result<Self, Error> {
        if args.len() != decl.arity() {
            return Err(Error::Arity {
                name: decl.name().to_string(),
                expected: decl.arity(),
                found: args.len(),
            });
        }
        if args.iter().all(PExpr::is_closed) {
            return Ok(Self::atom(ground_atom(decl, &args, false)?));
        }
        Ok(Self::new(FormulaKind::QuantifiedAtom {
            decl: Rc::clone(decl),
            args,
            negated: false,
        }))
    }

    /// Universal quantification of the body over a parameter
    #[must_use]
    pub fn forall(param: Parameter, body: Formula) -> Self {
        Self::new(FormulaKind::Forall { param, body })
    }

    /// Existential quantification of the body over a parameter
    #[must_use]
    pub fn exists(param: Parameter, body: Formula) -> Self {
        Self::new(FormulaKind::Exists { param, body })
    }

    /// Gets the node variant
    #[must_use]
    pub fn kind(&self) -> &FormulaKind {
        &self.0.kind
    }

    /// Gets the free parameters of the formula
    #[must_use]
    pub fn params(&self) -> &ParamSet {
        &self.0.params
    }

    /// Checks whether the formula contains no free parameters
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.params.is_empty()
    }

    /// Gets the atom if the formula is a single atom
    #[must_use]
    pub fn as_atom(&self) -> Option<&Atom> {
        match self.kind() {
            FormulaKind::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Gets the canonical string of the formula
    #[must_use]
    pub fn repr(&self) -> &str {
        self.0.repr.get_or_init(|| self.render())
    }

    /// Negates the formula, pushing the negation down to atoms and comparisons
    #[must_use]
    pub fn negate(&self) -> Formula {
        match self.kind() {
            FormulaKind::Atom(atom) => Self::atom(!atom.clone()),
            FormulaKind::And(items) => Self::or(items.iter().map(Formula::negate).collect()),
            FormulaKind::Or(items) => Self::and(items.iter().map(Formula::negate).collect()),
            FormulaKind::Implies(a, b) => Self::and(vec![a.clone(), b.negate()]),
            FormulaKind::Iff(a, b) => Self::iff(a.clone(), b.negate()),
            FormulaKind::Ite(c, t, e) => Self::ite(c.clone(), t.negate(), e.negate()),
            FormulaKind::Equals(a, b) => Self::not_equals(a.clone(), b.clone()),
            FormulaKind::NotEquals(a, b) => Self::equals(a.clone(), b.clone()),
            FormulaKind::Geq(a, b) => Self::geq(b.clone(), a.clone().shift(1)),
            FormulaKind::QuantifiedAtom {
                decl,
                args,
                negated,
            } => Self::new(FormulaKind::QuantifiedAtom {
                decl: Rc::clone(decl),
                args: args.clone(),
                negated: !negated,
            }),
            FormulaKind::Forall { param, body } => Self::exists(param.clone(), body.negate()),
            FormulaKind::Exists { param, body } => Self::forall(param.clone(), body.negate()),
        }
    }

    /// Replaces free parameters. Parameters bound by a quantifier are not replaced in its
    /// body. Parametrized atoms whose indices become closed turn into plain atoms.
    ///
    /// # Errors
    ///
    /// [`Error::OutsideDomain`] if a parametrized atom becomes closed with indices outside
    /// of its domain.
    pub fn substitute(&self, substitution: &Substitution) -> Result<Formula, Error> {
        if self.params().iter().all(|p| substitution.get(p).is_none()) {
            return Ok(self.clone());
        }
        let map = |items: &[Formula]| {
            items
                .iter()
                .map(|f| f.substitute(substitution))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(match self.kind() {
            FormulaKind::Atom(_) => self.clone(),
            FormulaKind::And(items) => Self::and(map(items)?),
            FormulaKind::Or(items) => Self::or(map(items)?),
            FormulaKind::Implies(a, b) => {
                Self::implies(a.substitute(substitution)?, b.substitute(substitution)?)
            }
            FormulaKind::Iff(a, b) => {
                Self::iff(a.substitute(substitution)?, b.substitute(substitution)?)
            }
            FormulaKind::Ite(c, t, e) => Self::ite(
                c.substitute(substitution)?,
                t.substitute(substitution)?,
                e.substitute(substitution)?,
            ),
            FormulaKind::Equals(a, b) => {
                Self::equals(a.substitute(substitution)?, b.substitute(substitution)?)
            }
            FormulaKind::NotEquals(a, b) => {
                Self::not_equals(a.substitute(substitution)?, b.substitute(substitution)?)
            }
            FormulaKind::Geq(a, b) => {
                Self::geq(a.substitute(substitution)?, b.substitute(substitution)?)
            }
            FormulaKind::QuantifiedAtom {
                decl,
                args,
                negated,
            } => {
                let atom = Self::quantified_atom(
                    decl,
                    args.iter().map(|a| a.substitute(substitution)).collect(),
                )?;
                if *negated {
                    atom.negate()
                } else {
                    atom
                }
            }
            FormulaKind::Forall { param, body } => Self::forall(
                param.substitute(substitution),
                body.substitute(&substitution.without(param.name()))?,
            ),
            FormulaKind::Exists { param, body } => Self::exists(
                param.substitute(substitution),
                body.substitute(&substitution.without(param.name()))?,
            ),
        })
    }

    /// Expands a top-level quantifier into the conjunction or disjunction of its instances.
    /// Formulas that are no quantifier are returned unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the range or the restriction of the quantified parameter
    /// refers to free parameters, or a substitution error.
    pub fn translate(&self) -> Result<Formula, Error> {
        let (param, body, conjunction) = match self.kind() {
            FormulaKind::Forall { param, body } => (param, body, true),
            FormulaKind::Exists { param, body } => (param, body, false),
            _ => return Ok(self.clone()),
        };
        let instances = param
            .values()?
            .into_iter()
            .map(|val| {
                let subst: Substitution = [(param.shared_name(), PExpr::constant(val))]
                    .into_iter()
                    .collect();
                body.substitute(&subst)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            parameter = param.name(),
            instances = instances.len(),
            "expanded quantifier"
        );
        Ok(Self::junction(instances, conjunction))
    }

    /// Evaluates a closed formula on a solution. Returns `Ok(None)` if the value depends on
    /// unassigned variables.
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the formula has free parameters, or an evaluation error of an
    /// integer term.
    pub fn evaluate(&self, solution: &Solution) -> Result<Option<bool>, Error> {
        if !self.is_closed() {
            return Err(Error::NotClosed {
                term: self.to_string(),
                operation: "evaluate",
            });
        }
        let compare = |a: &QuantifiedInteger, b: &QuantifiedInteger, cmp: fn(i64, i64) -> bool| {
            Ok::<_, Error>(match (a.value(solution)?, b.value(solution)?) {
                (Some(x), Some(y)) => Some(cmp(x, y)),
                _ => None,
            })
        };
        Ok(match self.kind() {
            FormulaKind::Atom(atom) => ternary(solution.lit_value(atom.lit())),
            FormulaKind::And(items) => {
                let mut all = Some(true);
                for item in items {
                    match item.evaluate(solution)? {
                        Some(false) => return Ok(Some(false)),
                        None => all = None,
                        Some(true) => (),
                    }
                }
                all
            }
            FormulaKind::Or(items) => {
                let mut any = Some(false);
                for item in items {
                    match item.evaluate(solution)? {
                        Some(true) => return Ok(Some(true)),
                        None => any = None,
                        Some(false) => (),
                    }
                }
                any
            }
            FormulaKind::Implies(a, b) => match (a.evaluate(solution)?, b.evaluate(solution)?) {
                (Some(false), _) | (_, Some(true)) => Some(true),
                (Some(true), Some(false)) => Some(false),
                _ => None,
            },
            FormulaKind::Iff(a, b) => match (a.evaluate(solution)?, b.evaluate(solution)?) {
                (Some(x), Some(y)) => Some(x == y),
                _ => None,
            },
            FormulaKind::Ite(c, t, e) => match c.evaluate(solution)? {
                Some(true) => t.evaluate(solution)?,
                Some(false) => e.evaluate(solution)?,
                None => match (t.evaluate(solution)?, e.evaluate(solution)?) {
                    (Some(x), Some(y)) if x == y => Some(x),
                    _ => None,
                },
            },
            FormulaKind::Equals(a, b) => compare(a, b, |x, y| x == y)?,
            FormulaKind::NotEquals(a, b) => compare(a, b, |x, y| x != y)?,
            FormulaKind::Geq(a, b) => compare(a, b, |x, y| x >= y)?,
            FormulaKind::QuantifiedAtom {
                decl,
                args,
                negated,
            } => ternary(solution.lit_value(ground_atom(decl, args, *negated)?.lit())),
            FormulaKind::Forall { .. } | FormulaKind::Exists { .. } => {
                self.translate()?.evaluate(solution)?
            }
        })
    }

    fn render(&self) -> String {
        match self.kind() {
            FormulaKind::Atom(atom) => atom.to_string(),
            FormulaKind::And(items) if items.is_empty() => "TRUE".to_string(),
            FormulaKind::Or(items) if items.is_empty() => "FALSE".to_string(),
            FormulaKind::And(items) => format!("({})", items.iter().format(" & ")),
            FormulaKind::Or(items) => format!("({})", items.iter().format(" | ")),
            FormulaKind::Implies(a, b) => format!("({a} -> {b})"),
            FormulaKind::Iff(a, b) => format!("({a} <-> {b})"),
            FormulaKind::Ite(c, t, e) => format!("ite({c}, {t}, {e})"),
            FormulaKind::Equals(a, b) => format!("({a} = {b})"),
            FormulaKind::NotEquals(a, b) => format!("({a} != {b})"),
            FormulaKind::Geq(a, b) => format!("({a} >= {b})"),
            FormulaKind::QuantifiedAtom {
                decl,
                args,
                negated,
            } => format!(
                "{}{}[{}]",
                if *negated { "~" } else { "" },
                decl.name(),
                args.iter().format(",")
            ),
            FormulaKind::Forall { param, body } => format!("forall({param}: {body})"),
            FormulaKind::Exists { param, body } => format!("exists({param}: {body})"),
        }
    }
}

/// Resolves a parametrized atom with closed indices
fn ground_atom(decl: &BoolVarDecl, args: &[PExpr], negated: bool) -> Result<Atom, Error> {
    let empty = Assignment::new();
    let values = args
        .iter()
        .map(|a| a.evaluate(&empty))
        .collect::<Result<Vec<_>, _>>()?;
    let atom = decl.get(&values)?.pos_atom();
    Ok(if negated { !atom } else { atom })
}

fn ternary(val: TernaryVal) -> Option<bool> {
    match val {
        TernaryVal::True => Some(true),
        TernaryVal::False => Some(false),
        TernaryVal::DontCare => None,
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Formula({})", self.repr())
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.repr() == other.repr()
    }
}

impl Eq for Formula {}

impl std::hash::Hash for Formula {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.repr().hash(state);
    }
}

impl ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        self.negate()
    }
}

impl ops::Not for &Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        self.negate()
    }
}

impl ops::BitAnd for Formula {
    type Output = Formula;

    fn bitand(self, rhs: Formula) -> Formula {
        Formula::and(vec![self, rhs])
    }
}

impl ops::BitOr for Formula {
    type Output = Formula;

    fn bitor(self, rhs: Formula) -> Formula {
        Formula::or(vec![self, rhs])
    }
}

impl From<Atom> for Formula {
    fn from(atom: Atom) -> Self {
        Formula::atom(atom)
    }
}

impl From<&Variable> for Formula {
    fn from(var: &Variable) -> Self {
        Formula::var(var)
    }
}

#[cfg(test)]
mod tests {
    use super::Formula;
    use crate::{
        instances::{ManageVars, VarManager},
        params::{PExpr, Parameter, ParameterList, Substitution},
        quantified::{BoolVarDecl, IntVarDecl, QuantifiedInteger},
        types::{Solution, Variable},
        Error,
    };

    fn vars(vm: &mut VarManager, names: &[&str]) -> Vec<Variable> {
        names.iter().map(|n| vm.named_var(n)).collect()
    }

    #[test]
    fn flattening() {
        let mut vm = VarManager::new();
        let v = vars(&mut vm, &["a", "b", "c"]);
        let f = (Formula::var(&v[0]) & Formula::var(&v[1])) & Formula::var(&v[2]);
        assert_eq!(f.to_string(), "(a & b & c)");
        let g = Formula::or(vec![Formula::var(&v[0])]);
        assert_eq!(g.to_string(), "a");
        assert_eq!(Formula::constant(true).to_string(), "TRUE");
        assert_eq!(Formula::constant(false).to_string(), "FALSE");
        let h = Formula::var(&v[0]) & Formula::constant(false);
        assert_eq!(h.to_string(), "FALSE");
        let h = Formula::var(&v[0]) & Formula::constant(true);
        assert_eq!(h.to_string(), "a");
    }

    #[test]
    fn negation() {
        let mut vm = VarManager::new();
        let v = vars(&mut vm, &["a", "b", "c"]);
        let (a, b, c) = (Formula::var(&v[0]), Formula::var(&v[1]), Formula::var(&v[2]));
        let f = a.clone() & (b.clone() | !c.clone());
        assert_eq!((!&f).to_string(), "(~a | (~b & c))");
        assert_eq!(!!f.clone(), f);
        let imp = Formula::implies(a.clone(), b.clone());
        assert_eq!((!imp).to_string(), "(a & ~b)");
        let ite = Formula::ite(a, b, c);
        assert_eq!((!ite).to_string(), "ite(a, ~b, ~c)");
    }

    #[test]
    fn negated_comparison() {
        let mut vm = VarManager::new();
        let x = IntVarDecl::range("x", ParameterList::empty(), 0, 3, &mut vm).unwrap();
        let x = QuantifiedInteger::var(&x, vec![]).unwrap();
        let f = Formula::geq(x.clone(), 2);
        assert_eq!(f.to_string(), "(x >= 2)");
        assert_eq!((!f).to_string(), "(2 >= (x + 1))");
        let f = Formula::equals(x, 1);
        assert_eq!((!f).to_string(), "(x != 1)");
    }

    #[test]
    fn quantifier_expansion() {
        let mut vm = VarManager::new();
        let list = ParameterList::new(vec![Parameter::new("i", 1, 3)]).unwrap();
        let p = BoolVarDecl::new("P", list, &mut vm).unwrap();
        let body = Formula::quantified_atom(&p, vec![PExpr::param("i")]).unwrap();
        assert!(!body.is_closed());
        assert_eq!(body.to_string(), "P[i]");
        let all = Formula::forall(Parameter::new("i", 1, 3), body.clone());
        assert!(all.is_closed());
        assert_eq!(all.to_string(), "forall(i in [1..3]: P[i])");
        assert_eq!(all.translate().unwrap().to_string(), "(P[1] & P[2] & P[3])");
        let any = Formula::exists(Parameter::new("i", 2, 3), !body);
        assert_eq!(any.translate().unwrap().to_string(), "(~P[2] | ~P[3])");
        assert_eq!((!all).to_string(), "exists(i in [1..3]: ~P[i])");
    }

    #[test]
    fn substitution_shadowing() {
        let mut vm = VarManager::new();
        let list = ParameterList::new(vec![Parameter::new("i", 1, 3)]).unwrap();
        let p = BoolVarDecl::new("P", list, &mut vm).unwrap();
        let body = Formula::quantified_atom(&p, vec![PExpr::param("i")]).unwrap();
        let bound = Formula::forall(Parameter::new("i", 1, 3), body.clone());
        let f = bound & body;
        assert_eq!(f.params().len(), 1);
        let subst: Substitution = [("i", PExpr::constant(2))].into_iter().collect();
        let g = f.substitute(&subst).unwrap();
        assert!(g.is_closed());
        assert_eq!(g.to_string(), "(forall(i in [1..3]: P[i]) & P[2])");
        let subst: Substitution = [("i", PExpr::constant(7))].into_iter().collect();
        assert!(matches!(
            f.substitute(&subst),
            Err(Error::OutsideDomain { .. })
        ));
    }

    #[test]
    fn dependent_quantifier_params() {
        let mut vm = VarManager::new();
        let list = ParameterList::new(vec![
            Parameter::new("i", 1, 3),
            Parameter::new("j", 1, 3),
        ])
        .unwrap();
        let q = BoolVarDecl::new("Q", list, &mut vm).unwrap();
        let body =
            Formula::quantified_atom(&q, vec![PExpr::param("i"), PExpr::param("j")]).unwrap();
        let inner = Formula::forall(Parameter::new("j", 1, PExpr::param("i")), body);
        assert_eq!(inner.params().len(), 1);
        assert!(inner.params().contains("i"));
        assert!(matches!(
            inner.translate(),
            Err(Error::NotClosed { operation: "enumerate", .. })
        ));
        let outer = Formula::forall(Parameter::new("i", 1, 2), inner);
        let expanded = outer.translate().unwrap();
        assert_eq!(
            expanded.to_string(),
            "(forall(j in [1..1]: Q[1,j]) & forall(j in [1..2]: Q[2,j]))"
        );
    }

    #[test]
    fn arity() {
        let mut vm = VarManager::new();
        let list = ParameterList::new(vec![Parameter::new("i", 1, 3)]).unwrap();
        let p = BoolVarDecl::new("P", list, &mut vm).unwrap();
        assert_eq!(
            Formula::quantified_atom(&p, vec![]).unwrap_err(),
            Error::Arity {
                name: "P".to_string(),
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn evaluation() {
        let mut vm = VarManager::new();
        let v = vars(&mut vm, &["a", "b"]);
        let f = Formula::iff(Formula::var(&v[0]), !Formula::var(&v[1]));
        let mut sol = Solution::default();
        sol.force(&v[0], true);
        assert_eq!(f.evaluate(&sol), Ok(None));
        sol.force(&v[1], false);
        assert_eq!(f.evaluate(&sol), Ok(Some(true)));
        let g = Formula::var(&v[1]) | Formula::var(&v[0]);
        assert_eq!(g.evaluate(&Solution::default()), Ok(None));
        assert_eq!(g.evaluate(&sol), Ok(Some(true)));
    }
}
