//! # Parametrized Declarations and Quantified Integers
//!
//! Declarations of boolean and integer variables that are indexed by a [`ParameterList`],
//! and the symbolic [`QuantifiedInteger`] terms that refer to them with parameter
//! expressions. A quantified integer becomes a ground [`Integer`] through
//! [`QuantifiedInteger::instantiate`] once all of its parameters are bound.

use std::{fmt, rc::Rc};

use itertools::Itertools;
use tracing::debug;

use crate::{
    encodings::{
        binary::BinaryInteger, range::RangeInteger, BoundedInteger, Deferred, Encoding, Integer,
    },
    formula::Formula,
    instances::ManageVars,
    params::{Assignment, PExpr, ParamSet, ParamTree, Parameter, ParameterList, Substitution},
    types::{Lit, Solution, Variable},
    Error,
};

/// Gets the name of the element of a declaration for an assignment of its parameters,
/// `name[v1,v2,...]`
fn element_name(name: &str, params: &ParameterList, assignment: &Assignment) -> String {
    if params.is_empty() {
        return name.to_string();
    }
    format!(
        "{name}[{}]",
        params
            .names()
            .map(|p| assignment.get(p).unwrap_or_default())
            .format(",")
    )
}

/// Evaluates closed index expressions
fn eval_indices(args: &[PExpr]) -> Result<Vec<i64>, Error> {
    let empty = Assignment::new();
    args.iter().map(|a| a.evaluate(&empty)).collect()
}

/// A parametrized boolean variable, one propositional variable per admissible parameter
/// assignment
#[derive(Debug)]
pub struct BoolVarDecl {
    name: String,
    tree: ParamTree<Variable>,
}

impl BoolVarDecl {
    /// Declares a parametrized boolean variable and registers all its elements
    ///
    /// # Errors
    ///
    /// [`Error::Redeclaration`] if the name is already declared, or an evaluation error of
    /// the parameter bounds.
    pub fn new(
        name: &str,
        params: ParameterList,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Rc<Self>, Error> {
        var_manager.declare(name)?;
        let tree = ParamTree::new(name, &params, |assign| {
            var_manager.fresh_var(&element_name(name, &params, assign))
        })?;
        Ok(Rc::new(Self {
            name: name.to_string(),
            tree,
        }))
    }

    /// Gets the name of the declaration
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the parameters of the declaration
    #[must_use]
    pub fn params(&self) -> &ParameterList {
        self.tree.params()
    }

    /// Gets the number of parameters
    #[must_use]
    pub fn arity(&self) -> usize {
        self.tree.params().len()
    }

    /// Gets the element for the given parameter values
    ///
    /// # Errors
    ///
    /// [`Error::Arity`] for the wrong number of values, [`Error::OutsideDomain`] if the
    /// values are outside of the declared domain.
    pub fn get(&self, values: &[i64]) -> Result<&Variable, Error> {
        self.tree
            .lookup(values)?
            .ok_or_else(|| Error::OutsideDomain {
                name: self.name.clone(),
                index: values.iter().format(",").to_string(),
            })
    }

    /// Iterates over all elements
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.tree.iter().map(|(_, var)| var)
    }
}

/// A parametrized integer variable, one ground integer per admissible parameter assignment.
/// The range of each element may depend on its parameters.
#[derive(Debug)]
pub struct IntVarDecl {
    name: String,
    encoding: Encoding,
    tree: ParamTree<Integer>,
}

impl IntVarDecl {
    /// Declares a parametrized integer variable in the given encoding
    ///
    /// # Errors
    ///
    /// [`Error::Redeclaration`] if the name is already declared, [`Error::EmptyRange`] if an
    /// element has an empty range, or an evaluation error of the bounds.
    pub fn new(
        name: &str,
        params: ParameterList,
        min: &PExpr,
        max: &PExpr,
        encoding: Encoding,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Rc<Self>, Error> {
        var_manager.declare(name)?;
        let tree = ParamTree::new(name, &params, |assign| {
            let (lo, hi) = (min.evaluate(assign)?, max.evaluate(assign)?);
            let element = element_name(name, &params, assign);
            Ok(match encoding {
                Encoding::Range => RangeInteger::variable(&element, lo, hi, var_manager)?.into(),
                Encoding::Binary => BinaryInteger::variable(&element, lo, hi, var_manager)?.into(),
            })
        })?;
        debug!(
            name,
            %encoding,
            %min,
            %max,
            elements = tree.len(),
            "declared integer variable"
        );
        Ok(Rc::new(Self {
            name: name.to_string(),
            encoding,
            tree,
        }))
    }

    /// Declares a parametrized order encoded integer variable
    ///
    /// # Errors
    ///
    /// See [`IntVarDecl::new`].
    pub fn range(
        name: &str,
        params: ParameterList,
        min: impl Into<PExpr>,
        max: impl Into<PExpr>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Rc<Self>, Error> {
        Self::new(name, params, &min.into(), &max.into(), Encoding::Range, var_manager)
    }

    /// Declares a parametrized two's-complement encoded integer variable
    ///
    /// # Errors
    ///
    /// See [`IntVarDecl::new`].
    pub fn binary(
        name: &str,
        params: ParameterList,
        min: impl Into<PExpr>,
        max: impl Into<PExpr>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Rc<Self>, Error> {
        Self::new(name, params, &min.into(), &max.into(), Encoding::Binary, var_manager)
    }

    /// Gets the name of the declaration
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the encoding of all elements
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Gets the number of parameters
    #[must_use]
    pub fn arity(&self) -> usize {
        self.tree.params().len()
    }

    /// Gets the element for the given parameter values
    ///
    /// # Errors
    ///
    /// [`Error::Arity`] for the wrong number of values, [`Error::OutsideDomain`] if the
    /// values are outside of the declared domain.
    pub fn get(&self, values: &[i64]) -> Result<&Integer, Error> {
        self.tree
            .lookup(values)?
            .ok_or_else(|| Error::OutsideDomain {
                name: self.name.clone(),
                index: values.iter().format(",").to_string(),
            })
    }
}

/// An integer term that may still contain free parameters
#[derive(Clone, Debug)]
pub enum QuantifiedInteger {
    /// An element of a parametrized integer variable
    Var {
        /// The declaration
        decl: Rc<IntVarDecl>,
        /// One index expression per parameter of the declaration
        args: Vec<PExpr>,
    },
    /// A parameter expression
    Const(PExpr),
    /// A sum, optionally restricted to practical bounds
    Sum {
        /// The summands
        terms: Vec<QuantifiedInteger>,
        /// Practical lower and upper bound of the sum
        bounds: Option<(PExpr, PExpr)>,
    },
    /// An integer plus a parameter expression
    Shift(Box<QuantifiedInteger>, PExpr),
    /// An integer times a parameter expression
    Times(PExpr, Box<QuantifiedInteger>),
    /// `cond ? value : 0`
    Conditional(Formula, Box<QuantifiedInteger>),
    /// The sum of the body over all values of a parameter
    SumOver {
        /// The bound parameter
        param: Parameter,
        /// The summand
        body: Box<QuantifiedInteger>,
    },
}

impl QuantifiedInteger {
    /// Refers to an element of a parametrized integer variable
    ///
    /// # Errors
    ///
    /// [`Error::Arity`] if the number of index expressions does not match the declaration.
    pub fn var(decl: &Rc<IntVarDecl>, args: Vec<PExpr>) -> Result<Self, Error> {
        if args.len() != decl.arity() {
            return Err(Error::Arity {
                name: decl.name().to_string(),
                expected: decl.arity(),
                found: args.len(),
            });
        }
        Ok(QuantifiedInteger::Var {
            decl: Rc::clone(decl),
            args,
        })
    }

    /// A constant or parameter expression
    pub fn constant(expr: impl Into<PExpr>) -> Self {
        QuantifiedInteger::Const(expr.into())
    }

    /// The sum of the terms
    #[must_use]
    pub fn sum(terms: Vec<QuantifiedInteger>) -> Self {
        QuantifiedInteger::Sum {
            terms,
            bounds: None,
        }
    }

    /// The sum of the terms, restricted to `[min,max]`
    pub fn bounded_sum(
        terms: Vec<QuantifiedInteger>,
        min: impl Into<PExpr>,
        max: impl Into<PExpr>,
    ) -> Self {
        QuantifiedInteger::Sum {
            terms,
            bounds: Some((min.into(), max.into())),
        }
    }

    /// `self + offset`
    #[must_use]
    pub fn shift(self, offset: impl Into<PExpr>) -> Self {
        QuantifiedInteger::Shift(Box::new(self), offset.into())
    }

    /// `factor * self`
    #[must_use]
    pub fn times(self, factor: impl Into<PExpr>) -> Self {
        QuantifiedInteger::Times(factor.into(), Box::new(self))
    }

    /// `cond ? self : 0`
    #[must_use]
    pub fn only_if(self, cond: Formula) -> Self {
        QuantifiedInteger::Conditional(cond, Box::new(self))
    }

    /// The sum of `body` over all values of `param`
    #[must_use]
    pub fn sum_over(param: Parameter, body: QuantifiedInteger) -> Self {
        QuantifiedInteger::SumOver {
            param,
            body: Box::new(body),
        }
    }

    /// Gets the free parameters of the term
    #[must_use]
    pub fn params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        self.collect_params(&mut params);
        params
    }

    /// Adds the free parameters of the term to a set
    pub fn collect_params(&self, params: &mut ParamSet) {
        match self {
            QuantifiedInteger::Var { args, .. } => {
                args.iter().for_each(|a| a.collect_params(params));
            }
            QuantifiedInteger::Const(expr) => expr.collect_params(params),
            QuantifiedInteger::Sum { terms, bounds } => {
                terms.iter().for_each(|t| t.collect_params(params));
                if let Some((lo, hi)) = bounds {
                    lo.collect_params(params);
                    hi.collect_params(params);
                }
            }
            QuantifiedInteger::Shift(inner, expr) | QuantifiedInteger::Times(expr, inner) => {
                inner.collect_params(params);
                expr.collect_params(params);
            }
            QuantifiedInteger::Conditional(cond, inner) => {
                params.extend(cond.params().iter().cloned());
                inner.collect_params(params);
            }
            QuantifiedInteger::SumOver { param, body } => {
                let mut inner = body.params();
                inner.remove(param.name());
                params.extend(inner);
                params.extend(param.free_params());
            }
        }
    }

    /// Checks whether the term contains no free parameters
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.params().is_empty()
    }

    /// Gets the encoding that the term is instantiated in. Terms without variables have no
    /// encoding of their own.
    ///
    /// # Errors
    ///
    /// [`Error::IncompatibleEncodings`] if the term mixes variables of both encodings.
    pub fn encoding(&self) -> Result<Option<Encoding>, Error> {
        match self {
            QuantifiedInteger::Var { decl, .. } => Ok(Some(decl.encoding())),
            QuantifiedInteger::Const(_) => Ok(None),
            QuantifiedInteger::Sum { terms, .. } => {
                let mut found: Option<(Encoding, &QuantifiedInteger)> = None;
                for term in terms {
                    let Some(enc) = term.encoding()? else {
                        continue;
                    };
                    match found {
                        Some((prev, other)) if prev != enc => {
                            return Err(Error::IncompatibleEncodings {
                                lhs: other.to_string(),
                                rhs: term.to_string(),
                            })
                        }
                        Some(_) => (),
                        None => found = Some((enc, term)),
                    }
                }
                Ok(found.map(|(enc, _)| enc))
            }
            QuantifiedInteger::Shift(inner, _)
            | QuantifiedInteger::Times(_, inner)
            | QuantifiedInteger::Conditional(_, inner)
            | QuantifiedInteger::SumOver { body: inner, .. } => inner.encoding(),
        }
    }

    /// Replaces free parameters. Parameters bound by a [`QuantifiedInteger::SumOver`] are
    /// not replaced in its body.
    ///
    /// # Errors
    ///
    /// If a parametrized atom in a condition becomes closed with indices outside of its
    /// domain.
    pub fn substitute(&self, substitution: &Substitution) -> Result<QuantifiedInteger, Error> {
        Ok(match self {
            QuantifiedInteger::Var { decl, args } => QuantifiedInteger::Var {
                decl: Rc::clone(decl),
                args: args.iter().map(|a| a.substitute(substitution)).collect(),
            },
            QuantifiedInteger::Const(expr) => {
                QuantifiedInteger::Const(expr.substitute(substitution))
            }
            QuantifiedInteger::Sum { terms, bounds } => QuantifiedInteger::Sum {
                terms: terms
                    .iter()
                    .map(|t| t.substitute(substitution))
                    .collect::<Result<_, _>>()?,
                bounds: bounds.as_ref().map(|(lo, hi)| {
                    (lo.substitute(substitution), hi.substitute(substitution))
                }),
            },
            QuantifiedInteger::Shift(inner, expr) => QuantifiedInteger::Shift(
                Box::new(inner.substitute(substitution)?),
                expr.substitute(substitution),
            ),
            QuantifiedInteger::Times(expr, inner) => QuantifiedInteger::Times(
                expr.substitute(substitution),
                Box::new(inner.substitute(substitution)?),
            ),
            QuantifiedInteger::Conditional(cond, inner) => QuantifiedInteger::Conditional(
                cond.substitute(substitution)?,
                Box::new(inner.substitute(substitution)?),
            ),
            QuantifiedInteger::SumOver { param, body } => QuantifiedInteger::SumOver {
                param: param.substitute(substitution),
                body: Box::new(body.substitute(&substitution.without(param.name()))?),
            },
        })
    }

    /// Instantiates the term under an assignment. Terms without variables are instantiated
    /// in the order encoding.
    ///
    /// # Errors
    ///
    /// - [`Error::NotClosed`] if the assignment does not bind all free parameters
    /// - [`Error::IncompatibleEncodings`] if the term mixes the two encodings
    /// - [`Error::OutsideDomain`] if a variable is indexed outside of its domain
    pub fn instantiate(
        &self,
        assignment: &Assignment,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Integer, Error> {
        let ground = self.close(assignment)?;
        match ground.encoding()?.unwrap_or_default() {
            Encoding::Range => Ok(ground.build::<RangeInteger>(var_manager)?.into()),
            Encoding::Binary => Ok(ground.build::<BinaryInteger>(var_manager)?.into()),
        }
    }

    /// Instantiates two terms in a shared encoding, as needed to compare them
    ///
    /// # Errors
    ///
    /// See [`QuantifiedInteger::instantiate`], [`Error::IncompatibleEncodings`] if the two
    /// terms use different encodings.
    pub fn instantiate_pair(
        lhs: &QuantifiedInteger,
        rhs: &QuantifiedInteger,
        assignment: &Assignment,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(Integer, Integer), Error> {
        let (lhs, rhs) = (lhs.close(assignment)?, rhs.close(assignment)?);
        let encoding = match (lhs.encoding()?, rhs.encoding()?) {
            (Some(a), Some(b)) if a != b => {
                return Err(Error::IncompatibleEncodings {
                    lhs: lhs.to_string(),
                    rhs: rhs.to_string(),
                })
            }
            (Some(enc), _) | (None, Some(enc)) => enc,
            (None, None) => Encoding::default(),
        };
        Ok(match encoding {
            Encoding::Range => (
                lhs.build::<RangeInteger>(var_manager)?.into(),
                rhs.build::<RangeInteger>(var_manager)?.into(),
            ),
            Encoding::Binary => (
                lhs.build::<BinaryInteger>(var_manager)?.into(),
                rhs.build::<BinaryInteger>(var_manager)?.into(),
            ),
        })
    }

    /// Substitutes the assignment and checks that nothing remains free
    fn close(&self, assignment: &Assignment) -> Result<QuantifiedInteger, Error> {
        let ground = if assignment.is_empty() {
            self.clone()
        } else {
            self.substitute(&Substitution::from(assignment))?
        };
        if !ground.is_closed() {
            return Err(Error::NotClosed {
                term: ground.to_string(),
                operation: "instantiate",
            });
        }
        Ok(ground)
    }

    /// Builds the ground integer of a closed term
    fn build<I: Ground>(&self, var_manager: &mut dyn ManageVars) -> Result<I, Error> {
        let empty = Assignment::new();
        match self {
            QuantifiedInteger::Var { decl, args } => {
                let int = decl.get(&eval_indices(args)?)?;
                I::from_declared(int).ok_or_else(|| Error::IncompatibleEncodings {
                    lhs: self.to_string(),
                    rhs: int.to_string(),
                })
            }
            QuantifiedInteger::Const(expr) => Ok(I::constant(expr.evaluate(&empty)?, var_manager)),
            QuantifiedInteger::Sum { terms, bounds } => {
                let parts = terms
                    .iter()
                    .map(|t| t.build(var_manager))
                    .collect::<Result<Vec<I>, _>>()?;
                let bounds = match bounds {
                    Some((lo, hi)) => Some((lo.evaluate(&empty)?, hi.evaluate(&empty)?)),
                    None => None,
                };
                I::sum(parts, bounds, var_manager)
            }
            QuantifiedInteger::Shift(inner, expr) => {
                let inner: I = inner.build(var_manager)?;
                inner.shift(expr.evaluate(&empty)?, var_manager)
            }
            QuantifiedInteger::Times(expr, inner) => {
                let inner: I = inner.build(var_manager)?;
                inner.scale(expr.evaluate(&empty)?, var_manager)
            }
            QuantifiedInteger::Conditional(cond, inner) => {
                let value: I = inner.build(var_manager)?;
                let lit = cond.literal_for(var_manager)?;
                let definition = {
                    let cond = cond.clone();
                    Deferred::new(cond.to_string(), move |collector, var_manager| {
                        cond.atom_for(collector, var_manager).map(|_| ())
                    })
                };
                Ok(I::conditional(
                    lit,
                    &cond.to_string(),
                    definition,
                    &value,
                    var_manager,
                ))
            }
            QuantifiedInteger::SumOver { param, body } => {
                let parts = param
                    .values()?
                    .into_iter()
                    .map(|val| {
                        let subst: Substitution =
                            [(param.shared_name(), PExpr::constant(val))].into_iter().collect();
                        body.substitute(&subst)?.build(var_manager)
                    })
                    .collect::<Result<Vec<I>, _>>()?;
                debug!(parameter = param.name(), summands = parts.len(), "expanded sum");
                I::sum(parts, None, var_manager)
            }
        }
    }

    /// Evaluates a closed term on a solution. Returns `Ok(None)` if a variable of the term
    /// is not assigned.
    ///
    /// # Errors
    ///
    /// [`Error::NotClosed`] if the term has free parameters, or a lookup error.
    pub fn value(&self, solution: &Solution) -> Result<Option<i64>, Error> {
        let empty = Assignment::new();
        if !self.is_closed() {
            return Err(Error::NotClosed {
                term: self.to_string(),
                operation: "evaluate",
            });
        }
        Ok(match self {
            QuantifiedInteger::Var { decl, args } => {
                decl.get(&eval_indices(args)?)?.value(solution)
            }
            QuantifiedInteger::Const(expr) => Some(expr.evaluate(&empty)?),
            QuantifiedInteger::Sum { terms, .. } => {
                let mut total = Some(0);
                for term in terms {
                    total = match (total, term.value(solution)?) {
                        (Some(a), Some(b)) => Some(a + b),
                        _ => None,
                    };
                }
                total
            }
            QuantifiedInteger::Shift(inner, expr) => {
                let offset = expr.evaluate(&empty)?;
                inner.value(solution)?.map(|v| v + offset)
            }
            QuantifiedInteger::Times(expr, inner) => {
                let factor = expr.evaluate(&empty)?;
                inner.value(solution)?.map(|v| v * factor)
            }
            QuantifiedInteger::Conditional(cond, inner) => match cond.evaluate(solution)? {
                Some(true) => inner.value(solution)?,
                Some(false) => Some(0),
                None => None,
            },
            QuantifiedInteger::SumOver { param, body } => {
                let mut total = Some(0);
                for val in param.values()? {
                    let subst: Substitution =
                        [(param.shared_name(), PExpr::constant(val))].into_iter().collect();
                    total = match (total, body.substitute(&subst)?.value(solution)?) {
                        (Some(a), Some(b)) => Some(a + b),
                        _ => None,
                    };
                }
                total
            }
        })
    }
}

impl fmt::Display for QuantifiedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantifiedInteger::Var { decl, args } if args.is_empty() => {
                write!(f, "{}", decl.name())
            }
            QuantifiedInteger::Var { decl, args } => {
                write!(f, "{}[{}]", decl.name(), args.iter().format(","))
            }
            QuantifiedInteger::Const(expr) => write!(f, "{expr}"),
            QuantifiedInteger::Sum { terms, bounds: None } => {
                write!(f, "({})", terms.iter().format(" + "))
            }
            QuantifiedInteger::Sum {
                terms,
                bounds: Some((lo, hi)),
            } => write!(f, "clamp({}, {lo}, {hi})", terms.iter().format(" + ")),
            QuantifiedInteger::Shift(inner, expr) => write!(f, "({inner} + {expr})"),
            QuantifiedInteger::Times(expr, inner) => write!(f, "({expr} * {inner})"),
            QuantifiedInteger::Conditional(cond, inner) => write!(f, "({cond} ? {inner} : 0)"),
            QuantifiedInteger::SumOver { param, body } => write!(f, "sum({param}: {body})"),
        }
    }
}

impl From<i64> for QuantifiedInteger {
    fn from(value: i64) -> Self {
        QuantifiedInteger::Const(PExpr::constant(value))
    }
}

impl From<i32> for QuantifiedInteger {
    fn from(value: i32) -> Self {
        QuantifiedInteger::Const(PExpr::constant(i64::from(value)))
    }
}

impl From<PExpr> for QuantifiedInteger {
    fn from(expr: PExpr) -> Self {
        QuantifiedInteger::Const(expr)
    }
}

/// Operations needed to build a ground integer in either encoding
trait Ground: Sized + fmt::Display {
    fn from_declared(int: &Integer) -> Option<Self>;
    fn constant(value: i64, var_manager: &dyn ManageVars) -> Self;
    fn sum(
        parts: Vec<Self>,
        bounds: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error>;
    fn shift(&self, offset: i64, var_manager: &mut dyn ManageVars) -> Result<Self, Error>;
    fn scale(&self, factor: i64, var_manager: &mut dyn ManageVars) -> Result<Self, Error>;
    fn conditional(
        cond: Lit,
        cond_repr: &str,
        definition: Deferred,
        value: &Self,
        var_manager: &mut dyn ManageVars,
    ) -> Self;
}

impl Ground for RangeInteger {
    fn from_declared(int: &Integer) -> Option<Self> {
        int.as_range().cloned()
    }

    fn constant(value: i64, var_manager: &dyn ManageVars) -> Self {
        RangeInteger::constant(value, var_manager)
    }

    fn sum(
        parts: Vec<Self>,
        bounds: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        RangeInteger::sum(parts, bounds, var_manager)
    }

    fn shift(&self, offset: i64, _var_manager: &mut dyn ManageVars) -> Result<Self, Error> {
        Ok(RangeInteger::shift(self, offset))
    }

    fn scale(&self, factor: i64, _var_manager: &mut dyn ManageVars) -> Result<Self, Error> {
        Ok(RangeInteger::scale(self, factor))
    }

    fn conditional(
        cond: Lit,
        cond_repr: &str,
        definition: Deferred,
        value: &Self,
        var_manager: &mut dyn ManageVars,
    ) -> Self {
        RangeInteger::conditional(cond, cond_repr, definition, value, var_manager)
    }
}

impl Ground for BinaryInteger {
    fn from_declared(int: &Integer) -> Option<Self> {
        int.as_binary().cloned()
    }

    fn constant(value: i64, var_manager: &dyn ManageVars) -> Self {
        BinaryInteger::constant(value, var_manager)
    }

    fn sum(
        parts: Vec<Self>,
        bounds: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        BinaryInteger::sum(parts, bounds, var_manager)
    }

    fn shift(&self, offset: i64, var_manager: &mut dyn ManageVars) -> Result<Self, Error> {
        let offset = BinaryInteger::constant(offset, var_manager);
        BinaryInteger::sum(vec![self.clone(), offset], None, var_manager)
    }

    fn scale(&self, factor: i64, var_manager: &mut dyn ManageVars) -> Result<Self, Error> {
        self.times(factor, var_manager)
    }

    fn conditional(
        cond: Lit,
        cond_repr: &str,
        definition: Deferred,
        value: &Self,
        var_manager: &mut dyn ManageVars,
    ) -> Self {
        BinaryInteger::conditional(cond, cond_repr, definition, value, var_manager)
    }
}
