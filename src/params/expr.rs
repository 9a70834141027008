//! # Parameter Expressions

use std::{fmt, ops, rc::Rc};

use itertools::Itertools;

use super::{Assignment, ParamSet, Substitution};
use crate::Error;

/// A named integer function that can be applied to parameter expressions
pub struct ParamFunction {
    name: String,
    eval: Box<dyn Fn(&[i64]) -> i64>,
}

impl ParamFunction {
    /// Creates a new function from its name and its evaluation
    pub fn new(name: impl Into<String>, eval: impl Fn(&[i64]) -> i64 + 'static) -> Rc<Self> {
        Rc::new(ParamFunction {
            name: name.into(),
            eval: Box::new(eval),
        })
    }

    /// Gets the name of the function
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the function to values
    #[must_use]
    pub fn call(&self, args: &[i64]) -> i64 {
        (self.eval)(args)
    }
}

impl fmt::Debug for ParamFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParamFunction({})", self.name)
    }
}

impl PartialEq for ParamFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ParamFunction {}

/// An integer expression over parameters
///
/// Build expressions through the constructor functions ([`PExpr::sum`], [`PExpr::product`],
/// ...), which fold constants and flatten nested operations. Division and modulo truncate
/// towards zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PExpr {
    /// An integer constant
    Const(i64),
    /// A reference to a parameter
    Param(Rc<str>),
    /// The sum of at least two terms, at most one of which is constant
    Sum(Vec<PExpr>),
    /// The product of at least two factors, at most one of which is constant
    Product(Vec<PExpr>),
    /// Truncating division
    Div(Box<PExpr>, Box<PExpr>),
    /// Remainder of truncating division
    Mod(Box<PExpr>, Box<PExpr>),
    /// The minimum of at least two expressions
    Min(Vec<PExpr>),
    /// The maximum of at least two expressions
    Max(Vec<PExpr>),
    /// The application of a named function
    Apply(Rc<ParamFunction>, Vec<PExpr>),
}

impl PExpr {
    /// Creates a constant expression
    #[must_use]
    pub fn constant(value: i64) -> Self {
        PExpr::Const(value)
    }

    /// Creates a reference to a parameter
    pub fn param(name: impl Into<Rc<str>>) -> Self {
        PExpr::Param(name.into())
    }

    /// Creates a sum, flattening nested sums and coalescing constants
    #[must_use]
    pub fn sum(terms: Vec<PExpr>) -> Self {
        let mut constant = 0;
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                PExpr::Const(c) => constant += c,
                PExpr::Sum(inner) => {
                    for t in inner {
                        match t {
                            PExpr::Const(c) => constant += c,
                            t => flat.push(t),
                        }
                    }
                }
                t => flat.push(t),
            }
        }
        if constant != 0 {
            flat.push(PExpr::Const(constant));
        }
        match flat.len() {
            0 => PExpr::Const(0),
            1 => flat.pop().unwrap_or(PExpr::Const(0)),
            _ => PExpr::Sum(flat),
        }
    }

    /// Creates a product, flattening nested products and folding constants
    #[must_use]
    pub fn product(factors: Vec<PExpr>) -> Self {
        let mut constant = 1;
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                PExpr::Const(c) => constant *= c,
                PExpr::Product(inner) => {
                    for f in inner {
                        match f {
                            PExpr::Const(c) => constant *= c,
                            f => flat.push(f),
                        }
                    }
                }
                f => flat.push(f),
            }
        }
        if constant == 0 {
            return PExpr::Const(0);
        }
        if constant != 1 {
            flat.insert(0, PExpr::Const(constant));
        }
        match flat.len() {
            0 => PExpr::Const(1),
            1 => flat.pop().unwrap_or(PExpr::Const(1)),
            _ => PExpr::Product(flat),
        }
    }

    /// Creates a truncating division
    #[must_use]
    pub fn div(lhs: PExpr, rhs: PExpr) -> Self {
        match (lhs, rhs) {
            (PExpr::Const(a), PExpr::Const(b)) if b != 0 => PExpr::Const(a / b),
            (lhs, PExpr::Const(1)) => lhs,
            (lhs, rhs) => PExpr::Div(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Creates the remainder of a truncating division
    #[must_use]
    pub fn modulo(lhs: PExpr, rhs: PExpr) -> Self {
        match (lhs, rhs) {
            (PExpr::Const(a), PExpr::Const(b)) if b != 0 => PExpr::Const(a % b),
            (_, PExpr::Const(1 | -1)) => PExpr::Const(0),
            (lhs, rhs) => PExpr::Mod(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Creates the minimum of some expressions
    ///
    /// # Panics
    ///
    /// If `items` is empty.
    #[must_use]
    pub fn min(items: Vec<PExpr>) -> Self {
        Self::extremum(items, true)
    }

    /// Creates the maximum of some expressions
    ///
    /// # Panics
    ///
    /// If `items` is empty.
    #[must_use]
    pub fn max(items: Vec<PExpr>) -> Self {
        Self::extremum(items, false)
    }

    fn extremum(items: Vec<PExpr>, is_min: bool) -> Self {
        assert!(!items.is_empty(), "min/max of no expressions");
        let pick = |a: i64, b: i64| if is_min { a.min(b) } else { a.max(b) };
        let mut constant: Option<i64> = None;
        let mut flat = Vec::with_capacity(items.len());
        let mut add = |item: PExpr, flat: &mut Vec<PExpr>| match item {
            PExpr::Const(c) => constant = Some(constant.map_or(c, |prev| pick(prev, c))),
            item => flat.push(item),
        };
        for item in items {
            match item {
                PExpr::Min(inner) if is_min => inner.into_iter().for_each(|i| add(i, &mut flat)),
                PExpr::Max(inner) if !is_min => inner.into_iter().for_each(|i| add(i, &mut flat)),
                item => add(item, &mut flat),
            }
        }
        if let Some(c) = constant {
            flat.push(PExpr::Const(c));
        }
        if flat.len() == 1 {
            return flat.pop().unwrap_or(PExpr::Const(0));
        }
        if is_min {
            PExpr::Min(flat)
        } else {
            PExpr::Max(flat)
        }
    }

    /// Applies a function, evaluating it right away if all arguments are constant
    #[must_use]
    pub fn apply(function: Rc<ParamFunction>, args: Vec<PExpr>) -> Self {
        if let Some(values) = args.iter().map(PExpr::as_const).collect::<Option<Vec<_>>>() {
            return PExpr::Const(function.call(&values));
        }
        PExpr::Apply(function, args)
    }

    /// Gets the value of a constant expression
    #[must_use]
    pub fn as_const(&self) -> Option<i64> {
        match self {
            PExpr::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Checks whether the expression contains no parameters
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            PExpr::Const(_) => true,
            PExpr::Param(_) => false,
            PExpr::Sum(items)
            | PExpr::Product(items)
            | PExpr::Min(items)
            | PExpr::Max(items)
            | PExpr::Apply(_, items) => items.iter().all(PExpr::is_closed),
            PExpr::Div(a, b) | PExpr::Mod(a, b) => a.is_closed() && b.is_closed(),
        }
    }

    /// Gets the free parameters of the expression
    #[must_use]
    pub fn params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        self.collect_params(&mut params);
        params
    }

    /// Adds the free parameters of the expression to a set
    pub fn collect_params(&self, params: &mut ParamSet) {
        match self {
            PExpr::Const(_) => (),
            PExpr::Param(name) => {
                params.insert(Rc::clone(name));
            }
            PExpr::Sum(items)
            | PExpr::Product(items)
            | PExpr::Min(items)
            | PExpr::Max(items)
            | PExpr::Apply(_, items) => items.iter().for_each(|i| i.collect_params(params)),
            PExpr::Div(a, b) | PExpr::Mod(a, b) => {
                a.collect_params(params);
                b.collect_params(params);
            }
        }
    }

    /// Evaluates the expression
    ///
    /// # Errors
    ///
    /// [`Error::UnboundParameter`] if a parameter is not bound by the assignment,
    /// [`Error::DivisionByZero`] if a divisor evaluates to zero.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<i64, Error> {
        let fold = |items: &[PExpr], init: i64, op: fn(i64, i64) -> i64| {
            items
                .iter()
                .try_fold(init, |acc, i| Ok::<_, Error>(op(acc, i.evaluate(assignment)?)))
        };
        match self {
            PExpr::Const(c) => Ok(*c),
            PExpr::Param(name) => {
                assignment
                    .get(name)
                    .ok_or_else(|| Error::UnboundParameter {
                        name: name.to_string(),
                        term: self.to_string(),
                    })
            }
            PExpr::Sum(items) => fold(items, 0, |a, b| a + b),
            PExpr::Product(items) => fold(items, 1, |a, b| a * b),
            PExpr::Min(items) => fold(items, i64::MAX, i64::min),
            PExpr::Max(items) => fold(items, i64::MIN, i64::max),
            PExpr::Div(a, b) | PExpr::Mod(a, b) => {
                let a = a.evaluate(assignment)?;
                let b = b.evaluate(assignment)?;
                if b == 0 {
                    return Err(Error::DivisionByZero {
                        term: self.to_string(),
                    });
                }
                Ok(if matches!(self, PExpr::Div(..)) {
                    a / b
                } else {
                    a % b
                })
            }
            PExpr::Apply(function, args) => {
                let values = args
                    .iter()
                    .map(|a| a.evaluate(assignment))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(function.call(&values))
            }
        }
    }

    /// Replaces parameters and simplifies the result
    #[must_use]
    pub fn substitute(&self, substitution: &Substitution) -> PExpr {
        let map = |items: &[PExpr]| {
            items
                .iter()
                .map(|i| i.substitute(substitution))
                .collect::<Vec<_>>()
        };
        match self {
            PExpr::Const(_) => self.clone(),
            PExpr::Param(name) => substitution
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            PExpr::Sum(items) => PExpr::sum(map(items)),
            PExpr::Product(items) => PExpr::product(map(items)),
            PExpr::Min(items) => PExpr::min(map(items)),
            PExpr::Max(items) => PExpr::max(map(items)),
            PExpr::Div(a, b) => PExpr::div(a.substitute(substitution), b.substitute(substitution)),
            PExpr::Mod(a, b) => {
                PExpr::modulo(a.substitute(substitution), b.substitute(substitution))
            }
            PExpr::Apply(function, args) => PExpr::apply(Rc::clone(function), map(args)),
        }
    }
}

impl From<i64> for PExpr {
    fn from(value: i64) -> Self {
        PExpr::Const(value)
    }
}

impl From<i32> for PExpr {
    fn from(value: i32) -> Self {
        PExpr::Const(i64::from(value))
    }
}

impl From<&str> for PExpr {
    fn from(name: &str) -> Self {
        PExpr::param(name)
    }
}

impl ops::Add for PExpr {
    type Output = PExpr;

    fn add(self, rhs: PExpr) -> PExpr {
        PExpr::sum(vec![self, rhs])
    }
}

impl ops::Add<i64> for PExpr {
    type Output = PExpr;

    fn add(self, rhs: i64) -> PExpr {
        PExpr::sum(vec![self, PExpr::Const(rhs)])
    }
}

impl ops::Sub for PExpr {
    type Output = PExpr;

    fn sub(self, rhs: PExpr) -> PExpr {
        PExpr::sum(vec![self, -rhs])
    }
}

impl ops::Sub<i64> for PExpr {
    type Output = PExpr;

    fn sub(self, rhs: i64) -> PExpr {
        PExpr::sum(vec![self, PExpr::Const(-rhs)])
    }
}

impl ops::Mul for PExpr {
    type Output = PExpr;

    fn mul(self, rhs: PExpr) -> PExpr {
        PExpr::product(vec![self, rhs])
    }
}

impl ops::Neg for PExpr {
    type Output = PExpr;

    fn neg(self) -> PExpr {
        PExpr::product(vec![PExpr::Const(-1), self])
    }
}

impl fmt::Display for PExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PExpr::Const(c) => write!(f, "{c}"),
            PExpr::Param(name) => write!(f, "{name}"),
            PExpr::Sum(items) => write!(f, "({})", items.iter().format(" + ")),
            PExpr::Product(items) => write!(f, "({})", items.iter().format(" * ")),
            PExpr::Div(a, b) => write!(f, "({a} / {b})"),
            PExpr::Mod(a, b) => write!(f, "({a} % {b})"),
            PExpr::Min(items) => write!(f, "min({})", items.iter().format(", ")),
            PExpr::Max(items) => write!(f, "max({})", items.iter().format(", ")),
            PExpr::Apply(function, args) => {
                write!(f, "{}({})", function.name(), args.iter().format(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PExpr, ParamFunction};
    use crate::{
        params::{Assignment, Substitution},
        Error,
    };

    fn p(name: &str) -> PExpr {
        PExpr::param(name)
    }

    #[test]
    fn constants_coalesce() {
        let e = p("i") + 1 + 2;
        assert_eq!(e, PExpr::Sum(vec![p("i"), PExpr::Const(3)]));
        assert_eq!(format!("{e}"), "(i + 3)");
        let e = p("i") + 1 - 1;
        assert_eq!(e, p("i"));
    }

    #[test]
    fn product_simplification() {
        assert_eq!(p("i") * PExpr::Const(0), PExpr::Const(0));
        assert_eq!(p("i") * PExpr::Const(1), p("i"));
        let e = PExpr::Const(2) * (p("i") * PExpr::Const(3));
        assert_eq!(format!("{e}"), "(6 * i)");
    }

    #[test]
    fn substitution_folds() {
        let e = (p("i") * p("j")) + p("i") - 4;
        let subst: Substitution = [("i", PExpr::Const(2))].into_iter().collect();
        let e = e.substitute(&subst);
        assert_eq!(format!("{e}"), "((2 * j) + -2)");
        let subst: Substitution = [("j", PExpr::Const(5))].into_iter().collect();
        assert_eq!(e.substitute(&subst), PExpr::Const(8));
    }

    #[test]
    fn repeated_substitution_does_not_grow() {
        let mut e = p("i") + 1;
        for _ in 0..10 {
            let subst: Substitution = [("i", p("i") + 1)].into_iter().collect();
            e = e.substitute(&subst);
        }
        assert_eq!(format!("{e}"), "(i + 11)");
    }

    #[test]
    fn evaluate() {
        let assign: Assignment = [("i", 7), ("j", 2)].into_iter().collect();
        assert_eq!(PExpr::div(p("i"), p("j")).evaluate(&assign), Ok(3));
        assert_eq!(PExpr::modulo(p("i"), p("j")).evaluate(&assign), Ok(1));
        assert_eq!(PExpr::min(vec![p("i"), p("j"), PExpr::constant(5)]).evaluate(&assign), Ok(2));
        assert_eq!(PExpr::max(vec![p("i"), p("j")]).evaluate(&assign), Ok(7));
        let sq = ParamFunction::new("sq", |args| args[0] * args[0]);
        assert_eq!(PExpr::apply(sq, vec![p("j")]).evaluate(&assign), Ok(4));
    }

    #[test]
    fn evaluate_errors() {
        let assign: Assignment = [("i", 7)].into_iter().collect();
        assert!(matches!(
            (p("i") + p("k")).evaluate(&assign),
            Err(Error::UnboundParameter { name, .. }) if name == "k"
        ));
        assert!(matches!(
            PExpr::div(p("i"), p("i") - 7).evaluate(&assign),
            Err(Error::DivisionByZero { .. })
        ));
    }

    #[test]
    fn min_max_fold() {
        assert_eq!(PExpr::min(vec![PExpr::constant(3), PExpr::constant(1)]), PExpr::Const(1));
        assert_eq!(
            PExpr::max(vec![PExpr::max(vec![p("i"), PExpr::constant(2)]), PExpr::constant(4)]),
            PExpr::Max(vec![p("i"), PExpr::Const(4)])
        );
    }

    #[test]
    fn apply_closed_evaluates() {
        let f = ParamFunction::new("f", |args| args.iter().sum());
        assert_eq!(
            PExpr::apply(f.clone(), vec![PExpr::constant(1), PExpr::constant(2)]),
            PExpr::Const(3)
        );
        let e = PExpr::apply(f, vec![p("i"), PExpr::constant(2)]);
        assert_eq!(format!("{e}"), "f(i, 2)");
        assert_eq!(e.params().len(), 1);
    }
}
