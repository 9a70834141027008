//! # Parameter Constraints

use std::fmt;

use itertools::Itertools;

use super::{Assignment, PExpr, ParamSet, Substitution};
use crate::Error;

/// Comparison operators between parameter expressions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// Gets the operator of the negated comparison
    #[must_use]
    pub fn negate(self) -> CmpOp {
        match self {
            CmpOp::Eq => CmpOp::Neq,
            CmpOp::Neq => CmpOp::Eq,
            CmpOp::Lt => CmpOp::Ge,
            CmpOp::Le => CmpOp::Gt,
            CmpOp::Gt => CmpOp::Le,
            CmpOp::Ge => CmpOp::Lt,
        }
    }

    /// Applies the comparison to two values
    #[must_use]
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Neq => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            CmpOp::Eq => "=",
            CmpOp::Neq => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        write!(f, "{op}")
    }
}

/// A boolean constraint over parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PConstraint {
    /// A constant truth value
    Const(bool),
    /// A comparison of two expressions
    Cmp(CmpOp, PExpr, PExpr),
    /// A conjunction of at least two constraints
    And(Vec<PConstraint>),
    /// A disjunction of at least two constraints
    Or(Vec<PConstraint>),
    /// A negated junction
    Not(Box<PConstraint>),
}

impl Default for PConstraint {
    fn default() -> Self {
        PConstraint::Const(true)
    }
}

impl PConstraint {
    /// The constraint that always holds
    #[must_use]
    pub fn truth() -> Self {
        PConstraint::Const(true)
    }

    /// Creates a comparison, evaluating it if both sides are constant
    #[must_use]
    pub fn cmp(op: CmpOp, lhs: PExpr, rhs: PExpr) -> Self {
        match (lhs.as_const(), rhs.as_const()) {
            (Some(a), Some(b)) => PConstraint::Const(op.holds(a, b)),
            _ => PConstraint::Cmp(op, lhs, rhs),
        }
    }

    /// Creates a conjunction
    #[must_use]
    pub fn and(items: Vec<PConstraint>) -> Self {
        Self::junction(items, true)
    }

    /// Creates a disjunction
    #[must_use]
    pub fn or(items: Vec<PConstraint>) -> Self {
        Self::junction(items, false)
    }

    fn junction(items: Vec<PConstraint>, conj: bool) -> Self {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match item {
                // neutral element
                PConstraint::Const(b) if b == conj => (),
                // absorbing element
                PConstraint::Const(b) => return PConstraint::Const(b),
                PConstraint::And(inner) if conj => flat.extend(inner),
                PConstraint::Or(inner) if !conj => flat.extend(inner),
                item => flat.push(item),
            }
        }
        match flat.len() {
            0 => PConstraint::Const(conj),
            1 => flat.pop().unwrap_or(PConstraint::Const(conj)),
            _ if conj => PConstraint::And(flat),
            _ => PConstraint::Or(flat),
        }
    }

    /// Negates the constraint, removing double negations and negated comparisons
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            PConstraint::Const(b) => PConstraint::Const(!b),
            PConstraint::Cmp(op, lhs, rhs) => PConstraint::Cmp(op.negate(), lhs, rhs),
            PConstraint::Not(inner) => *inner,
            junction => PConstraint::Not(Box::new(junction)),
        }
    }

    /// Gets the free parameters of the constraint
    #[must_use]
    pub fn params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        self.collect_params(&mut params);
        params
    }

    /// Adds the free parameters of the constraint to a set
    pub fn collect_params(&self, params: &mut ParamSet) {
        match self {
            PConstraint::Const(_) => (),
            PConstraint::Cmp(_, lhs, rhs) => {
                lhs.collect_params(params);
                rhs.collect_params(params);
            }
            PConstraint::And(items) | PConstraint::Or(items) => {
                items.iter().for_each(|i| i.collect_params(params));
            }
            PConstraint::Not(inner) => inner.collect_params(params),
        }
    }

    /// Checks whether the constraint contains no parameters
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            PConstraint::Const(_) => true,
            PConstraint::Cmp(_, lhs, rhs) => lhs.is_closed() && rhs.is_closed(),
            PConstraint::And(items) | PConstraint::Or(items) => {
                items.iter().all(PConstraint::is_closed)
            }
            PConstraint::Not(inner) => inner.is_closed(),
        }
    }

    /// Evaluates the constraint
    ///
    /// # Errors
    ///
    /// If evaluating one of the compared expressions fails.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<bool, Error> {
        match self {
            PConstraint::Const(b) => Ok(*b),
            PConstraint::Cmp(op, lhs, rhs) => {
                Ok(op.holds(lhs.evaluate(assignment)?, rhs.evaluate(assignment)?))
            }
            PConstraint::And(items) => {
                for item in items {
                    if !item.evaluate(assignment)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            PConstraint::Or(items) => {
                for item in items {
                    if item.evaluate(assignment)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            PConstraint::Not(inner) => Ok(!inner.evaluate(assignment)?),
        }
    }

    /// Replaces parameters and simplifies the result
    #[must_use]
    pub fn substitute(&self, substitution: &Substitution) -> PConstraint {
        match self {
            PConstraint::Const(_) => self.clone(),
            PConstraint::Cmp(op, lhs, rhs) => PConstraint::cmp(
                *op,
                lhs.substitute(substitution),
                rhs.substitute(substitution),
            ),
            PConstraint::And(items) => {
                PConstraint::and(items.iter().map(|i| i.substitute(substitution)).collect())
            }
            PConstraint::Or(items) => {
                PConstraint::or(items.iter().map(|i| i.substitute(substitution)).collect())
            }
            PConstraint::Not(inner) => inner.substitute(substitution).negate(),
        }
    }
}

impl fmt::Display for PConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PConstraint::Const(b) => write!(f, "{b}"),
            PConstraint::Cmp(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            PConstraint::And(items) => write!(f, "({})", items.iter().format(" & ")),
            PConstraint::Or(items) => write!(f, "({})", items.iter().format(" | ")),
            PConstraint::Not(inner) => write!(f, "!{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CmpOp, PConstraint};
    use crate::params::{Assignment, PExpr, Substitution};

    fn lt(a: &str, b: &str) -> PConstraint {
        PConstraint::cmp(CmpOp::Lt, PExpr::param(a), PExpr::param(b))
    }

    #[test]
    fn double_negation() {
        let c = PConstraint::or(vec![lt("i", "j"), lt("j", "k")]);
        assert_eq!(c.clone().negate().negate(), c);
        assert_eq!(lt("i", "j").negate(), PConstraint::Cmp(CmpOp::Ge, "i".into(), "j".into()));
    }

    #[test]
    fn junction_simplification() {
        let c = PConstraint::and(vec![PConstraint::truth(), lt("i", "j")]);
        assert_eq!(c, lt("i", "j"));
        let c = PConstraint::or(vec![PConstraint::truth(), lt("i", "j")]);
        assert_eq!(c, PConstraint::Const(true));
        assert_eq!(PConstraint::and(vec![]), PConstraint::Const(true));
        assert_eq!(PConstraint::or(vec![]), PConstraint::Const(false));
    }

    #[test]
    fn substitute_closes() {
        let c = PConstraint::and(vec![lt("i", "j"), lt("j", "k")]).negate();
        assert_eq!(format!("{c}"), "!((i < j) & (j < k))");
        let subst: Substitution = [("i", PExpr::constant(1)), ("j", PExpr::constant(2))]
            .into_iter()
            .collect();
        let c = c.substitute(&subst);
        assert_eq!(format!("{c}"), "(2 >= k)");
        let subst: Substitution = [("k", PExpr::constant(5))].into_iter().collect();
        assert_eq!(c.substitute(&subst), PConstraint::Const(false));
    }

    #[test]
    fn evaluate() {
        let assign: Assignment = [("i", 1), ("j", 2)].into_iter().collect();
        assert_eq!(lt("i", "j").evaluate(&assign), Ok(true));
        assert_eq!(
            PConstraint::and(vec![lt("i", "j"), lt("j", "i")]).evaluate(&assign),
            Ok(false)
        );
        assert!(lt("i", "k").evaluate(&assign).is_err());
    }
}
