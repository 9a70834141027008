//! # Order Encoding
//!
//! A [`RangeInteger`] with range `[min,max]` is represented by the decreasing chain of order
//! literals `x>=i` for `i` in `(min,max]`. The literals `x>=min` and `x>=max+1` are the truth
//! constant and its negation, they are never materialized as variables.
//!
//! Sums only allocate order variables for the values of their tight range. Shifts by a
//! constant and scaling by a constant are views that reuse the order literals of the
//! underlying integer.
//!
//! ## References
//!
//! - Naoyuki Tamura, Akiko Taga, Satoshi Kitagawa and Mutsunori Banbara: _Compiling Finite
//!   Linear CSP into SAT_, Constraints 2009.

use std::{fmt, rc::Rc};

use tracing::trace;

use super::{atomics, emit, first_request, lit_value, BoundedInteger, Deferred};
use crate::{
    instances::{CollectClauses, ManageVars},
    types::{Lit, Solution},
    Error,
};

/// An integer in the order encoding
#[derive(Clone)]
pub struct RangeInteger(Rc<RangeNode>);

struct RangeNode {
    kind: RangeKind,
    min: i64,
    max: i64,
    truth: Lit,
    repr: String,
}

enum RangeKind {
    Variable {
        order: Vec<Lit>,
    },
    Constant,
    Plus {
        lhs: RangeInteger,
        rhs: RangeInteger,
        order: Vec<Lit>,
    },
    Shift {
        inner: RangeInteger,
        offset: i64,
    },
    Scale {
        inner: RangeInteger,
        factor: i64,
    },
    Conditional {
        cond: Lit,
        value: RangeInteger,
        definition: Deferred,
        order: Vec<Lit>,
    },
}

/// Registers the order variables `<prefix>>=i` for `i` in `(min,max]`
fn order_vars(prefix: &str, min: i64, max: i64, var_manager: &mut dyn ManageVars) -> Vec<Lit> {
    (min + 1..=max)
        .map(|i| {
            var_manager
                .named_var(&format!("{prefix}>={i}"))
                .pos_atom()
                .lit()
        })
        .collect()
}

/// Registers the order variables of a new integer variable, none of which may exist yet
fn fresh_order_vars(
    name: &str,
    min: i64,
    max: i64,
    var_manager: &mut dyn ManageVars,
) -> Result<Vec<Lit>, Error> {
    (min + 1..=max)
        .map(|i| {
            var_manager
                .fresh_var(&format!("{name}>={i}"))
                .map(|var| var.pos_atom().lit())
        })
        .collect()
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

impl RangeInteger {
    fn from_node(kind: RangeKind, min: i64, max: i64, truth: Lit, repr: String) -> Self {
        debug_assert!(min <= max);
        RangeInteger(Rc::new(RangeNode {
            kind,
            min,
            max,
            truth,
            repr,
        }))
    }

    /// Creates an integer variable with range `[min,max]` whose order variables are named
    /// `<name>>=i`
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRange`] if `min > max`, [`Error::Redeclaration`] if an order variable
    /// name is already in use.
    pub fn variable(
        name: &str,
        min: i64,
        max: i64,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        if min > max {
            return Err(Error::EmptyRange {
                name: name.to_string(),
                min,
                max,
            });
        }
        trace!(name, min, max, "order encoded variable");
        let order = fresh_order_vars(name, min, max, var_manager)?;
        Ok(Self::from_node(
            RangeKind::Variable { order },
            min,
            max,
            var_manager.truth_lit(),
            name.to_string(),
        ))
    }

    /// Creates a constant
    pub fn constant(value: i64, var_manager: &dyn ManageVars) -> Self {
        Self::constant_with(value, var_manager.truth_lit())
    }

    fn constant_with(value: i64, truth: Lit) -> Self {
        Self::from_node(RangeKind::Constant, value, value, truth, value.to_string())
    }

    /// Gets the value if the integer is a constant
    #[must_use]
    pub fn as_const(&self) -> Option<i64> {
        (self.0.min == self.0.max).then_some(self.0.min)
    }

    /// Gets the truth constant the integer was built with
    #[must_use]
    pub fn truth(&self) -> Lit {
        self.0.truth
    }

    /// Gets the literal `self >= value`. Values outside of the range give the truth constant
    /// or its negation.
    #[must_use]
    pub fn geq(&self, value: i64) -> Lit {
        let node = &self.0;
        if value <= node.min {
            return node.truth;
        }
        if value > node.max {
            return !node.truth;
        }
        match &node.kind {
            RangeKind::Variable { order }
            | RangeKind::Plus { order, .. }
            | RangeKind::Conditional { order, .. } => order[(value - node.min - 1) as usize],
            RangeKind::Constant => unreachable!("constants have no order variables"),
            RangeKind::Shift { inner, offset } => inner.geq(value - offset),
            RangeKind::Scale { inner, factor } if *factor > 0 => {
                inner.geq(div_ceil(value, *factor))
            }
            RangeKind::Scale { inner, factor } => !inner.geq(div_floor(value, *factor) + 1),
        }
    }

    /// Gets the integer `self + offset`. No variables are created.
    #[must_use]
    pub fn shift(&self, offset: i64) -> Self {
        if offset == 0 {
            return self.clone();
        }
        if let Some(val) = self.as_const() {
            return Self::constant_with(val + offset, self.0.truth);
        }
        // merge nested shifts
        let (inner, offset) = match &self.0.kind {
            RangeKind::Shift { inner, offset: off } if off + offset != 0 => {
                (inner.clone(), off + offset)
            }
            RangeKind::Shift { inner, .. } => return inner.clone(),
            _ => (self.clone(), offset),
        };
        let repr = format!("({inner} + {offset})");
        Self::from_node(
            RangeKind::Shift {
                inner: inner.clone(),
                offset,
            },
            inner.0.min + offset,
            inner.0.max + offset,
            self.0.truth,
            repr,
        )
    }

    /// Gets the integer `factor * self`. No variables are created.
    #[must_use]
    pub fn scale(&self, factor: i64) -> Self {
        if factor == 1 {
            return self.clone();
        }
        if factor == 0 {
            return Self::constant_with(0, self.0.truth);
        }
        if let Some(val) = self.as_const() {
            return Self::constant_with(factor * val, self.0.truth);
        }
        let (min, max) = if factor > 0 {
            (factor * self.0.min, factor * self.0.max)
        } else {
            (factor * self.0.max, factor * self.0.min)
        };
        let repr = format!("({factor} * {self})");
        Self::from_node(
            RangeKind::Scale {
                inner: self.clone(),
                factor,
            },
            min,
            max,
            self.0.truth,
            repr,
        )
    }

    /// Creates the sum of two integers. With practical bounds, the range of the sum is
    /// intersected with them and the operands are restricted accordingly.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRange`] if the practical bounds exclude every possible value.
    pub fn plus(
        lhs: &RangeInteger,
        rhs: &RangeInteger,
        practical: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        // operand order is canonical so that equal sums get equal names
        let (lhs, rhs) = if lhs.0.repr <= rhs.0.repr {
            (lhs, rhs)
        } else {
            (rhs, lhs)
        };
        let tight = (lhs.0.min + rhs.0.min, lhs.0.max + rhs.0.max);
        let (min, max) = practical.map_or(tight, |(lo, hi)| (tight.0.max(lo), tight.1.min(hi)));
        let clamped = (min, max) != tight;
        let repr = if clamped {
            format!("clamp({lhs} + {rhs}, {min}, {max})")
        } else {
            format!("({lhs} + {rhs})")
        };
        if min > max {
            return Err(Error::EmptyRange {
                name: repr,
                min,
                max,
            });
        }
        if !clamped {
            if let Some(val) = lhs.as_const() {
                return Ok(rhs.shift(val));
            }
            if let Some(val) = rhs.as_const() {
                return Ok(lhs.shift(val));
            }
        }
        let order = order_vars(&repr, min, max, var_manager);
        Ok(Self::from_node(
            RangeKind::Plus {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
                order,
            },
            min,
            max,
            var_manager.truth_lit(),
            repr,
        ))
    }

    /// Creates the sum of any number of integers as a balanced tree of binary sums.
    /// Constant operands are folded into a shift of the result. Practical bounds apply to
    /// the whole sum if it has at least two non-constant operands.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRange`] if the practical bounds exclude every possible value.
    pub fn sum(
        parts: Vec<RangeInteger>,
        practical: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        let (consts, vars): (Vec<_>, Vec<_>) =
            parts.into_iter().partition(|p| p.as_const().is_some());
        let offset: i64 = consts.iter().filter_map(RangeInteger::as_const).sum();
        if vars.is_empty() {
            return Ok(Self::constant(offset, var_manager));
        }
        let practical = practical.map(|(lo, hi)| (lo - offset, hi - offset));
        Ok(Self::balanced(&vars, practical, var_manager)?.shift(offset))
    }

    fn balanced(
        parts: &[RangeInteger],
        practical: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        if parts.len() == 1 {
            return Ok(parts[0].clone());
        }
        let (left, right) = parts.split_at(parts.len() / 2);
        let left = Self::balanced(left, None, var_manager)?;
        let right = Self::balanced(right, None, var_manager)?;
        Self::plus(&left, &right, practical, var_manager)
    }

    /// Creates the integer `cond ? value : 0`. The clauses defining the condition literal are
    /// only added together with the well-definedness clauses of the result.
    pub fn conditional(
        cond: Lit,
        cond_repr: &str,
        definition: Deferred,
        value: &RangeInteger,
        var_manager: &mut dyn ManageVars,
    ) -> Self {
        let truth = var_manager.truth_lit();
        if cond == truth {
            return value.clone();
        }
        if cond == !truth || value.as_const() == Some(0) {
            return Self::constant_with(0, truth);
        }
        let min = value.0.min.min(0);
        let max = value.0.max.max(0);
        let repr = format!("({cond_repr} ? {value} : 0)");
        let order = order_vars(&repr, min, max, var_manager);
        Self::from_node(
            RangeKind::Conditional {
                cond,
                value: value.clone(),
                definition,
                order,
            },
            min,
            max,
            truth,
            repr,
        )
    }

    fn wd_key(&self) -> String {
        format!("range-wd:{}", self.0.repr)
    }

    fn order(&self) -> &[Lit] {
        match &self.0.kind {
            RangeKind::Variable { order }
            | RangeKind::Plus { order, .. }
            | RangeKind::Conditional { order, .. } => order,
            _ => &[],
        }
    }

    /// `x>=i -> x>=i-1`
    fn add_chain(&self, collector: &mut dyn CollectClauses) {
        self.order()
            .windows(2)
            .for_each(|w| emit(collector, self.0.truth, atomics::lit_impl_lit(w[1], w[0])));
    }
}

impl BoundedInteger for RangeInteger {
    fn min(&self) -> i64 {
        self.0.min
    }

    fn max(&self) -> i64 {
        self.0.max
    }

    fn add_well_definedness(
        &self,
        collector: &mut dyn CollectClauses,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error> {
        let truth = self.0.truth;
        match &self.0.kind {
            RangeKind::Constant => Ok(()),
            RangeKind::Shift { inner, .. } | RangeKind::Scale { inner, .. } => {
                inner.add_well_definedness(collector, var_manager)
            }
            RangeKind::Variable { .. } => {
                if first_request(collector, self.wd_key()) {
                    self.add_chain(collector);
                }
                Ok(())
            }
            RangeKind::Plus { lhs, rhs, .. } => {
                if !first_request(collector, self.wd_key()) {
                    return Ok(());
                }
                lhs.add_well_definedness(collector, var_manager)?;
                rhs.add_well_definedness(collector, var_manager)?;
                self.add_chain(collector);
                // lhs>=i & rhs>=j -> sum>=i+j
                for i in lhs.0.min..=lhs.0.max {
                    for j in rhs.0.min..=rhs.0.max {
                        let cl = atomics::cube_impl_lit(&[lhs.geq(i), rhs.geq(j)], self.geq(i + j));
                        emit(collector, truth, cl);
                    }
                }
                // lhs<i & rhs<j -> sum<i+j-1
                for i in lhs.0.min + 1..=lhs.0.max + 1 {
                    for j in rhs.0.min + 1..=rhs.0.max + 1 {
                        let cl = atomics::cube_impl_lit(
                            &[!lhs.geq(i), !rhs.geq(j)],
                            !self.geq(i + j - 1),
                        );
                        emit(collector, truth, cl);
                    }
                }
                Ok(())
            }
            RangeKind::Conditional {
                cond,
                value,
                definition,
                ..
            } => {
                if !first_request(collector, self.wd_key()) {
                    return Ok(());
                }
                definition.add_once(collector, var_manager)?;
                value.add_well_definedness(collector, var_manager)?;
                for i in self.0.min + 1..=self.0.max {
                    let (out, val) = (self.geq(i), value.geq(i));
                    if i <= 0 {
                        // out <-> (!cond | val)
                        emit(collector, truth, [!out, !*cond, val]);
                        emit(collector, truth, [*cond, out]);
                        emit(collector, truth, [!val, out]);
                    } else {
                        // out <-> (cond & val)
                        emit(collector, truth, [!out, *cond]);
                        emit(collector, truth, [!out, val]);
                        emit(collector, truth, [!*cond, !val, out]);
                    }
                }
                Ok(())
            }
        }
    }

    fn value(&self, solution: &Solution) -> Option<i64> {
        let mut val = self.0.min;
        for i in self.0.min + 1..=self.0.max {
            if !lit_value(solution, self.0.truth, self.geq(i))? {
                break;
            }
            val = i;
        }
        Some(val)
    }
}

impl PartialEq for RangeInteger {
    fn eq(&self, other: &Self) -> bool {
        self.0.repr == other.0.repr
    }
}

impl Eq for RangeInteger {}

impl fmt::Display for RangeInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.repr)
    }
}

impl fmt::Debug for RangeInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeInteger({} in [{},{}])", self.0.repr, self.0.min, self.0.max)
    }
}

/// Adds clauses enforcing `a >= b`, each extended by the guard literals.
///
/// Only the boundary and overlap clauses are needed: if `b` may be smaller than the lower
/// bound of `a`, `a` has to reach the lower bound of `b`, if `b` may be larger than the upper
/// bound of `a`, `b` has to stay below it, and in the overlap of both ranges `b>=i` has to
/// imply `a>=i`. Everything else follows by the monotonicity of the order literals.
pub fn geq(a: &RangeInteger, b: &RangeInteger, guard: &[Lit], collector: &mut dyn CollectClauses) {
    let truth = a.0.truth;
    let guarded = |lits: &[Lit]| lits.iter().chain(guard).copied().collect::<Vec<_>>();
    if a.0.max < b.0.min {
        emit(collector, truth, guard.iter().copied());
        return;
    }
    if b.0.min > a.0.min {
        emit(collector, truth, guarded(&[a.geq(b.0.min)]));
    }
    if b.0.max > a.0.max {
        emit(collector, truth, guarded(&[!b.geq(a.0.max + 1)]));
    }
    let mut last = None;
    for i in a.0.min.max(b.0.min) + 1..=a.0.max.min(b.0.max) {
        let pair = (b.geq(i), a.geq(i));
        if last == Some(pair) {
            continue;
        }
        last = Some(pair);
        emit(
            collector,
            truth,
            atomics::lit_impl_clause(pair.0, &guarded(&[pair.1])),
        );
    }
}

/// Adds clauses enforcing `a < b`, each extended by the guard literals
pub fn less(a: &RangeInteger, b: &RangeInteger, guard: &[Lit], collector: &mut dyn CollectClauses) {
    geq(b, &a.shift(1), guard, collector);
}

/// Adds clauses enforcing `a = b`, each extended by the guard literals
pub fn equals(
    a: &RangeInteger,
    b: &RangeInteger,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
) {
    if a.0.max < b.0.min || b.0.max < a.0.min {
        emit(collector, a.0.truth, guard.iter().copied());
        return;
    }
    geq(a, b, guard, collector);
    geq(b, a, guard, collector);
}

/// Adds clauses enforcing `a != b`, each extended by the guard literals. For every value `v`
/// both integers can take, `a = v` and `b = v` must not hold at the same time.
pub fn not_equals(
    a: &RangeInteger,
    b: &RangeInteger,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
) {
    for v in a.0.min.max(b.0.min)..=a.0.max.min(b.0.max) {
        let cl = [!a.geq(v), a.geq(v + 1), !b.geq(v), b.geq(v + 1)];
        emit(collector, a.0.truth, cl.into_iter().chain(guard.iter().copied()));
    }
}

#[cfg(test)]
mod tests {
    use super::{div_ceil, div_floor, RangeInteger};
    use crate::{
        clause,
        encodings::BoundedInteger,
        instances::{ClauseCollection, CollectClauses, ManageVars, VarManager},
        types::Solution,
        Error,
    };

    #[test]
    fn division_rounding() {
        assert_eq!(div_floor(7, 2), 3);
        assert_eq!(div_floor(-7, 2), -4);
        assert_eq!(div_floor(7, -2), -4);
        assert_eq!(div_ceil(7, 2), 4);
        assert_eq!(div_ceil(-7, 2), -3);
        assert_eq!(div_ceil(-7, -2), 4);
        assert_eq!(div_ceil(6, 2), 3);
    }

    #[test]
    fn order_literals() {
        let mut vm = VarManager::new();
        let x = RangeInteger::variable("x", 3, 6, &mut vm).unwrap();
        let truth = vm.truth_lit();
        assert_eq!(x.geq(3), truth);
        assert_eq!(x.geq(-10), truth);
        assert_eq!(x.geq(7), !truth);
        assert_eq!(x.geq(4), vm.lookup("x>=4").unwrap().pos_atom().lit());
        assert_eq!(vm.n_used(), 4);
        assert_eq!(
            RangeInteger::variable("y", 2, 1, &mut vm),
            Err(Error::EmptyRange {
                name: "y".to_string(),
                min: 2,
                max: 1
            })
        );
    }

    #[test]
    fn views() {
        let mut vm = VarManager::new();
        let x = RangeInteger::variable("x", 0, 3, &mut vm).unwrap();
        let s = x.shift(2);
        assert_eq!((s.min(), s.max()), (2, 5));
        assert_eq!(s.geq(4), x.geq(2));
        assert_eq!(s.shift(-2), x);
        let d = x.scale(2);
        assert_eq!((d.min(), d.max()), (0, 6));
        assert_eq!(d.geq(3), x.geq(2));
        assert_eq!(d.geq(4), x.geq(2));
        let n = x.scale(-2);
        assert_eq!((n.min(), n.max()), (-6, 0));
        // -2x >= -3 <-> x <= 1
        assert_eq!(n.geq(-3), !x.geq(2));
        assert_eq!(format!("{n}"), "(-2 * x)");
        assert_eq!(x.scale(0).as_const(), Some(0));
    }

    #[test]
    fn sum_is_canonical() {
        let mut vm = VarManager::new();
        let x = RangeInteger::variable("x", 0, 2, &mut vm).unwrap();
        let y = RangeInteger::variable("y", 1, 3, &mut vm).unwrap();
        let s1 = RangeInteger::plus(&x, &y, None, &mut vm).unwrap();
        let n_used = vm.n_used();
        let s2 = RangeInteger::plus(&y, &x, None, &mut vm).unwrap();
        assert_eq!(s1, s2);
        assert_eq!(vm.n_used(), n_used);
        assert_eq!(format!("{s1}"), "(x + y)");
        assert_eq!((s1.min(), s1.max()), (1, 5));
        let c = RangeInteger::constant(4, &vm);
        let parts = vec![x.clone(), c, y.clone()];
        let s3 = RangeInteger::sum(parts, None, &mut vm).unwrap();
        assert_eq!(format!("{s3}"), "((x + y) + 4)");
        let clamped = RangeInteger::plus(&x, &y, Some((0, 3)), &mut vm).unwrap();
        assert_eq!((clamped.min(), clamped.max()), (1, 3));
        assert_eq!(format!("{clamped}"), "clamp(x + y, 1, 3)");
        assert!(RangeInteger::plus(&x, &y, Some((6, 9)), &mut vm).is_err());
    }

    #[test]
    fn comparison_against_constant() {
        let mut vm = VarManager::new();
        let a = RangeInteger::variable("a", 3, 6, &mut vm).unwrap();
        let mut col = ClauseCollection::new(&vm);
        a.add_well_definedness(&mut col, &mut vm).unwrap();
        let base = col.n_clauses();
        assert_eq!(base, 3);

        super::geq(&a, &RangeInteger::constant(4, &vm), &[], &mut col);
        assert_eq!(col.n_clauses(), base + 1);
        assert_eq!(col.iter().last(), Some(&clause![a.geq(4)]));

        super::geq(&a, &RangeInteger::constant(7, &vm), &[], &mut col);
        assert_eq!(col.n_clauses(), base + 2);
        assert_eq!(col.iter().last(), Some(&clause![!vm.truth_lit()]));

        super::geq(&a, &RangeInteger::constant(3, &vm), &[], &mut col);
        assert_eq!(col.n_clauses(), base + 2);
    }

    #[test]
    fn well_definedness_is_memoized() {
        let mut vm = VarManager::new();
        let x = RangeInteger::variable("x", 0, 2, &mut vm).unwrap();
        let y = RangeInteger::variable("y", 0, 2, &mut vm).unwrap();
        let s = RangeInteger::plus(&x, &y, None, &mut vm).unwrap();
        let mut col = ClauseCollection::new(&vm);
        s.add_well_definedness(&mut col, &mut vm).unwrap();
        let n = col.n_clauses();
        s.add_well_definedness(&mut col, &mut vm).unwrap();
        x.add_well_definedness(&mut col, &mut vm).unwrap();
        assert_eq!(col.n_clauses(), n);
        assert_eq!(col.n_memorized(), 3);
    }

    #[test]
    fn decode() {
        let mut vm = VarManager::new();
        let x = RangeInteger::variable("x", -1, 2, &mut vm).unwrap();
        let mut sol = Solution::default();
        sol.force(&vm.lookup("x>=0").unwrap(), true);
        sol.force(&vm.lookup("x>=1").unwrap(), true);
        assert_eq!(x.value(&sol), None);
        sol.force(&vm.lookup("x>=2").unwrap(), false);
        assert_eq!(x.value(&sol), Some(1));
        assert_eq!(x.scale(-3).value(&sol), Some(-3));
        assert_eq!(x.shift(5).value(&sol), Some(6));
    }
}
