//! # Two's-Complement Encoding
//!
//! A [`BinaryInteger`] of length `n` consists of the bits `b_0..b_{n-1}` with weights `2^i`
//! and a sign bit with weight `-2^n`. The length is the smallest one that covers the range
//! of the integer. Bit patterns outside of the range are excluded by the well-definedness
//! clauses, not by the representation.
//!
//! Integers of different lengths are combined by sign-extending the shorter one: all bits
//! above its length are its sign bit. No variables are created for this.
//!
//! Sums are ripple-carry adders whose sum and carry bits are fully defined. Comparisons go
//! through a majority-chain comparator on the offset-binary form of both operands (the sign
//! bit flipped into the most significant position).

use std::{fmt, rc::Rc};

use tracing::trace;

use super::{atomics, emit, first_request, lit_value, BoundedInteger, Deferred};
use crate::{
    instances::{CollectClauses, ManageVars},
    types::{Lit, Solution},
    Error,
};

/// An integer in the two's-complement encoding
#[derive(Clone)]
pub struct BinaryInteger(Rc<BinaryNode>);

struct BinaryNode {
    kind: BinaryKind,
    min: i64,
    max: i64,
    bits: Vec<Lit>,
    sign: Lit,
    truth: Lit,
    repr: String,
}

enum BinaryKind {
    Variable,
    Constant,
    Plus {
        lhs: BinaryInteger,
        rhs: BinaryInteger,
        carries: Vec<Lit>,
        clamped: bool,
    },
    Shl {
        inner: BinaryInteger,
    },
    Complement {
        inner: BinaryInteger,
    },
    Conditional {
        cond: Lit,
        value: BinaryInteger,
        definition: Deferred,
    },
}

/// Gets the number of bits (without the sign bit) needed to represent every value in
/// `[min,max]`. At least one bit is used.
#[must_use]
pub fn width(min: i64, max: i64) -> usize {
    let mut n = 1;
    if min >= 0 {
        while max >= 1_i64 << n {
            n += 1;
        }
    } else {
        while min < -(1_i64 << n) || max > (1_i64 << n) - 1 {
            n += 1;
        }
    }
    n
}

fn named_lit(var_manager: &mut dyn ManageVars, name: &str) -> Lit {
    var_manager.named_var(name).pos_atom().lit()
}

fn fresh_lit(var_manager: &mut dyn ManageVars, name: &str) -> Result<Lit, Error> {
    Ok(var_manager.fresh_var(name)?.pos_atom().lit())
}

impl BinaryInteger {
    fn from_node(
        kind: BinaryKind,
        min: i64,
        max: i64,
        bits: Vec<Lit>,
        sign: Lit,
        truth: Lit,
        repr: String,
    ) -> Self {
        debug_assert!(min <= max);
        BinaryInteger(Rc::new(BinaryNode {
            kind,
            min,
            max,
            bits,
            sign,
            truth,
            repr,
        }))
    }

    /// Creates an integer variable with range `[min,max]`. The bits are named `<name>#b<i>`,
    /// the sign bit `<name>#neg`. The sign bit is a constant if the range does not contain
    /// both negative and non-negative values.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRange`] if `min > max`, [`Error::Redeclaration`] if a bit name is
    /// already in use.
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
        let truth = var_manager.truth_lit();
        let n = width(min, max);
        trace!(name, min, max, n, "binary encoded variable");
        let bits = (0..n)
            .map(|i| fresh_lit(var_manager, &format!("{name}#b{i}")))
            .collect::<Result<_, _>>()?;
        let sign = if min >= 0 {
            !truth
        } else if max < 0 {
            truth
        } else {
            fresh_lit(var_manager, &format!("{name}#neg"))?
        };
        Ok(Self::from_node(
            BinaryKind::Variable,
            min,
            max,
            bits,
            sign,
            truth,
            name.to_string(),
        ))
    }

    /// Creates a constant
    pub fn constant(value: i64, var_manager: &dyn ManageVars) -> Self {
        Self::constant_with(value, var_manager.truth_lit())
    }

    fn constant_with(value: i64, truth: Lit) -> Self {
        let n = width(value, value);
        let to_lit = |b: bool| if b { truth } else { !truth };
        let bits = (0..n).map(|i| to_lit((value >> i) & 1 == 1)).collect();
        Self::from_node(
            BinaryKind::Constant,
            value,
            value,
            bits,
            to_lit(value < 0),
            truth,
            value.to_string(),
        )
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

    /// Gets the number of bits, not counting the sign bit
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.bits.len()
    }

    /// Always `false`, every integer has at least one bit
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.bits.is_empty()
    }

    /// Gets the bits, least significant first
    #[must_use]
    pub fn bits(&self) -> &[Lit] {
        &self.0.bits
    }

    /// Gets the sign bit
    #[must_use]
    pub fn sign(&self) -> Lit {
        self.0.sign
    }

    /// Gets bit `k` of the sign-extended integer
    #[must_use]
    pub fn bit(&self, k: usize) -> Lit {
        self.0.bits.get(k).copied().unwrap_or(self.0.sign)
    }

    /// Gets the integer `self * 2^k`. No variables are created.
    #[must_use]
    pub fn shl(&self, k: usize) -> Self {
        if k == 0 {
            return self.clone();
        }
        if let Some(val) = self.as_const() {
            return Self::constant_with(val << k, self.0.truth);
        }
        let bits = std::iter::repeat(!self.0.truth)
            .take(k)
            .chain(self.0.bits.iter().copied())
            .collect();
        Self::from_node(
            BinaryKind::Shl {
                inner: self.clone(),
            },
            self.0.min << k,
            self.0.max << k,
            bits,
            self.0.sign,
            self.0.truth,
            format!("({self} << {k})"),
        )
    }

    /// Gets the integer `-self - 1` by flipping all bits. No variables are created.
    #[must_use]
    pub fn complement(&self) -> Self {
        if let Some(val) = self.as_const() {
            return Self::constant_with(-val - 1, self.0.truth);
        }
        if let BinaryKind::Complement { inner } = &self.0.kind {
            return inner.clone();
        }
        Self::from_node(
            BinaryKind::Complement {
                inner: self.clone(),
            },
            -self.0.max - 1,
            -self.0.min - 1,
            self.0.bits.iter().map(|&b| !b).collect(),
            !self.0.sign,
            self.0.truth,
            format!("~{self}"),
        )
    }

    /// Gets the integer `-self`
    ///
    /// # Errors
    ///
    /// Never for integers with a non-empty range.
    pub fn negate(&self, var_manager: &mut dyn ManageVars) -> Result<Self, Error> {
        let one = Self::constant_with(1, self.0.truth);
        Self::plus(&self.complement(), &one, None, var_manager)
    }

    /// Gets the integer `factor * self` as a sum of shifted copies
    ///
    /// # Errors
    ///
    /// Never for integers with a non-empty range.
    pub fn times(&self, factor: i64, var_manager: &mut dyn ManageVars) -> Result<Self, Error> {
        if factor < 0 {
            return self.times(-factor, var_manager)?.negate(var_manager);
        }
        let parts = (0..64 - factor.leading_zeros() as usize)
            .filter(|&k| (factor >> k) & 1 == 1)
            .map(|k| self.shl(k))
            .collect();
        Self::sum(parts, None, var_manager)
    }

    /// Creates the sum of two integers as a ripple-carry adder. With practical bounds, the
    /// result is restricted to their intersection with the range of the sum.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRange`] if the practical bounds exclude every possible value.
    pub fn plus(
        lhs: &BinaryInteger,
        rhs: &BinaryInteger,
        practical: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
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
        let truth = var_manager.truth_lit();
        // the width of the unclamped range keeps the addition exact
        let n = width(tight.0, tight.1);
        let bits = (0..n)
            .map(|k| named_lit(var_manager, &format!("{repr}#b{k}")))
            .collect();
        let sign = named_lit(var_manager, &format!("{repr}#neg"));
        let carries = (1..=n)
            .map(|k| named_lit(var_manager, &format!("{repr}#c{k}")))
            .collect();
        Ok(Self::from_node(
            BinaryKind::Plus {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
                carries,
                clamped,
            },
            min,
            max,
            bits,
            sign,
            truth,
            repr,
        ))
    }

    /// Creates the sum of any number of integers as a balanced tree of adders. Constant
    /// operands are added up and added to the result last. Practical bounds apply to the
    /// whole sum if it has at least two non-constant operands.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRange`] if the practical bounds exclude every possible value.
    pub fn sum(
        parts: Vec<BinaryInteger>,
        practical: Option<(i64, i64)>,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Self, Error> {
        let (consts, vars): (Vec<_>, Vec<_>) =
            parts.into_iter().partition(|p| p.as_const().is_some());
        let offset: i64 = consts.iter().filter_map(BinaryInteger::as_const).sum();
        if vars.is_empty() {
            return Ok(Self::constant(offset, var_manager));
        }
        let practical = practical.map(|(lo, hi)| (lo - offset, hi - offset));
        let sum = Self::balanced(&vars, practical, var_manager)?;
        if offset == 0 {
            return Ok(sum);
        }
        let offset = Self::constant(offset, var_manager);
        Self::plus(&sum, &offset, None, var_manager)
    }

    fn balanced(
        parts: &[BinaryInteger],
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

    /// Creates the integer `cond ? value : 0` by conjoining every bit of `value` with the
    /// condition. The clauses defining the condition literal are only added together with
    /// the well-definedness clauses of the result.
    pub fn conditional(
        cond: Lit,
        cond_repr: &str,
        definition: Deferred,
        value: &BinaryInteger,
        var_manager: &mut dyn ManageVars,
    ) -> Self {
        let truth = var_manager.truth_lit();
        if cond == truth {
            return value.clone();
        }
        if cond == !truth || value.as_const() == Some(0) {
            return Self::constant_with(0, truth);
        }
        let repr = format!("({cond_repr} ? {value} : 0)");
        let bits = (0..value.len())
            .map(|k| named_lit(var_manager, &format!("{repr}#b{k}")))
            .collect();
        let sign = if value.sign() == !truth {
            !truth
        } else {
            named_lit(var_manager, &format!("{repr}#neg"))
        };
        Self::from_node(
            BinaryKind::Conditional {
                cond,
                value: value.clone(),
                definition,
            },
            value.0.min.min(0),
            value.0.max.max(0),
            bits,
            sign,
            truth,
            repr,
        )
    }

    fn wd_key(&self) -> String {
        format!("bin-wd:{}", self.0.repr)
    }

    /// Excludes the bit patterns outside of `[min,max]`. On the offset-binary form `u`, a
    /// pattern is below the lower bound `l` if for some position `i` with `l_i = 1`, `u_i = 0`
    /// and `u` agrees with `l` above `i`. One clause excludes each such prefix, likewise for
    /// the upper bound.
    fn add_range_clauses(&self, collector: &mut dyn CollectClauses) {
        let n = self.len();
        let offset = 1_i64 << n;
        let u: Vec<Lit> = self
            .0
            .bits
            .iter()
            .copied()
            .chain(std::iter::once(!self.0.sign))
            .collect();
        let lower = self.0.min + offset;
        let upper = self.0.max + offset;
        let is_set = |val: i64, i: usize| (val >> i) & 1 == 1;
        // the literal that is false if `u` agrees with `val` at position `j`
        let differs = |val: i64, j: usize| if is_set(val, j) { !u[j] } else { u[j] };
        for i in 0..=n {
            if is_set(lower, i) {
                let cl = std::iter::once(u[i]).chain((i + 1..=n).map(|j| differs(lower, j)));
                emit(collector, self.0.truth, cl);
            }
            if !is_set(upper, i) {
                let cl = std::iter::once(!u[i]).chain((i + 1..=n).map(|j| differs(upper, j)));
                emit(collector, self.0.truth, cl);
            }
        }
    }

    fn add_adder_clauses(
        &self,
        lhs: &BinaryInteger,
        rhs: &BinaryInteger,
        carries: &[Lit],
        collector: &mut dyn CollectClauses,
    ) {
        let truth = self.0.truth;
        let n = self.len();
        for k in 0..=n {
            let (a, b) = (lhs.bit(k), rhs.bit(k));
            let carry_in = if k == 0 { !truth } else { carries[k - 1] };
            atomics::xor3_def(self.bit(k), a, b, carry_in)
                .into_iter()
                .for_each(|cl| emit(collector, truth, cl));
            // the carry out of the sign position is dropped
            if k < n {
                atomics::maj_def(carries[k], a, b, carry_in)
                    .into_iter()
                    .for_each(|cl| emit(collector, truth, cl));
            }
        }
    }
}

impl BoundedInteger for BinaryInteger {
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
        match &self.0.kind {
            BinaryKind::Constant => Ok(()),
            BinaryKind::Shl { inner } | BinaryKind::Complement { inner } => {
                inner.add_well_definedness(collector, var_manager)
            }
            BinaryKind::Variable => {
                if first_request(collector, self.wd_key()) {
                    self.add_range_clauses(collector);
                }
                Ok(())
            }
            BinaryKind::Plus {
                lhs,
                rhs,
                carries,
                clamped,
            } => {
                if !first_request(collector, self.wd_key()) {
                    return Ok(());
                }
                lhs.add_well_definedness(collector, var_manager)?;
                rhs.add_well_definedness(collector, var_manager)?;
                self.add_adder_clauses(lhs, rhs, carries, collector);
                if *clamped {
                    self.add_range_clauses(collector);
                }
                Ok(())
            }
            BinaryKind::Conditional {
                cond,
                value,
                definition,
            } => {
                if !first_request(collector, self.wd_key()) {
                    return Ok(());
                }
                definition.add_once(collector, var_manager)?;
                value.add_well_definedness(collector, var_manager)?;
                for k in 0..=self.len() {
                    atomics::and_def(self.bit(k), &[*cond, value.bit(k)])
                        .into_iter()
                        .for_each(|cl| emit(collector, self.0.truth, cl));
                }
                Ok(())
            }
        }
    }

    fn value(&self, solution: &Solution) -> Option<i64> {
        let truth = self.0.truth;
        let mut val = 0;
        for (i, &bit) in self.0.bits.iter().enumerate() {
            if lit_value(solution, truth, bit)? {
                val += 1 << i;
            }
        }
        if lit_value(solution, truth, self.0.sign)? {
            val -= 1 << self.len();
        }
        Some(val)
    }
}

impl PartialEq for BinaryInteger {
    fn eq(&self, other: &Self) -> bool {
        self.0.repr == other.0.repr
    }
}

impl Eq for BinaryInteger {}

impl fmt::Display for BinaryInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.repr)
    }
}

impl fmt::Debug for BinaryInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BinaryInteger({} in [{},{}], {} bits)",
            self.0.repr,
            self.0.min,
            self.0.max,
            self.len()
        )
    }
}

/// Gets the output of the comparator `a >= b`, adding its definition to the collection the
/// first time it is requested.
///
/// On the offset-binary forms, `g_k` states that the lowest `k+1` bits of `a` are at least
/// those of `b`. It holds if `a_k` is set and `b_k` is not, or if `a_k = b_k` and `g_{k-1}`
/// holds, which is the majority of `a_k`, `!b_k` and `g_{k-1}`.
fn comparator(
    a: &BinaryInteger,
    b: &BinaryInteger,
    collector: &mut dyn CollectClauses,
    var_manager: &mut dyn ManageVars,
) -> Lit {
    let truth = a.0.truth;
    if let (Some(x), Some(y)) = (a.as_const(), b.as_const()) {
        return if x >= y { truth } else { !truth };
    }
    let repr = format!("({a} >= {b})");
    let top = a.len().max(b.len());
    let outs: Vec<Lit> = (0..=top)
        .map(|k| named_lit(var_manager, &format!("{repr}#{k}")))
        .collect();
    if first_request(collector, format!("bin-ge:{repr}")) {
        let mut prev = truth;
        for (k, &out) in outs.iter().enumerate() {
            let (x, y) = if k == top {
                (!a.sign(), !b.sign())
            } else {
                (a.bit(k), b.bit(k))
            };
            atomics::maj_def(out, x, !y, prev)
                .into_iter()
                .for_each(|cl| emit(collector, truth, cl));
            prev = out;
        }
    }
    outs[top]
}

/// Adds clauses enforcing `a >= b`, each extended by the guard literals
pub fn geq(
    a: &BinaryInteger,
    b: &BinaryInteger,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
    var_manager: &mut dyn ManageVars,
) {
    let out = comparator(a, b, collector, var_manager);
    emit(collector, a.0.truth, std::iter::once(out).chain(guard.iter().copied()));
}

/// Adds clauses enforcing `a < b`, each extended by the guard literals
pub fn less(
    a: &BinaryInteger,
    b: &BinaryInteger,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
    var_manager: &mut dyn ManageVars,
) {
    let out = comparator(a, b, collector, var_manager);
    emit(collector, a.0.truth, std::iter::once(!out).chain(guard.iter().copied()));
}

/// Adds clauses enforcing `a = b` bit by bit, each extended by the guard literals
pub fn equals(
    a: &BinaryInteger,
    b: &BinaryInteger,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
    _var_manager: &mut dyn ManageVars,
) {
    let truth = a.0.truth;
    for k in 0..=a.len().max(b.len()) {
        let (x, y) = (a.bit(k), b.bit(k));
        emit(collector, truth, [!x, y].into_iter().chain(guard.iter().copied()));
        emit(collector, truth, [x, !y].into_iter().chain(guard.iter().copied()));
    }
}

/// Adds clauses enforcing `a != b`, each extended by the guard literals. Auxiliary
/// variables `d_k` imply that bit `k` of the two integers differs, one of them must hold.
pub fn not_equals(
    a: &BinaryInteger,
    b: &BinaryInteger,
    guard: &[Lit],
    collector: &mut dyn CollectClauses,
    var_manager: &mut dyn ManageVars,
) {
    let truth = a.0.truth;
    let repr = format!("({a} != {b})");
    let diffs: Vec<Lit> = (0..=a.len().max(b.len()))
        .map(|k| named_lit(var_manager, &format!("{repr}#{k}")))
        .collect();
    if first_request(collector, format!("bin-ne:{repr}")) {
        for (k, &d) in diffs.iter().enumerate() {
            let (x, y) = (a.bit(k), b.bit(k));
            emit(collector, truth, [!d, x, y]);
            emit(collector, truth, [!d, !x, !y]);
        }
    }
    emit(collector, truth, diffs.into_iter().chain(guard.iter().copied()));
}

#[cfg(test)]
mod tests {
    use super::{width, BinaryInteger};
    use crate::{
        encodings::BoundedInteger,
        instances::{ClauseCollection, CollectClauses, ManageVars, VarManager},
        types::{Lit, Solution},
    };

    /// Renders the bits most significant first
    fn pattern(int: &BinaryInteger) -> String {
        int.bits()
            .iter()
            .rev()
            .map(|&b| if b == int.truth() { '1' } else { '0' })
            .collect()
    }

    #[test]
    fn widths() {
        assert_eq!(width(0, 0), 1);
        assert_eq!(width(0, 1), 1);
        assert_eq!(width(0, 2), 2);
        assert_eq!(width(0, 83), 7);
        assert_eq!(width(-1, 0), 1);
        assert_eq!(width(-2, 1), 1);
        assert_eq!(width(-3, 1), 2);
        assert_eq!(width(-70, 5), 7);
        assert_eq!(width(-128, 127), 7);
    }

    #[test]
    fn constant_patterns() {
        let vm = VarManager::new();
        let c = BinaryInteger::constant(83, &vm);
        assert_eq!(c.len(), 7);
        assert_eq!(pattern(&c), "1010011");
        assert_eq!(c.sign(), !vm.truth_lit());
        let c = BinaryInteger::constant(-70, &vm);
        assert_eq!(c.len(), 7);
        assert_eq!(pattern(&c), "0111010");
        assert_eq!(c.sign(), vm.truth_lit());
        assert_eq!(c.value(&Solution::default()), Some(-70));
    }

    #[test]
    fn constant_arithmetic_folds() {
        let mut vm = VarManager::new();
        let c = BinaryInteger::constant(5, &vm);
        assert_eq!(c.complement().as_const(), Some(-6));
        assert_eq!(c.shl(2).as_const(), Some(20));
        assert_eq!(c.times(-3, &mut vm).unwrap().as_const(), Some(-15));
        assert_eq!(vm.n_used(), 1);
    }

    #[test]
    fn variable_layout() {
        let mut vm = VarManager::new();
        let x = BinaryInteger::variable("x", 0, 5, &mut vm).unwrap();
        assert_eq!(x.len(), 3);
        assert_eq!(x.sign(), !vm.truth_lit());
        assert_eq!(x.bit(7), x.sign());
        let y = BinaryInteger::variable("y", -4, 3, &mut vm).unwrap();
        assert_eq!(y.len(), 2);
        assert_eq!(y.sign(), vm.lookup("y#neg").unwrap().pos_atom().lit());
        let z = y.complement();
        assert_eq!((z.min(), z.max()), (-4, 3));
        assert_eq!(z.complement(), y);
        let s = x.shl(1);
        assert_eq!((s.min(), s.max()), (0, 10));
        assert_eq!(s.bit(0), !vm.truth_lit());
    }

    #[test]
    fn range_clauses_exclude_patterns() {
        let mut vm = VarManager::new();
        // three bits and a constant sign for [2,5]
        let x = BinaryInteger::variable("x", 2, 5, &mut vm).unwrap();
        let mut col = ClauseCollection::new(&vm);
        x.add_well_definedness(&mut col, &mut vm).unwrap();
        for val in 0..8_i64 {
            let sol: Solution = std::iter::once(vm.truth_lit())
                .chain(
                    x.bits()
                        .iter()
                        .enumerate()
                        .map(|(i, &b)| if (val >> i) & 1 == 1 { b } else { !b }),
                )
                .collect();
            let ok = col.iter().all(|cl| cl.evaluate(&sol).to_bool_with_def(false));
            assert_eq!(ok, (2..=5).contains(&val), "value {val}");
            assert_eq!(x.value(&sol), Some(val));
        }
        let n = col.n_clauses();
        x.add_well_definedness(&mut col, &mut vm).unwrap();
        assert_eq!(col.n_clauses(), n);
    }

    #[test]
    fn signed_range_clauses() {
        let mut vm = VarManager::new();
        let x = BinaryInteger::variable("x", -3, 2, &mut vm).unwrap();
        let mut col = ClauseCollection::new(&vm);
        x.add_well_definedness(&mut col, &mut vm).unwrap();
        let lits: Vec<Lit> = x.bits().iter().copied().chain([x.sign()]).collect();
        for pat in 0..8_i64 {
            let sol: Solution = std::iter::once(vm.truth_lit())
                .chain(
                    lits.iter()
                        .enumerate()
                        .map(|(i, &b)| if (pat >> i) & 1 == 1 { b } else { !b }),
                )
                .collect();
            let val = x.value(&sol).unwrap();
            let ok = col.iter().all(|cl| cl.evaluate(&sol).to_bool_with_def(false));
            assert_eq!(ok, (-3..=2).contains(&val), "value {val}");
        }
    }
}
