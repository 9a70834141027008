//! # Implications and Gate Definitions
//!
//! Clause shapes shared by the formula engine and the integer encodings. The `*_impl_*`
//! functions encode single implications, the `*_def` functions fully define an output
//! literal as a gate over input literals.

use std::ops::Not;

use crate::{
    clause,
    types::{Clause, Lit},
};

/// Implication of form `a -> b`
#[must_use]
pub fn lit_impl_lit(a: Lit, b: Lit) -> Clause {
    clause![!a, b]
}

/// Implication of form `a -> (b1 | b2 | ... | bm)`
#[must_use]
pub fn lit_impl_clause(a: Lit, b: &[Lit]) -> Clause {
    let mut cl = Clause::with_capacity(b.len() + 1);
    cl.add(!a);
    cl.extend(b.iter().copied());
    cl
}

/// Implication of form `(a1 & a2 & ... & an) -> b`
#[must_use]
pub fn cube_impl_lit(a: &[Lit], b: Lit) -> Clause {
    let mut cl: Clause = a.iter().copied().map(Not::not).collect();
    cl.add(b);
    cl
}

/// Implication of form `a -> (b1 & b2 & ... & bm)`
pub fn lit_impl_cube(a: Lit, b: &[Lit]) -> impl Iterator<Item = Clause> + '_ {
    b.iter().map(move |&bi| lit_impl_lit(a, bi))
}

/// Implication of form `(a1 | a2 | ... | an) -> b`
pub fn clause_impl_lit(a: &[Lit], b: Lit) -> impl Iterator<Item = Clause> + '_ {
    a.iter().map(move |&ai| lit_impl_lit(ai, b))
}

/// Definition `out <-> (a1 & a2 & ... & an)`
#[must_use]
pub fn and_def(out: Lit, ins: &[Lit]) -> Vec<Clause> {
    let mut cls: Vec<Clause> = lit_impl_cube(out, ins).collect();
    cls.push(cube_impl_lit(ins, out));
    cls
}

/// Definition `out <-> (a1 | a2 | ... | an)`
#[must_use]
pub fn or_def(out: Lit, ins: &[Lit]) -> Vec<Clause> {
    let mut cls: Vec<Clause> = clause_impl_lit(ins, out).collect();
    cls.push(lit_impl_clause(out, ins));
    cls
}

/// Definition `out <-> (a xor b)`
#[must_use]
pub fn xor_def(out: Lit, a: Lit, b: Lit) -> [Clause; 4] {
    [
        clause![!out, a, b],
        clause![!out, !a, !b],
        clause![out, !a, b],
        clause![out, a, !b],
    ]
}

/// Definition `out <-> (a xor b xor c)`, the sum bit of a full adder
#[must_use]
pub fn xor3_def(out: Lit, a: Lit, b: Lit, c: Lit) -> [Clause; 8] {
    [
        // odd number of true inputs
        clause![out, !a, b, c],
        clause![out, a, !b, c],
        clause![out, a, b, !c],
        clause![out, !a, !b, !c],
        // even number of true inputs
        clause![!out, a, b, c],
        clause![!out, !a, !b, c],
        clause![!out, !a, b, !c],
        clause![!out, a, !b, !c],
    ]
}

/// Definition `out <-> at least two of a, b, c`, the carry bit of a full adder
#[must_use]
pub fn maj_def(out: Lit, a: Lit, b: Lit, c: Lit) -> [Clause; 6] {
    [
        clause![out, !a, !b],
        clause![out, !a, !c],
        clause![out, !b, !c],
        clause![!out, a, b],
        clause![!out, a, c],
        clause![!out, b, c],
    ]
}
