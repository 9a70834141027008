use paramsat::{
    formula::Formula,
    instances::{ClauseCollection, CollectClauses, ManageVars, VarManager},
    params::{PConstraint, PExpr, Parameter, ParameterList},
    quantified::BoolVarDecl,
    types::{Lit, Solution, Variable},
};

mod common;
use common::{Solver, SolverResult};

fn setup() -> (VarManager, Vec<Variable>) {
    let mut vm = VarManager::new();
    let vars = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|n| vm.named_var(n))
        .collect();
    (vm, vars)
}

/// A selection of formulas over the five atoms `a` to `e` covering every connective
fn formulas(v: &[Variable]) -> Vec<Formula> {
    let [a, b, c, d, e] = [0, 1, 2, 3, 4].map(|i| Formula::var(&v[i]));
    vec![
        a.clone() & b.clone(),
        a.clone() | !b.clone(),
        Formula::implies(a.clone() & b.clone(), c.clone()),
        Formula::implies(c.clone(), a.clone() | d.clone()),
        Formula::iff(a.clone(), b.clone() & c.clone()),
        Formula::iff(a.clone() | b.clone(), c.clone() | d.clone()),
        Formula::ite(a.clone(), b.clone(), c.clone()),
        Formula::ite(a.clone() & e.clone(), b.clone() | c.clone(), !d.clone()),
        !(Formula::iff(a.clone(), b.clone()) | Formula::ite(c.clone(), d.clone(), e.clone())),
        Formula::and(vec![
            Formula::or(vec![a.clone(), b.clone(), c.clone()]),
            Formula::implies(d.clone(), !e.clone()),
            Formula::iff(e.clone(), a.clone()),
        ]),
        Formula::or(vec![
            Formula::and(vec![a.clone(), !b.clone()]),
            Formula::and(vec![c.clone(), d.clone(), e.clone()]),
            Formula::ite(b.clone(), !a.clone(), Formula::constant(false)),
        ]),
        Formula::implies(
            Formula::ite(a.clone(), b.clone() & c.clone(), d.clone()),
            Formula::iff(e.clone(), a.clone() | c.clone()),
        ),
        Formula::constant(true),
        Formula::constant(false) | a,
    ]
}

fn assignment(vars: &[Variable], bits: u32) -> (Vec<Lit>, Solution) {
    let mut sol = Solution::default();
    let lits = vars
        .iter()
        .enumerate()
        .map(|(k, v)| {
            let val = bits & (1 << k) != 0;
            sol.force(v, val);
            if val {
                v.pos_atom().lit()
            } else {
                v.neg_atom().lit()
            }
        })
        .collect();
    (lits, sol)
}

#[test]
fn tseitin_definition_matches_truth_table() {
    let (mut vm, vars) = setup();
    for (idx, form) in formulas(&vars).into_iter().enumerate() {
        let out = vm.named_var(&format!("out{idx}")).pos_atom().lit();
        let mut col = ClauseCollection::new(&vm);
        form.add_clauses_def(out, &mut col, &mut vm).unwrap();
        let mut solver = Solver::new(&col);
        for bits in 0..32 {
            let (mut assumps, sol) = assignment(&vars, bits);
            let expected = form.evaluate(&sol).unwrap().unwrap();
            assumps.push(out);
            let pos = solver.solve_assumps(&assumps);
            assumps.pop();
            assumps.push(!out);
            let neg = solver.solve_assumps(&assumps);
            assert_eq!(
                (pos, neg),
                if expected {
                    (SolverResult::Sat, SolverResult::Unsat)
                } else {
                    (SolverResult::Unsat, SolverResult::Sat)
                },
                "{form} under {bits:05b}"
            );
        }
    }
}

#[test]
fn asserted_formula_matches_truth_table() {
    let (mut vm, vars) = setup();
    for form in formulas(&vars) {
        let mut col = ClauseCollection::new(&vm);
        form.add_clauses(&mut col, &mut vm).unwrap();
        let mut solver = Solver::new(&col);
        for bits in 0..32 {
            let (assumps, sol) = assignment(&vars, bits);
            let expected = if form.evaluate(&sol).unwrap().unwrap() {
                SolverResult::Sat
            } else {
                SolverResult::Unsat
            };
            assert_eq!(solver.solve_assumps(&assumps), expected, "{form} under {bits:05b}");
        }
    }
}

#[test]
fn one_sided_contracts() {
    let (mut vm, vars) = setup();
    let out = vm.named_var("out").pos_atom().lit();
    for form in formulas(&vars) {
        let mut implied = ClauseCollection::new(&vm);
        form.add_clauses_if_implied_by(out, &mut implied, &mut vm)
            .unwrap();
        let mut implies = ClauseCollection::new(&vm);
        form.add_clauses_if_implies(out, &mut implies, &mut vm)
            .unwrap();
        let (mut implied, mut implies) = (Solver::new(&implied), Solver::new(&implies));
        for bits in 0..32 {
            let (mut assumps, sol) = assignment(&vars, bits);
            let expected = form.evaluate(&sol).unwrap().unwrap();
            assumps.push(out);
            // out -> f fails exactly if f is false
            assert_eq!(
                implied.solve_assumps(&assumps) == SolverResult::Sat,
                expected,
                "{form} under {bits:05b}"
            );
            assumps.pop();
            assumps.push(!out);
            // f -> out fails exactly if f is true
            assert_eq!(
                implies.solve_assumps(&assumps) == SolverResult::Sat,
                !expected,
                "{form} under {bits:05b}"
            );
        }
    }
}

#[test]
fn sharing_is_idempotent() {
    let (mut vm, vars) = setup();
    let [a, b, c, d] = [0, 1, 2, 3].map(|i| Formula::var(&vars[i]));
    let shared = Formula::iff(a.clone(), b.clone() | c.clone());
    let rebuilt = Formula::iff(a, b | c);
    let f = Formula::and(vec![
        shared.clone() | d.clone(),
        rebuilt.clone() | !d.clone(),
        Formula::implies(d, shared),
    ]);
    let mut col = ClauseCollection::new(&vm);
    f.add_clauses(&mut col, &mut vm).unwrap();
    // the iff and the inner disjunction
    assert_eq!(col.n_memorized(), 2);
    assert!(col.is_in_memory(&format!("<{rebuilt}>")));
    let n_clauses = col.n_clauses();
    rebuilt.atom_for(&mut col, &mut vm).unwrap();
    assert_eq!(col.n_clauses(), n_clauses);
    assert_eq!(col.n_memorized(), 2);
}

#[test]
fn quantifier_expansion() {
    let mut vm = VarManager::new();
    let list = ParameterList::new(vec![Parameter::new("i", 1, 3)]).unwrap();
    let p = BoolVarDecl::new("P", list, &mut vm).unwrap();
    let body = Formula::quantified_atom(&p, vec![PExpr::param("i")]).unwrap();
    let all = Formula::forall(Parameter::new("i", 1, 3), body.clone());
    let expanded = all.translate().unwrap();
    assert_eq!(expanded.to_string(), "(P[1] & P[2] & P[3])");

    let mut quantified = ClauseCollection::new(&vm);
    all.add_clauses(&mut quantified, &mut vm).unwrap();
    let mut explicit = ClauseCollection::new(&vm);
    expanded.add_clauses(&mut explicit, &mut vm).unwrap();
    assert_eq!(quantified.cnf(), explicit.cnf());

    // restricted parameter ranges skip values
    let odd = Parameter::new("i", 1, 3).restricted(PConstraint::cmp(
        paramsat::params::CmpOp::Neq,
        PExpr::param("i"),
        PExpr::constant(2),
    ));
    let any = Formula::exists(odd, body);
    assert_eq!(any.translate().unwrap().to_string(), "(P[1] | P[3])");
}

#[test]
fn nested_quantifiers() {
    let mut vm = VarManager::new();
    let list = ParameterList::new(vec![
        Parameter::new("i", 1, 3),
        Parameter::new("j", PExpr::param("i"), 3),
    ])
    .unwrap();
    let q = BoolVarDecl::new("Q", list, &mut vm).unwrap();
    let body = Formula::quantified_atom(&q, vec![PExpr::param("i"), PExpr::param("j")]).unwrap();
    // every row of the triangle has a true element
    let f = Formula::forall(
        Parameter::new("i", 1, 3),
        Formula::exists(Parameter::new("j", PExpr::param("i"), 3), body),
    );
    let mut col = ClauseCollection::new(&vm);
    f.add_clauses(&mut col, &mut vm).unwrap();
    assert_eq!(col.n_clauses(), 4);
    let lit = |vm: &VarManager, name: &str| vm.lookup(name).unwrap().pos_atom().lit();
    let mut solver = Solver::new(&col);
    assert_eq!(
        solver.solve_assumps(&[!lit(&vm, "Q[3,3]")]),
        SolverResult::Unsat
    );
    assert_eq!(
        solver.solve_assumps(&[!lit(&vm, "Q[1,1]"), !lit(&vm, "Q[1,2]")]),
        SolverResult::Sat
    );
    assert!(solver.solution().lit_value(lit(&vm, "Q[1,3]")) == paramsat::types::TernaryVal::True);
}
