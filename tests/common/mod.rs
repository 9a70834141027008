//! Checks produced clause sets with the BatSat solver

#![allow(dead_code)]

use batsat::{intmap::AsIndex, lbool, SolverInterface};
use paramsat::{
    encodings::{BoundedInteger, Integer},
    instances::ClauseCollection,
    types::{Lit, Solution, TernaryVal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResult {
    Sat,
    Unsat,
}

/// A solver loaded with the clauses of a collection. Variable `i` is BatSat variable `i+1`.
pub struct Solver {
    internal: batsat::BasicSolver,
    n_vars: u32,
}

fn to_batsat(solver: &mut batsat::BasicSolver, lit: Lit) -> batsat::Lit {
    let idx = u32::try_from(lit.vidx()).unwrap() + 1;
    batsat::Lit::new(solver.var_of_int(idx), lit.is_pos())
}

impl Solver {
    pub fn new(collection: &ClauseCollection) -> Self {
        let mut internal = batsat::BasicSolver::default();
        let mut n_vars = 0;
        for cl in collection.iter() {
            let mut lits: Vec<_> = cl
                .iter()
                .map(|&l| {
                    n_vars = n_vars.max(u32::try_from(l.vidx()).unwrap() + 1);
                    to_batsat(&mut internal, l)
                })
                .collect();
            internal.add_clause_reuse(&mut lits);
        }
        Solver { internal, n_vars }
    }

    pub fn solve_assumps(&mut self, assumps: &[Lit]) -> SolverResult {
        let assumps: Vec<_> = assumps
            .iter()
            .map(|&l| {
                self.n_vars = self.n_vars.max(u32::try_from(l.vidx()).unwrap() + 1);
                to_batsat(&mut self.internal, l)
            })
            .collect();
        match self.internal.solve_limited(&assumps) {
            x if x == lbool::TRUE => SolverResult::Sat,
            x if x == lbool::FALSE => SolverResult::Unsat,
            _ => unreachable!("no limit is set"),
        }
    }

    pub fn solve(&mut self) -> SolverResult {
        self.solve_assumps(&[])
    }

    /// The model of the last satisfiable call, unassigned variables are false
    pub fn solution(&self) -> Solution {
        (0..self.n_vars)
            .map(|idx| {
                let var = batsat::Var::from_index(idx as usize + 1);
                let val = self.internal.value_lit(batsat::Lit::new(var, true));
                Lit::new(idx, val != lbool::TRUE)
            })
            .collect()
    }
}

/// Literals fixing a variable integer to a value
pub fn force_value(int: &Integer, value: i64) -> Vec<Lit> {
    match int {
        Integer::Range(int) => (int.min() + 1..=int.max())
            .map(|i| if i <= value { int.geq(i) } else { !int.geq(i) })
            .collect(),
        Integer::Binary(int) => {
            let mut lits: Vec<Lit> = int
                .bits()
                .iter()
                .enumerate()
                .map(|(k, &b)| if (value >> k) & 1 == 1 { b } else { !b })
                .collect();
            lits.push(if value < 0 { int.sign() } else { !int.sign() });
            lits
        }
    }
}

/// Checks the value of a literal in a solution
pub fn is_true(solution: &Solution, lit: Lit) -> bool {
    solution.lit_value(lit) == TernaryVal::True
}
