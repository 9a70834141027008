//! # DIMACS Output
//!
//! Writes produced clause sets in the DIMACS CNF format. Variable `i` is written as `i+1`.
//!
//! ## References
//!
//! - DIMACS CNF: [SAT competition 2011 rules](http://www.satcompetition.org/2011/format-benchmarks2011.html)

use std::io::{self, Write};

use super::{Cnf, ManageVars, VarManager};
use crate::types::Clause;

/// Writes a CNF to a DIMACS CNF file
///
/// # Errors
///
/// If writing fails, returns [`io::Error`].
pub fn write_cnf_annotated<W: Write>(
    mut writer: W,
    cnf: &Cnf,
    n_vars: u32,
) -> Result<(), io::Error> {
    writeln!(writer, "c CNF file written by paramsat")?;
    writeln!(writer, "p cnf {n_vars} {}", cnf.len())?;
    cnf.iter()
        .try_for_each(|cl| write_clause(&mut writer, cl))?;
    writer.flush()
}

/// Writes a CNF together with the names of all variables as comment lines of the form
/// `c <dimacs index> <name>`
///
/// # Errors
///
/// If writing fails, returns [`io::Error`].
pub fn write_collection<W: Write>(
    mut writer: W,
    cnf: &Cnf,
    var_manager: &VarManager,
) -> Result<(), io::Error> {
    writeln!(writer, "c CNF file written by paramsat")?;
    var_manager
        .iter()
        .try_for_each(|v| writeln!(writer, "c {} {}", v.var().to_dimacs(), v.name()))?;
    writeln!(writer, "p cnf {} {}", var_manager.n_used(), cnf.len())?;
    cnf.iter()
        .try_for_each(|cl| write_clause(&mut writer, cl))?;
    writer.flush()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> Result<(), io::Error> {
    clause
        .iter()
        .try_for_each(|l| write!(writer, "{} ", l.to_dimacs()))?;
    writeln!(writer, "0")
}

#[cfg(test)]
mod tests {
    use super::{write_cnf_annotated, write_collection};
    use crate::{
        clause,
        instances::{Cnf, ManageVars, VarManager},
        lit,
    };

    #[test]
    fn write_plain_cnf() {
        let mut cnf = Cnf::new();
        cnf.add_clause(clause![lit![0], !lit![2]]);
        cnf.add_unit(lit![1]);
        let mut out = Vec::new();
        write_cnf_annotated(&mut out, &cnf, 3).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "c CNF file written by paramsat\np cnf 3 2\n1 -3 0\n2 0\n"
        );
    }

    #[test]
    fn write_with_names() {
        let mut vm = VarManager::new();
        let a = vm.named_var("a");
        let mut cnf = Cnf::new();
        cnf.add_clause(clause![!a.pos_atom().lit(), vm.truth_lit()]);
        let mut out = Vec::new();
        write_collection(&mut out, &cnf, &vm).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "c CNF file written by paramsat\nc 1 TRUE\nc 2 a\np cnf 2 1\n-2 1 0\n"
        );
    }
}
