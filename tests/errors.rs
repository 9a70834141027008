use paramsat::{
    encodings::{range::RangeInteger, Encoding},
    formula::Formula,
    instances::{ClauseCollection, CollectClauses, ManageVars, VarManager},
    params::{Assignment, PExpr, Parameter, ParameterList},
    quantified::{BoolVarDecl, IntVarDecl, QuantifiedInteger},
    Error,
};

fn one_to_three() -> ParameterList {
    ParameterList::new(vec![Parameter::new("i", 1, 3)]).unwrap()
}

#[test]
fn open_formula() {
    let mut vm = VarManager::new();
    let x = IntVarDecl::range("x", one_to_three(), 0, 4, &mut vm).unwrap();
    let xi = QuantifiedInteger::var(&x, vec![PExpr::param("i")]).unwrap();
    let f = Formula::geq(xi.clone(), 2);
    assert!(!f.is_closed());
    let mut col = ClauseCollection::new(&vm);
    let err = f.add_clauses(&mut col, &mut vm).unwrap_err();
    assert_eq!(
        err,
        Error::NotClosed {
            term: "(x[i] >= 2)".to_string(),
            operation: "encode"
        }
    );
    assert_eq!(
        err.to_string(),
        "cannot encode `(x[i] >= 2)`: the term still has free parameters"
    );
    assert!(matches!(
        xi.instantiate(&Assignment::new(), &mut vm),
        Err(Error::NotClosed {
            operation: "instantiate",
            ..
        })
    ));
    // nothing was emitted besides the truth constant
    assert_eq!(col.n_clauses(), 1);
}

#[test]
fn wrong_arity() {
    let mut vm = VarManager::new();
    let p = BoolVarDecl::new("P", one_to_three(), &mut vm).unwrap();
    let x = IntVarDecl::range("x", one_to_three(), 0, 4, &mut vm).unwrap();
    assert_eq!(
        Formula::quantified_atom(&p, vec![PExpr::constant(1), PExpr::constant(2)]).unwrap_err(),
        Error::Arity {
            name: "P".to_string(),
            expected: 1,
            found: 2
        }
    );
    assert!(matches!(
        QuantifiedInteger::var(&x, vec![]),
        Err(Error::Arity { .. })
    ));
}

#[test]
fn outside_domain() {
    let mut vm = VarManager::new();
    let p = BoolVarDecl::new("P", one_to_three(), &mut vm).unwrap();
    assert_eq!(
        Formula::quantified_atom(&p, vec![PExpr::constant(4)]).unwrap_err(),
        Error::OutsideDomain {
            name: "P".to_string(),
            index: "4".to_string()
        }
    );
    // the quantifier ranges beyond the declaration
    let body = Formula::quantified_atom(&p, vec![PExpr::param("i") + 1]).unwrap();
    let f = Formula::forall(Parameter::new("i", 1, 3), body);
    let mut col = ClauseCollection::new(&vm);
    assert!(matches!(
        f.add_clauses(&mut col, &mut vm),
        Err(Error::OutsideDomain { .. })
    ));
}

#[test]
fn mixed_encodings() {
    let mut vm = VarManager::new();
    let x = IntVarDecl::new(
        "x",
        ParameterList::empty(),
        &PExpr::constant(0),
        &PExpr::constant(3),
        Encoding::Range,
        &mut vm,
    )
    .unwrap();
    let y = IntVarDecl::binary("y", ParameterList::empty(), 0, 3, &mut vm).unwrap();
    let f = Formula::equals(
        QuantifiedInteger::var(&x, vec![]).unwrap(),
        QuantifiedInteger::var(&y, vec![]).unwrap(),
    );
    let mut col = ClauseCollection::new(&vm);
    assert_eq!(
        f.add_clauses(&mut col, &mut vm).unwrap_err(),
        Error::IncompatibleEncodings {
            lhs: "x".to_string(),
            rhs: "y".to_string()
        }
    );
}

#[test]
fn redeclaration() {
    let mut vm = VarManager::new();
    BoolVarDecl::new("P", one_to_three(), &mut vm).unwrap();
    assert_eq!(
        IntVarDecl::range("P", ParameterList::empty(), 0, 1, &mut vm).unwrap_err(),
        Error::Redeclaration("P".to_string())
    );
}

#[test]
fn declarations_never_alias_variables() {
    let mut vm = VarManager::new();
    let clash = |res: Result<(), Error>, name: &str| {
        assert_eq!(res.unwrap_err(), Error::Redeclaration(name.to_string()));
    };
    // the truth constant and existing elements are taken
    clash(
        BoolVarDecl::new("TRUE", ParameterList::empty(), &mut vm).map(|_| ()),
        "TRUE",
    );
    BoolVarDecl::new("P", one_to_three(), &mut vm).unwrap();
    clash(
        BoolVarDecl::new("P[1]", ParameterList::empty(), &mut vm).map(|_| ()),
        "P[1]",
    );
    IntVarDecl::range("x", ParameterList::empty(), 0, 3, &mut vm).unwrap();
    clash(
        BoolVarDecl::new("x>=1", ParameterList::empty(), &mut vm).map(|_| ()),
        "x>=1",
    );
    // names generated by a later declaration are checked as well
    BoolVarDecl::new("Q[2]", ParameterList::empty(), &mut vm).unwrap();
    clash(
        BoolVarDecl::new("Q", one_to_three(), &mut vm).map(|_| ()),
        "Q[2]",
    );
    BoolVarDecl::new("y>=2", ParameterList::empty(), &mut vm).unwrap();
    clash(
        IntVarDecl::range("y", ParameterList::empty(), 0, 3, &mut vm).map(|_| ()),
        "y>=2",
    );
    BoolVarDecl::new("z#b1", ParameterList::empty(), &mut vm).unwrap();
    clash(
        IntVarDecl::binary("z", ParameterList::empty(), 0, 3, &mut vm).map(|_| ()),
        "z#b1",
    );
    // the truth constant stays a constant
    assert_eq!(vm.lookup("TRUE").unwrap().var().idx(), 0);
    assert_ne!(vm.lookup("P[1]").unwrap().var().idx(), 0);
}

#[test]
fn invalid_parameter_lists() {
    assert_eq!(
        ParameterList::new(vec![
            Parameter::new("j", 1, PExpr::param("i")),
            Parameter::new("i", 1, 3),
        ])
        .unwrap_err(),
        Error::ForwardReference {
            parameter: "j".to_string(),
            reference: "i".to_string()
        }
    );
    assert_eq!(
        ParameterList::new(vec![Parameter::new("i", 1, 3), Parameter::new("i", 0, 1)])
            .unwrap_err(),
        Error::DuplicateParameter("i".to_string())
    );
}

#[test]
fn empty_ranges() {
    let mut vm = VarManager::new();
    assert_eq!(
        RangeInteger::variable("x", 3, 2, &mut vm).unwrap_err(),
        Error::EmptyRange {
            name: "x".to_string(),
            min: 3,
            max: 2
        }
    );
    // x[i] in [i, 2] is empty for i = 3
    assert!(matches!(
        IntVarDecl::range("x", one_to_three(), PExpr::param("i"), 2, &mut vm),
        Err(Error::EmptyRange { .. })
    ));
}

#[test]
fn division_by_zero() {
    let mut vm = VarManager::new();
    let list = ParameterList::new(vec![Parameter::new("i", 0, 2)]).unwrap();
    let res = IntVarDecl::range(
        "x",
        list,
        0,
        PExpr::div(PExpr::constant(4), PExpr::param("i")),
        &mut vm,
    );
    assert!(matches!(res, Err(Error::DivisionByZero { .. })));
}
