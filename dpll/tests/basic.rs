use dpll::*;
use itertools::Itertools;
use sattrait::{Cnf, SatEngine, SatOutcome};

#[test]
fn blocking_clauses_enumerate_all_models() {
    let mut cnf = Cnf::new();
    cnf.add_clause(vec![1, 2, 3]);

    let mut s = Solver::new();
    let mut models = Vec::new();
    while let SatOutcome::Sat(model) = SatEngine::solve(&mut s, &cnf) {
        println!("model: {:?}", model);
        assert!(!models.contains(&model));
        cnf.add_clause(model.iter().map(|l| -l));
        models.push(model);
    }
    // every assignment except all-false
    assert_eq!(models.len(), 7);
}

#[test]
fn assignments_of_two_variables() {
    // forcing each combination of signs through unit clauses
    for (a, b) in [1, -1].iter().cartesian_product([2, -2].iter()) {
        let mut cnf = Cnf::new();
        cnf.add_clause(vec![1, 2]);
        cnf.add_clause(vec![*a]);
        cnf.add_clause(vec![*b]);
        let result = Solver::new().solve(&cnf);
        if *a < 0 && *b < 0 {
            assert_eq!(result, SatOutcome::Unsat);
        } else {
            assert_eq!(result, SatOutcome::Sat(vec![*a, *b]));
        }
    }
}

#[test]
fn parses_dimacs_text() {
    let cnf = cnf_from_dimacs("p cnf 3 2\n1 -3 0\n2 0\n").unwrap();
    assert_eq!(cnf.num_vars(), 3);
    assert_eq!(cnf.clauses().collect::<Vec<_>>(), vec![&[1, -3][..], &[2][..]]);
    assert!(cnf_from_dimacs("p cnf x").is_err());
}
