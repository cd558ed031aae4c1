use lazysmt::*;
use rdl::{Atom, RdlOracle};

/// `v <= -1` for each of `n` variables, plus one clause asking some `v >= 0`.
/// Every choice of the clause is inconsistent on its own.
fn family(n: usize) -> Vec<Clause<Atom>> {
    let vars = (0..n).map(|i| format!("v{}", i)).collect::<Vec<_>>();
    let mut formula = vars
        .iter()
        .map(|v| Clause::new(vec![Literal::pos(Atom::upper(v, -1))]))
        .collect::<Vec<_>>();
    formula.push(vars.iter().map(|v| Literal::pos(Atom::lower(v, 0))).collect());
    formula
}

fn iterations(n: usize, policy: ConflictPolicy) -> usize {
    let params = DriverParams {
        policy,
        ..Default::default()
    };
    let mut driver = Driver::with_params(dpll::Solver::new(), RdlOracle::new(), params);
    let result = driver.solve(&family(n)).unwrap();
    assert!(result.is_unsat());
    assert_eq!(driver.stats.conflict_clauses + 1, driver.stats.iterations);
    driver.stats.iterations
}

#[test]
fn naive_is_exponential() {
    for n in 1..=5 {
        assert_eq!(iterations(n, ConflictPolicy::Naive), 1 << n, "n = {}", n);
    }
}

#[test]
fn minimal_is_linear() {
    for n in 1..=5 {
        assert_eq!(iterations(n, ConflictPolicy::Minimal { shrink: false }), n + 1, "n = {}", n);
        assert_eq!(iterations(n, ConflictPolicy::Minimal { shrink: true }), n + 1, "n = {}", n);
    }
}

#[test]
fn minimal_explanations_are_not_shrunk() {
    let params = DriverParams {
        policy: ConflictPolicy::Minimal { shrink: true },
        ..Default::default()
    };
    let mut driver = Driver::with_params(dpll::Solver::new(), RdlOracle::new(), params);
    assert!(driver.solve(&family(4)).unwrap().is_unsat());
    assert_eq!(driver.stats.shrink_checks, 0);
    assert_eq!(driver.oracle.stats.checks, driver.stats.oracle_calls);
}
