use dpll::*;
use sattrait::{Cnf, SatOutcome};

fn for_each_cnf_filename(mut f: impl FnMut(&str)) {
    use std::{fs, path};
    let mut d = path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("tests/cnfs");
    for direntry in fs::read_dir(d).unwrap() {
        let path = direntry.unwrap().path();
        let s = path.to_str().unwrap();
        println!("Test file: {:?}", s);

        f(s);
    }
}

fn verify_model(cnf: &Cnf, model: &[i32]) -> bool {
    assert_eq!(model.len(), cnf.num_vars() as usize);
    for (i, l) in model.iter().enumerate() {
        assert_eq!(l.unsigned_abs() as usize, i + 1);
    }
    for c in cnf.clauses() {
        if !c.iter().any(|l| model[l.unsigned_abs() as usize - 1] == *l) {
            println!("  clause not sat: {:?}", c);
            return false;
        }
    }
    println!(
        "  ok -- sat model, checked {} clauses against {} variables",
        cnf.num_clauses(),
        model.len()
    );
    true
}

#[test]
fn correct_results_on_cnf_file_tests() {
    let _ = simple_logger::init_with_level(log::Level::Info);
    let mut nof_files = 0;
    for_each_cnf_filename(|filename| {
        nof_files += 1;
        let cnf = cnf_from_dimacs_filename(filename).unwrap();
        let expect_sat = !filename.rsplit('/').next().unwrap().starts_with("unsat");
        let mut solver = Solver::new();
        solver.verbosity = 1;
        match solver.solve(&cnf) {
            SatOutcome::Sat(model) => {
                assert!(expect_sat, "{} should be unsat", filename);
                assert!(verify_model(&cnf, &model));
            }
            SatOutcome::Unsat => assert!(!expect_sat, "{} should be sat", filename),
        }
    });
    assert_eq!(nof_files, 4);
}

#[test]
fn both_phases_agree() {
    for_each_cnf_filename(|filename| {
        let cnf = cnf_from_dimacs_filename(filename).unwrap();
        let mut a = Solver::new();
        let mut b = Solver::new();
        b.params.default_phase = true;
        let (ra, rb) = (a.solve(&cnf), b.solve(&cnf));
        assert_eq!(ra.is_sat(), rb.is_sat());
        if let SatOutcome::Sat(m) = rb {
            assert!(verify_model(&cnf, &m));
        }
    });
}

#[test]
fn missing_file_is_an_error() {
    match cnf_from_dimacs_filename("no/such/file.cnf") {
        Err(DimacsError::Io { path, .. }) => assert_eq!(path, "no/such/file.cnf"),
        other => panic!("unexpected {:?}", other.map(|c| c.num_clauses())),
    }
}
