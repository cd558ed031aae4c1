use crate::encoder::Clause;
use sattrait::{Literal, TheoryOracle, Verdict};

/// Which part of a theory-inconsistent assignment is turned into a
/// conflict clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Block the whole theory part of the assignment.
    Naive,
    /// Block the oracle's explanation, or the whole theory part when the
    /// oracle does not give one. With `shrink`, explanations from oracles
    /// that do not promise minimality are reduced by deletion first.
    Minimal { shrink: bool },
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        ConflictPolicy::Minimal { shrink: false }
    }
}

/// The clause saying that not all of `explanation` can hold.
pub fn build<A: Clone + PartialEq>(explanation: &[Literal<A>]) -> Clause<A> {
    explanation.iter().cloned().map(|l| !l).collect()
}

/// Deletion-based reduction of an inconsistent set of literals.
///
/// Drops one literal at a time and keeps the drop whenever the rest is
/// still inconsistent. The result has no inconsistent strict subset.
/// Returns the reduced set and the number of oracle calls spent.
pub fn shrink<A: Clone, T: TheoryOracle<A> + ?Sized>(
    oracle: &mut T,
    explanation: Vec<Literal<A>>,
) -> (Vec<Literal<A>>, usize) {
    let mut core = explanation;
    let mut checks = 0;
    let mut i = 0;
    while i < core.len() {
        let candidate = core
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, l)| l.clone())
            .collect::<Vec<_>>();
        checks += 1;
        match oracle.check(&candidate) {
            Verdict::Consistent => i += 1,
            Verdict::Inconsistent(_) => core = candidate,
        }
    }
    (core, checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sattrait::{Membership, UnsupportedAtomError};

    /// Atoms are integers; a set is inconsistent iff it asserts both 0 and
    /// some atom divisible by 3.
    struct Toy;

    impl TheoryOracle<u32> for Toy {
        fn classify(&self, _: &u32) -> Result<Membership, UnsupportedAtomError> {
            Ok(Membership::Theory)
        }
        fn check(&mut self, lits: &[Literal<u32>]) -> Verdict<u32> {
            let has = |p: &dyn Fn(u32) -> bool| lits.iter().any(|l| l.positive && p(l.atom));
            if has(&|a| a == 0) && has(&|a| a != 0 && a % 3 == 0) {
                Verdict::Inconsistent(None)
            } else {
                Verdict::Consistent
            }
        }
    }

    #[test]
    fn build_negates_every_literal() {
        let c = build(&[Literal::pos("a"), Literal::neg("b")]);
        assert_eq!(c, Clause::new(vec![Literal::neg("a"), Literal::pos("b")]));
        assert!(build::<&str>(&[]).is_empty());
    }

    #[test]
    fn shrink_to_a_minimal_core() {
        let all = (0..8u32).map(Literal::pos).collect::<Vec<_>>();
        let (core, checks) = shrink(&mut Toy, all);
        assert_eq!(core, vec![Literal::pos(0), Literal::pos(6)]);
        assert_eq!(checks, 8);
        assert!(Toy.check(&core[..1]).is_consistent());
        assert!(Toy.check(&core[1..]).is_consistent());
    }
}
