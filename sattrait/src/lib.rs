//! Contracts shared by the lazy SMT driver and its collaborators.
//!
//! The SAT engine and the theory oracle are treated as black boxes: the
//! driver only ever talks to them through `SatEngine` and `TheoryOracle`.

use std::fmt;
use thiserror::Error;

/// Propositional formula in conjunctive normal form, DIMACS style.
///
/// Variables are dense positive integers `1..=num_vars`, a literal is a
/// nonzero `i32` whose sign gives the polarity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    clauses: Vec<Vec<i32>>,
    num_vars: u32,
}

impl Cnf {
    pub fn new() -> Self {
        Cnf {
            clauses: Vec::new(),
            num_vars: 0,
        }
    }

    /// Add a clause. Panics on the literal `0`, which has no meaning.
    pub fn add_clause(&mut self, clause: impl IntoIterator<Item = i32>) {
        let clause = clause.into_iter().collect::<Vec<_>>();
        for l in clause.iter() {
            assert!(*l != 0, "0 is not a literal");
            self.num_vars = self.num_vars.max(l.unsigned_abs());
        }
        self.clauses.push(clause);
    }

    /// Make sure variables `1..=n` exist even if no clause mentions them.
    pub fn reserve_vars(&mut self, n: u32) {
        self.num_vars = self.num_vars.max(n);
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[i32]> {
        self.clauses.iter().map(|c| c.as_slice())
    }
}

/// Result of a SAT engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatOutcome {
    /// One signed entry per variable `1..=num_vars`, positive meaning true.
    Sat(Vec<i32>),
    Unsat,
}

impl SatOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatOutcome::Sat(_))
    }
}

/// A complete propositional solver, used as a black box.
///
/// Every call receives the whole formula; engines must not carry
/// information from one call into the next.
pub trait SatEngine {
    fn solve(&mut self, cnf: &Cnf) -> SatOutcome;
}

impl<E: SatEngine + ?Sized> SatEngine for &mut E {
    fn solve(&mut self, cnf: &Cnf) -> SatOutcome {
        (**self).solve(cnf)
    }
}

/// A theory atom together with a truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal<A> {
    pub atom: A,
    pub positive: bool,
}

impl<A> Literal<A> {
    pub fn new(atom: A, positive: bool) -> Self {
        Literal { atom, positive }
    }

    pub fn pos(atom: A) -> Self {
        Self::new(atom, true)
    }

    pub fn neg(atom: A) -> Self {
        Self::new(atom, false)
    }
}

impl<A: PartialEq> Literal<A> {
    pub fn is_complement_of(&self, other: &Self) -> bool {
        self.atom == other.atom && self.positive != other.positive
    }
}

impl<A> std::ops::Not for Literal<A> {
    type Output = Literal<A>;
    fn not(self) -> Literal<A> {
        Literal {
            atom: self.atom,
            positive: !self.positive,
        }
    }
}

impl<A: fmt::Display> fmt::Display for Literal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.atom)
        } else {
            write!(f, "¬({})", self.atom)
        }
    }
}

/// How an oracle relates to a given atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// The oracle reasons about the atom.
    Theory,
    /// A plain propositional atom; the theory has nothing to say about it.
    Boolean,
}

/// The atom looks like it belongs to the theory, but the oracle cannot
/// reason about it. Such atoms are passed through unchecked, which may
/// produce models the full theory would reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported atom `{atom}`: {reason}")]
pub struct UnsupportedAtomError {
    pub atom: String,
    pub reason: String,
}

impl UnsupportedAtomError {
    pub fn new(atom: impl fmt::Display, reason: impl Into<String>) -> Self {
        UnsupportedAtomError {
            atom: atom.to_string(),
            reason: reason.into(),
        }
    }
}

/// Answer of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<A> {
    Consistent,
    /// The literals cannot hold together. The explanation, if given, is a
    /// subset of the checked literals that is already inconsistent on its own.
    Inconsistent(Option<Vec<Literal<A>>>),
}

impl<A> Verdict<A> {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Verdict::Consistent)
    }
}

/// Decision procedure for a fixed background theory, used as a black box.
pub trait TheoryOracle<A> {
    fn classify(&self, atom: &A) -> Result<Membership, UnsupportedAtomError>;

    /// Decide whether the conjunction of `lits` is consistent. Only atoms
    /// classified as `Membership::Theory` are passed.
    fn check(&mut self, lits: &[Literal<A>]) -> Verdict<A>;

    /// True if every explanation returned by `check` has no inconsistent
    /// strict subset.
    fn minimal_explanations(&self) -> bool {
        false
    }
}

impl<A, T: TheoryOracle<A> + ?Sized> TheoryOracle<A> for &mut T {
    fn classify(&self, atom: &A) -> Result<Membership, UnsupportedAtomError> {
        (**self).classify(atom)
    }
    fn check(&mut self, lits: &[Literal<A>]) -> Verdict<A> {
        (**self).check(lits)
    }
    fn minimal_explanations(&self) -> bool {
        (**self).minimal_explanations()
    }
}

/// Oracle for pure propositional problems.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOracle {}

impl<A> TheoryOracle<A> for NullOracle {
    fn classify(&self, _: &A) -> Result<Membership, UnsupportedAtomError> {
        Ok(Membership::Boolean)
    }
    fn check(&mut self, _: &[Literal<A>]) -> Verdict<A> {
        Verdict::Consistent
    }
    fn minimal_explanations(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnf_tracks_variables() {
        let mut cnf = Cnf::new();
        cnf.add_clause(vec![1, -3]);
        cnf.add_clause(vec![2]);
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.num_clauses(), 2);
        cnf.reserve_vars(5);
        assert_eq!(cnf.num_vars(), 5);
        assert_eq!(cnf.clauses().nth(0).unwrap(), &[1, -3]);
    }

    #[test]
    #[should_panic]
    fn zero_is_not_a_literal() {
        Cnf::new().add_clause(vec![1, 0]);
    }

    #[test]
    fn complement() {
        let a = Literal::pos("a");
        assert!((!a).is_complement_of(&a));
        assert!(!a.is_complement_of(&a));
        assert!(!a.is_complement_of(&Literal::neg("b")));
        assert_eq!(!!a, a);
    }

    #[test]
    fn null_oracle_accepts_everything() {
        let mut o = NullOracle {};
        assert_eq!(o.classify(&"p"), Ok(Membership::Boolean));
        assert!(o.check(&[Literal::pos("p"), Literal::neg("p")]).is_consistent());
    }
}
