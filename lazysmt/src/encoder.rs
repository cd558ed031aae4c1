use sattrait::{Cnf, Literal};
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FromIterator;
use thiserror::Error;

/// Disjunction of literals. Duplicates collapse and order does not matter
/// for equality.
#[derive(Debug, Clone)]
pub struct Clause<A> {
    lits: Vec<Literal<A>>,
}

/// Conjunction of clauses.
pub type Formula<A> = Vec<Clause<A>>;

impl<A: PartialEq> Clause<A> {
    pub fn new(lits: impl IntoIterator<Item = Literal<A>>) -> Self {
        let mut clause = Clause { lits: Vec::new() };
        for l in lits {
            if !clause.lits.contains(&l) {
                clause.lits.push(l);
            }
        }
        clause
    }

    pub fn lits(&self) -> &[Literal<A>] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn contains(&self, lit: &Literal<A>) -> bool {
        self.lits.contains(lit)
    }

    /// True if some literal of the clause appears in `assignment`.
    pub fn is_satisfied_by(&self, assignment: &[Literal<A>]) -> bool {
        self.lits.iter().any(|l| assignment.contains(l))
    }
}

impl<A: PartialEq> PartialEq for Clause<A> {
    fn eq(&self, other: &Self) -> bool {
        self.lits.len() == other.lits.len() && self.lits.iter().all(|l| other.contains(l))
    }
}

impl<A: Eq> Eq for Clause<A> {}

impl<A: PartialEq> FromIterator<Literal<A>> for Clause<A> {
    fn from_iter<I: IntoIterator<Item = Literal<A>>>(iter: I) -> Self {
        Clause::new(iter)
    }
}

impl<A> IntoIterator for Clause<A> {
    type Item = Literal<A>;
    type IntoIter = std::vec::IntoIter<Literal<A>>;
    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no atom with id {id} in the encoding table")]
pub struct EncodingLookupError {
    pub id: i32,
}

/// Bijection between atoms and the variables `1..=len()` of the
/// propositional encoding.
#[derive(Debug, Clone)]
pub struct EncodingTable<A> {
    ids: HashMap<A, u32>,
    atoms: Vec<A>,
}

impl<A: Clone + Eq + Hash> Default for EncodingTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone + Eq + Hash> EncodingTable<A> {
    pub fn new() -> Self {
        EncodingTable {
            ids: HashMap::new(),
            atoms: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Id of `atom`, allocating the next free one on first sight.
    pub fn intern(&mut self, atom: &A) -> u32 {
        if let Some(id) = self.ids.get(atom) {
            return *id;
        }
        self.atoms.push(atom.clone());
        let id = self.atoms.len() as u32;
        self.ids.insert(atom.clone(), id);
        id
    }

    pub fn id(&self, atom: &A) -> Option<u32> {
        self.ids.get(atom).cloned()
    }

    pub fn atom(&self, id: u32) -> Result<&A, EncodingLookupError> {
        if id == 0 {
            return Err(EncodingLookupError { id: 0 });
        }
        self.atoms
            .get(id as usize - 1)
            .ok_or(EncodingLookupError { id: id as i32 })
    }

    /// Atoms in id order.
    pub fn atoms(&self) -> impl Iterator<Item = &A> {
        self.atoms.iter()
    }

    pub fn encode_literal(&mut self, lit: &Literal<A>) -> i32 {
        let id = self.intern(&lit.atom) as i32;
        if lit.positive {
            id
        } else {
            -id
        }
    }

    pub fn encode_clause(&mut self, clause: &Clause<A>) -> Vec<i32> {
        clause.lits().iter().map(|l| self.encode_literal(l)).collect()
    }

    pub fn decode_literal(&self, l: i32) -> Result<Literal<A>, EncodingLookupError> {
        let atom = self
            .atom(l.unsigned_abs())
            .map_err(|_| EncodingLookupError { id: l })?;
        Ok(Literal::new(atom.clone(), l > 0))
    }
}

/// Encode a formula over theory atoms into CNF over dense integer ids.
pub fn encode<A: Clone + Eq + Hash>(formula: &[Clause<A>]) -> (Cnf, EncodingTable<A>) {
    let mut table = EncodingTable::new();
    let mut cnf = Cnf::new();
    for clause in formula {
        cnf.add_clause(table.encode_clause(clause));
    }
    cnf.reserve_vars(table.len() as u32);
    (cnf, table)
}

/// Map signed ids back to literals.
pub fn decode<A: Clone + Eq + Hash>(
    assignment: &[i32],
    table: &EncodingTable<A>,
) -> Result<Vec<Literal<A>>, EncodingLookupError> {
    assignment.iter().map(|l| table.decode_literal(*l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(lits: &[(&'static str, bool)]) -> Clause<&'static str> {
        lits.iter().map(|(a, p)| Literal::new(*a, *p)).collect()
    }

    #[test]
    fn interning_is_idempotent() {
        let mut t = EncodingTable::new();
        assert_eq!(t.intern(&"a"), 1);
        assert_eq!(t.intern(&"b"), 2);
        assert_eq!(t.intern(&"a"), 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.id(&"b"), Some(2));
        assert_eq!(t.id(&"c"), None);
    }

    #[test]
    fn repeated_atoms_share_an_id() {
        let formula = vec![
            clause(&[("a", true), ("b", false)]),
            clause(&[("b", true), ("a", true)]),
        ];
        let (cnf, table) = encode(&formula);
        assert_eq!(table.len(), 2);
        assert_eq!(cnf.num_vars(), 2);
        assert_eq!(cnf.clauses().collect::<Vec<_>>(), vec![&[1, -2][..], &[2, 1][..]]);
    }

    #[test]
    fn round_trip() {
        let formula = vec![
            clause(&[("x", false), ("y", true), ("z", false)]),
            clause(&[("z", true)]),
        ];
        let (cnf, table) = encode(&formula);
        for (c, original) in cnf.clauses().zip(formula.iter()) {
            let decoded: Clause<_> = decode(c, &table).unwrap().into_iter().collect();
            assert_eq!(&decoded, original);
        }
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (_, table) = encode(&[clause(&[("a", true)])]);
        assert_eq!(decode(&[1, -2], &table), Err(EncodingLookupError { id: -2 }));
        assert_eq!(table.decode_literal(0), Err(EncodingLookupError { id: 0 }));
        assert_eq!(table.decode_literal(-1), Ok(Literal::neg("a")));
    }

    #[test]
    fn clauses_are_sets() {
        let c = clause(&[("a", true), ("b", true), ("a", true)]);
        assert_eq!(c.len(), 2);
        assert_eq!(c, clause(&[("b", true), ("a", true)]));
        assert_ne!(c, clause(&[("b", true), ("a", false)]));
        assert!(c.is_satisfied_by(&[Literal::neg("a"), Literal::pos("b")]));
        assert!(!c.is_satisfied_by(&[Literal::neg("a"), Literal::neg("b")]));
    }
}
