use std::fmt;

/// Coefficients and bounds as given by the caller.
pub type Domain = i64;

/// Internal arithmetic. Negating or summing `Domain` values, and path
/// lengths over them in the constraint graph, stay far inside this range.
pub type Wide = i128;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rel {
    Le,
    Lt,
}

/// `sum(coef * var) rel bound`, kept in a canonical form so that
/// structurally different spellings of the same constraint compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinearConstraint {
    terms: Vec<(String, Wide)>,
    rel: Rel,
    bound: Wide,
}

/// A constraint in difference form `x - y rel k`, where `None` stands for
/// the constant zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiffForm<'a> {
    Const(bool),
    Diff {
        x: Option<&'a str>,
        y: Option<&'a str>,
        k: Wide,
        strict: bool,
    },
}

fn gcd(a: Wide, b: Wide) -> Wide {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

impl LinearConstraint {
    pub fn new(terms: impl IntoIterator<Item = (impl Into<String>, Domain)>, rel: Rel, bound: Domain) -> Self {
        Self::canonical(
            terms.into_iter().map(|(v, c)| (v.into(), c as Wide)).collect(),
            rel,
            bound as Wide,
        )
    }

    fn canonical(mut terms: Vec<(String, Wide)>, rel: Rel, bound: Wide) -> Self {
        terms.sort();
        let mut merged: Vec<(String, Wide)> = Vec::with_capacity(terms.len());
        for (v, c) in terms {
            match merged.last_mut() {
                Some((last, sum)) if *last == v => *sum += c,
                _ => merged.push((v, c)),
            }
        }
        merged.retain(|(_, c)| *c != 0);

        let mut bound = bound;
        let g = merged.iter().fold(0, |g, (_, c)| gcd(g, *c));
        if g > 1 && bound % g == 0 {
            for (_, c) in merged.iter_mut() {
                *c /= g;
            }
            bound /= g;
        }

        LinearConstraint {
            terms: merged,
            rel,
            bound,
        }
    }

    pub fn terms(&self) -> &[(String, Wide)] {
        &self.terms
    }

    pub fn rel(&self) -> Rel {
        self.rel
    }

    pub fn bound(&self) -> Wide {
        self.bound
    }

    /// The difference-logic reading of this constraint, if it has one.
    pub fn as_difference(&self) -> Option<DiffForm> {
        let strict = self.rel == Rel::Lt;
        let (x, y) = match self.terms.as_slice() {
            [] => {
                let holds = if strict { 0 < self.bound } else { 0 <= self.bound };
                return Some(DiffForm::Const(holds));
            }
            [(v, 1)] => (Some(v.as_str()), None),
            [(v, -1)] => (None, Some(v.as_str())),
            [(a, 1), (b, -1)] => (Some(a.as_str()), Some(b.as_str())),
            [(a, -1), (b, 1)] => (Some(b.as_str()), Some(a.as_str())),
            _ => return None,
        };
        Some(DiffForm::Diff {
            x,
            y,
            k: self.bound,
            strict,
        })
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (i, (v, c)) in self.terms.iter().enumerate() {
            let sep = match (i, *c < 0) {
                (0, false) => "",
                (0, true) => "-",
                (_, false) => " + ",
                (_, true) => " - ",
            };
            if c.abs() == 1 {
                write!(f, "{}{}", sep, v)?;
            } else {
                write!(f, "{}{}{}", sep, c.abs(), v)?;
            }
        }
        let rel = match self.rel {
            Rel::Le => "<=",
            Rel::Lt => "<",
        };
        write!(f, " {} {}", rel, self.bound)
    }
}

/// Atom over real-valued variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    /// Propositional variable with no arithmetic meaning.
    Bool(String),
    Linear(LinearConstraint),
}

impl Atom {
    pub fn var(name: impl Into<String>) -> Atom {
        Atom::Bool(name.into())
    }

    pub fn linear(terms: impl IntoIterator<Item = (impl Into<String>, Domain)>, rel: Rel, bound: Domain) -> Atom {
        Atom::Linear(LinearConstraint::new(terms, rel, bound))
    }

    /// `x - y <= k`
    pub fn le(x: &str, y: &str, k: Domain) -> Atom {
        Self::linear(vec![(x, 1), (y, -1)], Rel::Le, k)
    }

    /// `x - y < k`
    pub fn lt(x: &str, y: &str, k: Domain) -> Atom {
        Self::linear(vec![(x, 1), (y, -1)], Rel::Lt, k)
    }

    /// `x - y >= k`
    pub fn ge(x: &str, y: &str, k: Domain) -> Atom {
        Self::negated(vec![(x, 1), (y, -1)], Rel::Le, k)
    }

    /// `x - y > k`
    pub fn gt(x: &str, y: &str, k: Domain) -> Atom {
        Self::negated(vec![(x, 1), (y, -1)], Rel::Lt, k)
    }

    /// `x <= k`
    pub fn upper(x: &str, k: Domain) -> Atom {
        Self::linear(vec![(x, 1)], Rel::Le, k)
    }

    /// `x >= k`
    pub fn lower(x: &str, k: Domain) -> Atom {
        Self::negated(vec![(x, 1)], Rel::Le, k)
    }

    /// `-(terms) rel -bound`, negated in wide arithmetic so that
    /// `Domain::MIN` bounds are representable.
    fn negated(terms: Vec<(&str, Domain)>, rel: Rel, bound: Domain) -> Atom {
        Atom::Linear(LinearConstraint::canonical(
            terms.into_iter().map(|(v, c)| (v.to_string(), -(c as Wide))).collect(),
            rel,
            -(bound as Wide),
        ))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Bool(name) => write!(f, "{}", name),
            Atom::Linear(c) => write!(f, "{}", c),
        }
    }
}
