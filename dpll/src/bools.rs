// ------
// Variables and literals
// ------

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub u32);

impl Var {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }

    /// Variable number `n` in DIMACS numbering (starting at 1).
    pub fn from_dimacs(n: u32) -> Var {
        assert!(n > 0);
        Var(n - 1)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(pub u32);

impl Lit {
    pub fn new(Var(var): Var, sign: bool) -> Lit {
        Lit(2 * var + sign as u32)
    }

    /// `sign` is set for negative literals.
    pub fn sign(&self) -> bool {
        ((self.0) & 1) != 0
    }

    pub fn var(&self) -> Var {
        Var(self.0 >> 1)
    }

    pub fn inverse(&self) -> Lit {
        Self::new(self.var(), !self.sign())
    }

    pub fn from_dimacs(l: i32) -> Lit {
        Lit::new(Var::from_dimacs(l.unsigned_abs()), l < 0)
    }

    pub fn to_dimacs(&self) -> i32 {
        let v = self.var().0 as i32 + 1;
        if self.sign() {
            -v
        } else {
            v
        }
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;
    fn not(self) -> Lit {
        self.inverse()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LBool(u8);

pub const LBOOL_TRUE: LBool = LBool(0);
pub const LBOOL_FALSE: LBool = LBool(1);
pub const LBOOL_UNDEF: LBool = LBool(2);

impl LBool {
    pub fn xor(&self, b: bool) -> LBool {
        if *self == LBOOL_UNDEF {
            return LBOOL_UNDEF;
        }
        LBool(self.0 ^ (b as u8))
    }

    pub fn from_bool(b: bool) -> LBool {
        if b {
            LBOOL_TRUE
        } else {
            LBOOL_FALSE
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            LBOOL_TRUE => Some(true),
            LBOOL_FALSE => Some(false),
            _ => None,
        }
    }
}

impl Default for LBool {
    fn default() -> Self {
        LBOOL_UNDEF
    }
}
