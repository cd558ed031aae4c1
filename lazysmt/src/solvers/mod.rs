//! Adapters from external SAT solvers to `SatEngine`.
//!
//! `dpll::Solver` implements `SatEngine` directly and needs no adapter.

#[cfg(feature = "solver_cadical")]
mod cadical;

#[cfg(feature = "solver_cadical")]
pub use self::cadical::Cadical;
