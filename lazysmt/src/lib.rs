//! Lazy SMT solving: a propositional SAT engine and a theory oracle
//! cooperate through conflict clauses until the engine finds an assignment
//! the theory accepts, or runs out of assignments.
//!
//! ```ignore
//! let mut driver = Driver::new(dpll::Solver::new(), rdl::RdlOracle::new());
//! match driver.solve(&formula)? {
//!     SolveResult::Satisfiable(w) => println!("{:?}", w.assignment()),
//!     _ => println!("unsat"),
//! }
//! ```

mod ask;
pub mod conflict;
mod driver;
pub mod encoder;
pub mod solvers;

pub use crate::ask::{ask, AskError, Truth};
pub use crate::conflict::ConflictPolicy;
pub use crate::driver::{solve, Driver, DriverParams, DriverStatistics, SolveError, SolveResult, Witness};
pub use crate::encoder::{decode, encode, Clause, EncodingLookupError, EncodingTable, Formula};
pub use sattrait::{Cnf, Literal, Membership, NullOracle, SatEngine, SatOutcome, TheoryOracle, UnsupportedAtomError, Verdict};
