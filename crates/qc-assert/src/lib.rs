//! qc-assert - Assertion engine for dbqc
//!
//! Runs counting queries and checks the results: exact and operator-based
//! row counts, zero/non-zero checks, primary-versus-secondary comparisons
//! with a tolerance ratio, and foreign key orphan checks. Every assertion
//! reports one outcome to a [`Reporter`].

pub mod checker;
pub mod comparative;
pub mod count;
pub mod error;
pub mod executor;
pub mod referential;
pub mod reporter;
pub mod suite;

#[cfg(test)]
pub(crate) mod test_support;

pub use checker::Checker;
pub use comparative::SubtotalMap;
pub use error::{AssertError, AssertResult};
pub use executor::{execute, Query, QueryResult};
pub use referential::{ForeignKey, OrphanQuery};
pub use reporter::{AssertionOutcome, Recorder, Reporter, Summary, TapReporter};
pub use suite::{CheckError, SuiteReport, SuiteRunner};
