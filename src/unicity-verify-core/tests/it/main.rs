//! Consolidated integration tests for unicity-verify-core.
//!
//! One test binary keeps proptest-heavy suites from running as several
//! parallel processes.

mod cli;
mod fixtures;
mod verification;
