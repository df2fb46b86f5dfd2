//! Execution of the external design driver.
//!
//! The driver is a long-running Python process; this crate never reaches
//! into it, only launches it and interprets how it ended. Known failure
//! signatures in its stderr (device memory exhaustion, reference-structure
//! fetch failures, bad chain selections, missing checkpoints) are mapped to
//! typed errors carrying the operator remediation; everything else is
//! surfaced verbatim. There is deliberately no retry: every remediation is
//! a manual operator action.

mod failure;
mod runner;

pub use failure::{DriverFailure, classify_stderr};
pub use runner::{DriverCommand, DriverError, DriverOutput};
