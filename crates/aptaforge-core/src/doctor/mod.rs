//! End-to-end installation verification.
//!
//! A design run touches a conda-style Python environment, two Python
//! packages, a multi-gigabyte checkpoint, a set of parameter files and an
//! external viewer binary; any one of them missing produces a confusing
//! failure an hour into a run. The doctor performs the same probes up
//! front and reports them as a single pass/fail summary that names every
//! failing check.

mod checks;
mod report;

pub use checks::{DoctorConfig, run_doctor};
pub use report::{CheckOutcome, CheckStatus, DoctorReport};
