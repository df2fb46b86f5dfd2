//! Typed model of an invocation of the external design driver.
//!
//! The driver is an opaque collaborator reached through its command line.
//! This module gives that command line a type: what is being targeted, what
//! kind of binder is being designed, and under which hyperparameters. A
//! [`DesignJob`] is only obtainable through its builder, so a job that
//! renders to flags has already been validated.

mod job;
mod params;
mod target;

pub use job::{DesignError, DesignJob, DesignJobBuilder};
pub use params::{Device, DeviceParseError, InteractionParams, OptimizationParams};
pub use target::{BinderType, TargetParseError, TargetSource, TargetType};
