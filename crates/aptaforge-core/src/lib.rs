//! # aptaforge Core Library
//!
//! Operations library for an aptamer-design pipeline built on a
//! structure-prediction model and a sequence-design model. The pipeline's
//! computational core is an external command-line driver; this crate owns
//! everything around it.
//!
//! ## Layers
//!
//! - **[`design`]: The Contract.** Typed model of a driver invocation
//!   (targets, binders, length bounds, hyperparameters) with a builder that
//!   validates before anything is spawned, and deterministic flag rendering.
//!
//! - **[`driver`], [`weights`], [`doctor`]: The Operations.** Subprocess
//!   execution with failure classification, model-parameter-file auditing,
//!   and end-to-end installation verification.
//!
//! - **[`scores`], [`seq`]: The Analysis.** Confidence-score tables produced
//!   by the driver, and pure nucleic-acid sequence utilities (GC content,
//!   melting temperature, validation) for triaging designed aptamers.

pub mod design;
pub mod doctor;
pub mod driver;
pub mod progress;
pub mod scores;
pub mod seq;
pub mod weights;
