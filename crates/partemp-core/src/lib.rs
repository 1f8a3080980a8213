//! # partemp Core Library
//!
//! Prepares the per-replicate input files of a parallel-tempering run for the
//! GROMACS preprocessor.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer split so every piece can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: the geometric
//!   temperature ladder, the `.mdp` template renderer, and the `grompp` invoker.
//!
//! - **[`engine`]: The Run Model.** The immutable [`engine::config::RunConfig`],
//!   the error taxonomy, and progress reporting shared by every stage.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the
//!   replicate loop that renders and compiles each replicate in turn.

pub mod core;
pub mod engine;
pub mod workflows;
