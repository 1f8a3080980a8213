//! Stateless building blocks of a replicate setup.
//!
//! - [`ladder`] computes the geometric temperature of each replicate.
//! - [`template`] renders a parameter file from a template containing [`template::MARKER`].
//! - [`grompp`] builds the preprocessor command line and captures its output.

pub mod grompp;
pub mod ladder;
pub mod template;
