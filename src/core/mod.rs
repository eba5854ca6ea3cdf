//! Core building blocks shared by every command
//!
//! - **config**: appship.toml parsing with `${VAR}` substitution
//! - **context**: the run state threaded through the pipeline
//! - **env**: placeholder substitution helpers
//! - **error**: error types with exit codes and help text
//! - **process**: external tool invocation behind a trait
//! - **vcs**: repository facts and version resolution (SystemGit)

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod process;
pub mod vcs;
