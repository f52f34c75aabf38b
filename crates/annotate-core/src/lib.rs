//! Engine-backed annotation pipeline for chess game records.
//!
//! This crate provides the building blocks used by the `pgn-annotate` binary
//! to convert PGN games into an engine-friendly notation, drive an external
//! analysis tool over them, and collect the annotated game together with its
//! statistics report.
//!
//! # Modules
//!
//! - [`config`] - configuration file loading and install-directory resolution
//! - [`request`] - the per-invocation analysis request model
//! - [`validate`] - pure validation predicates for command-line tokens
//! - [`process`] - external process execution with optional stdout capture
//! - [`toolchain`] - locations and argument vectors for the external tools
//! - [`pipeline`] - the per-file conversion/analysis/report pipeline

pub mod config;
pub mod pipeline;
pub mod process;
pub mod request;
pub mod toolchain;
pub mod validate;
