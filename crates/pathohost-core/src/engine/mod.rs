//! # Engine Module
//!
//! Plumbing around the external programs the pipeline depends on: the docking
//! engine (AutoDock Vina) and the format converter (Open Babel).
//!
//! - **Configuration** ([`config`]) - Validated docking, conversion and scratch settings
//! - **Docking** ([`vina`]) - Command construction and execution of the docking engine
//! - **Format conversion** ([`babel`]) - Receptor/ligand preparation and file conversion
//! - **Pose conversion** ([`convert`]) - Fail-closed batch conversion of split poses
//! - **Progress Monitoring** ([`progress`]) - Phase and task reporting to front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Every external call blocks the calling thread until the tool exits.

pub mod babel;
pub mod config;
pub mod convert;
pub mod error;
pub(crate) mod process;
pub mod progress;
pub mod vina;
