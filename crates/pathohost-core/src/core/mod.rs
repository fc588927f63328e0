//! # Core Module
//!
//! Stateless building blocks of the pipeline: the data models and the
//! line-oriented readers for docking output and coordinate files.
//!
//! - **Models** ([`models`]) - Poses, score entries and structure documents
//! - **File I/O** ([`io`]) - Pose splitting, score parsing and coordinate scanning
//!
//! Nothing in this module touches the network or spawns processes; see
//! [`crate::engine`] and [`crate::remote`] for that.

pub mod io;
pub mod models;
