//! Provides readers for the text formats that flow through the docking pipeline.
//!
//! - [`pdbqt`] splits the docking engine's multi-model output into pose blocks.
//! - [`vina_log`] recovers the score table from the engine's standard output.
//! - [`pdb`] scans fixed-column coordinate records for rendering.
//!
//! All readers are tolerant: malformed units are skipped, never fatal.

pub mod pdb;
pub mod pdbqt;
pub mod traits;
pub mod vina_log;
