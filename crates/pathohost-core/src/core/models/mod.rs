//! # Core Models Module
//!
//! Plain data types shared by the parsers, the external-tool plumbing and the
//! workflows.
//!
//! - [`pose`] - Docked poses, split pose blocks and score-table entries
//! - [`structure`] - Opaque coordinate documents and the formats they come in
//!
//! Nothing here builds a molecular graph: structure text is carried as-is and
//! only scanned line by line where coordinates are needed for rendering.

pub mod pose;
pub mod structure;
