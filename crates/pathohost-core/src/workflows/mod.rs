//! # Workflows Module
//!
//! End-to-end procedures built on [`crate::core`], [`crate::engine`] and
//! [`crate::remote`]. These are the entry points front ends call.
//!
//! - **Docking** ([`dock`]) - Input staging, preparation, docking, score parsing,
//!   pose splitting and conversion, and pairing of scores with poses
//! - **Session** ([`session`]) - Search results, the selected structure and the
//!   last docking run, carried between user actions
//! - **Scratch layout** ([`scratch`]) - Fixed file names in the scratch
//!   directory and the single-run claim on it
//! - **Export** ([`export`]) - Score CSV, per-pose PDB files and the combined
//!   receptor-ligand complex

pub mod dock;
pub mod export;
pub mod scratch;
pub mod session;
