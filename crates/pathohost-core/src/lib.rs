//! # PathoHost Core Library
//!
//! Building blocks for exploring pathogen-host molecular interactions: search
//! RCSB by organism, fetch a host structure, dock a small molecule against it
//! with AutoDock Vina, and turn the engine's output into scored, renderable
//! poses.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Stateless models (`Pose`, `ScoreEntry`,
//!   `StructureDocument`) and line-oriented readers for docking output, such as
//!   the score parser and the multi-model pose splitter.
//!
//! - **[`engine`]: External Tools.** Validated configuration and the
//!   subprocess plumbing for Open Babel and Vina, including fail-closed pose
//!   conversion.
//!
//! - **[`remote`]: Structure Database.** An async RCSB client for organism
//!   search and entry download.
//!
//! - **[`viewer`]: Presentation.** 3D scenes for a structure, a complex, or a
//!   pose on its receptor, rendered as standalone 3Dmol.js pages.
//!
//! - **[`workflows`]: The Public API.** The docking pipeline, session state and
//!   result export.

pub mod core;
pub mod engine;
pub mod remote;
pub mod viewer;
pub mod workflows;
