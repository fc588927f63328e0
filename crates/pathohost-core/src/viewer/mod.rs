//! Browser-based 3D views of structures and docked poses.
//!
//! A [`scene::Scene`] describes what to draw; [`html`] renders it as a
//! standalone page driven by 3Dmol.js.

pub mod html;
pub mod scene;
