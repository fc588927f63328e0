//! Clients for remote structural databases.
//!
//! Remote failures are soft: a non-success status becomes an empty or absent
//! result, and only transport-level failures are reported as errors.

pub mod error;
pub mod rcsb;
