//! # Input/Output utilities for mhcmotifs.
//!
//! Reading tab-delimited peptide tables (plain or gzip'd) into raw records,
//! and writing pipeline results as JSON documents and a flat CSV motif table.
//!
pub mod error;
pub mod json;
pub mod records;
pub mod table;

// re-expose core functions
pub use error::*;
pub use json::*;
pub use records::*;
pub use table::*;
