//! Core models shared by every mhcmotifs crate.
//!
//! This crate carries the small, dependency-light types that the rest of the
//! workspace builds on:
//!
//! - [`AlleleSlug`]: the canonical allele key derived from MHC Motif Atlas identifiers
//! - [`AminoAcidAlphabet`]: the ordered amino-acid alphabet that fixes the feature space
//! - [`Grade`]: the categorical grade assigned to amino-acid percentages
//! - [`MotifsConfig`]: run configuration, loadable from TOML
//!
//! # Example
//!
//! ```
//! use mhcmotifs_core::{AlleleSlug, Grade};
//!
//! let slug = AlleleSlug::from_motif_atlas("A0201");
//! assert_eq!(slug.as_str(), "hla_a_02_01");
//! assert_eq!(Grade::from_percentage(61.0), Grade::Dominant);
//! ```

pub mod alphabet;
pub mod allele;
pub mod config;
pub mod consts;
pub mod errors;
pub mod models;

// re-exports
pub use alphabet::AminoAcidAlphabet;
pub use allele::AlleleSlug;
pub use config::MotifsConfig;
pub use errors::{ConfigError, CoreError};
pub use models::{Grade, RawRecord};
