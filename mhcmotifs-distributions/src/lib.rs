//! Amino-acid distributions for peptide-to-allele binding data.
//!
//! The stages run strictly in order, each consuming the complete output of
//! the one before:
//!
//! 1. [aggregation]: distinct peptides per allele and length, raw per-position amino-acid counts
//! 2. [normalization]: length distributions and per-position percentages
//! 3. [grading]: rounded percentages, grades, and descending sort per position
//! 4. [simplification]: dominant and high amino acids per position, for display
//! 5. [vectorization]: fixed-order motif vectors, for clustering
//!
//! # Example
//!
//! ```
//! use mhcmotifs_core::{AlleleSlug, Grade, RawRecord};
//! use mhcmotifs_distributions::{aggregate, grade, normalize};
//!
//! let records = vec![
//!     RawRecord::new("A0201", "SIINFEKL"),
//!     RawRecord::new("A0201", "SIINFEKL"),
//!     RawRecord::new("A0201", "SLYNTVAT"),
//! ];
//!
//! let aggregation = aggregate(&records, "H2");
//! let normalized = normalize(&aggregation).unwrap();
//! let graded = grade(&normalized).unwrap();
//!
//! let allele = AlleleSlug::from("hla_a_02_01");
//! let p1 = graded.motif(&allele, 8).unwrap().position(1).unwrap();
//! let s = p1.get('S').unwrap();
//! assert_eq!(s.count, 2);
//! assert_eq!(s.grade, Grade::Dominant);
//! ```

pub mod aggregation;
pub mod errors;
pub mod grading;
pub mod models;
pub mod normalization;
pub mod simplification;
pub mod vectorization;

// re-exports
pub use aggregation::{Aggregation, AggregationSummary, Aggregator, ObservationOutcome, aggregate};
pub use errors::MotifError;
pub use grading::grade;
pub use models::*;
pub use normalization::{NormalizedDistributions, normalize};
pub use simplification::simplify;
pub use vectorization::MotifVectorizer;
