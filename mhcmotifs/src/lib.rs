//! # mhcmotifs
//!
//! Peptide-binding motifs for MHC class I alleles, built from a table of
//! (allele, peptide) observations:
//!
//! - [`core`]: allele slugs, the amino-acid alphabet, grades and run configuration
//! - [`distributions`]: aggregation, normalisation, grading, simplified motifs and motif vectors
//! - [`cluster`]: density-based clustering of motif vectors
//! - [`io`]: reading peptide tables and writing JSON and CSV results
//!
#[cfg(feature = "core")]
#[doc(inline)]
pub use mhcmotifs_core as core;

#[cfg(feature = "distributions")]
#[doc(inline)]
pub use mhcmotifs_distributions as distributions;

#[cfg(feature = "cluster")]
#[doc(inline)]
pub use mhcmotifs_cluster as cluster;

#[cfg(feature = "io")]
#[doc(inline)]
pub use mhcmotifs_io as io;
