/// The twenty standard amino acids in one-letter code, alphabetical.
pub const STANDARD_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Raw allele identifiers containing this tag belong to mouse (H-2) alleles.
pub const DEFAULT_EXCLUDED_ALLELE_MARKER: &str = "H2";

/// Nonamers dominate MHC class I binding, so they are the motif length
/// that gets simplified and clustered.
pub const DEFAULT_MOTIF_LENGTH: usize = 9;

pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

pub const DEFAULT_ALLELE_COLUMN: usize = 0;
pub const DEFAULT_PEPTIDE_COLUMN: usize = 1;

/// Species stem prepended to every allele slug.
pub const ALLELE_SLUG_STEM: &str = "hla";

// grade breakpoints, exclusive lower bounds
pub const DOMINANT_THRESHOLD: f64 = 60.0;
pub const HIGH_THRESHOLD: f64 = 30.0;
pub const MEDIUM_THRESHOLD: f64 = 20.0;
pub const LOW_THRESHOLD: f64 = 10.0;
