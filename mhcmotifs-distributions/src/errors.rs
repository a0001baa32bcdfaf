use mhcmotifs_core::AlleleSlug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("No peptides recorded for allele {0}")]
    EmptyAlleleData(AlleleSlug),

    #[error("Percentage {percentage} for {amino_acid} at position {position} is outside [0, 100]")]
    PercentageOutOfRange {
        amino_acid: char,
        position: usize,
        percentage: f64,
    },

    #[error("Amino acid {amino_acid:?} at position {position} is not in the canonical alphabet")]
    UnknownAminoAcid { amino_acid: char, position: usize },

    #[error("Motif has data at position {position}, beyond the motif length of {motif_length}")]
    PositionOutOfRange { position: usize, motif_length: usize },

    #[error("Motif length must be at least 1")]
    ZeroMotifLength,
}

pub type Result<T> = std::result::Result<T, MotifError>;
