//! Flattening of graded motifs into fixed-order numeric vectors.

use log::{debug, warn};

use mhcmotifs_core::AminoAcidAlphabet;

use crate::errors::{MotifError, Result};
use crate::models::{GradedDistributions, GradedMotif, MotifMatrix, MotifVector};

///
/// Encodes motifs of one length as vectors in a shared feature space:
/// position-major, amino-acid-minor in alphabet order. Element `(p, a)` is
/// the percentage of amino acid `a` at position `p`, or 0.0 when it was
/// never observed there.
///
/// # Example
///
/// ```
/// use mhcmotifs_core::AminoAcidAlphabet;
/// use mhcmotifs_distributions::vectorization::MotifVectorizer;
///
/// let vectorizer = MotifVectorizer::new(AminoAcidAlphabet::standard(), 9).unwrap();
/// assert_eq!(vectorizer.dimension(), 180);
/// assert_eq!(vectorizer.feature_labels()[0], "1_A");
/// assert_eq!(vectorizer.feature_labels()[179], "9_Y");
/// ```
#[derive(Debug, Clone)]
pub struct MotifVectorizer {
    alphabet: AminoAcidAlphabet,
    motif_length: usize,
}

impl MotifVectorizer {
    pub fn new(alphabet: AminoAcidAlphabet, motif_length: usize) -> Result<Self> {
        if motif_length == 0 {
            return Err(MotifError::ZeroMotifLength);
        }
        Ok(MotifVectorizer {
            alphabet,
            motif_length,
        })
    }

    pub fn dimension(&self) -> usize {
        self.motif_length * self.alphabet.len()
    }

    /// Column labels, `"{position}_{amino_acid}"`, in vector order.
    pub fn feature_labels(&self) -> Vec<String> {
        (1..=self.motif_length)
            .flat_map(|position| {
                self.alphabet
                    .iter()
                    .map(move |amino_acid| format!("{}_{}", position, amino_acid))
            })
            .collect()
    }

    ///
    /// Encode one motif.
    ///
    /// # Errors
    /// - [MotifError::UnknownAminoAcid] if the motif holds a residue outside the alphabet
    /// - [MotifError::PositionOutOfRange] if the motif is longer than the vectorizer's length
    pub fn vectorize(&self, motif: &GradedMotif) -> Result<MotifVector> {
        if let Some(last) = motif.last_position() {
            if last > self.motif_length {
                return Err(MotifError::PositionOutOfRange {
                    position: last,
                    motif_length: self.motif_length,
                });
            }
        }

        let width = self.alphabet.len();
        let mut vector = vec![0.0; self.dimension()];

        for (position, graded) in motif.positions() {
            // positions are 1-based
            let offset = (position - 1) * width;
            for stat in graded {
                let index = self.alphabet.index_of(stat.amino_acid).ok_or(
                    MotifError::UnknownAminoAcid {
                        amino_acid: stat.amino_acid,
                        position,
                    },
                )?;
                vector[offset + index] = stat.percentage;
            }
        }

        Ok(vector)
    }

    ///
    /// Encode the motif of every allele that has one, in allele order.
    /// Alleles with no peptides of the vectorizer's length are left out.
    ///
    pub fn vectorize_all(&self, graded: &GradedDistributions) -> Result<MotifMatrix> {
        let mut alleles = Vec::with_capacity(graded.len());
        let mut rows = Vec::with_capacity(graded.len());

        for (allele, motifs) in graded.iter() {
            match motifs.get(&self.motif_length) {
                Some(motif) => {
                    rows.push(self.vectorize(motif)?);
                    alleles.push(allele.clone());
                }
                None => warn!(
                    "{} has no {}-mer motif, left out of the motif matrix",
                    allele, self.motif_length
                ),
            }
        }

        debug!(
            "Built {} motif vectors of dimension {}",
            rows.len(),
            self.dimension()
        );

        Ok(MotifMatrix {
            alleles,
            feature_labels: self.feature_labels(),
            rows,
        })
    }
}
