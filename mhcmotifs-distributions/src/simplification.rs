//! Reduction of graded motifs to their dominant and high amino acids.

use indexmap::IndexMap;
use log::warn;

use mhcmotifs_core::AlleleSlug;

use crate::models::{GradedDistributions, GradedMotif, SimplifiedEntry, SimplifiedMotif};

///
/// Keep only the dominant and high amino acids at each position.
///
/// Filtering is by grade alone, in graded order; the thresholds make more
/// than two survivors at one position practically impossible, but nothing is
/// truncated. Every position `1..=motif_length` is present in the result;
/// positions with nothing prominent map to an empty list.
///
pub fn simplify_motif(motif: &GradedMotif, motif_length: usize) -> SimplifiedMotif {
    let positions = (1..=motif_length)
        .map(|position| {
            let entries = motif
                .position(position)
                .map(|graded| {
                    graded
                        .iter()
                        .filter(|stat| stat.grade.is_prominent())
                        .map(SimplifiedEntry::from)
                        .collect()
                })
                .unwrap_or_default();
            (position, entries)
        })
        .collect();

    SimplifiedMotif { positions }
}

///
/// Simplify the `motif_length` motif of every allele.
///
/// Alleles without peptides of that length have no motif to simplify and are
/// left out.
///
pub fn simplify(
    graded: &GradedDistributions,
    motif_length: usize,
) -> IndexMap<AlleleSlug, SimplifiedMotif> {
    let mut simplified = IndexMap::new();

    for (allele, motifs) in graded.iter() {
        match motifs.get(&motif_length) {
            Some(motif) => {
                simplified.insert(allele.clone(), simplify_motif(motif, motif_length));
            }
            None => warn!("{} has no {}-mer motif, not simplified", allele, motif_length),
        }
    }

    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use mhcmotifs_core::{Grade, RawRecord};

    use crate::aggregation::aggregate;
    use crate::grading::grade;
    use crate::normalization::normalize;

    fn graded_from(records: &[RawRecord]) -> GradedDistributions {
        let aggregation = aggregate(records, "H2");
        grade(&normalize(&aggregation).unwrap()).unwrap()
    }

    #[fixture]
    fn graded() -> GradedDistributions {
        graded_from(&[
            RawRecord::new("A0201", "YLLPAIVHI"),
            RawRecord::new("A0201", "GLCTLVAML"),
            RawRecord::new("A0201", "NLVPMVATV"),
            RawRecord::new("A0201", "ILKEPVHGV"),
            RawRecord::new("A0201", "LLFGYPVYV"),
            RawRecord::new("A0201", "SLYNTVATL"),
        ])
    }

    #[rstest]
    fn test_only_dominant_and_high_survive(graded: GradedDistributions) {
        let simplified = simplify(&graded, 9);
        let motif = &simplified[&AlleleSlug::from("hla_a_02_01")];

        assert_eq!(motif.positions.len(), 9);
        for entries in motif.positions.values() {
            assert!(entries.iter().all(|e| e.grade.is_prominent()));
        }

        // P2: L in every peptide
        assert_eq!(
            motif.positions[&2],
            vec![SimplifiedEntry {
                amino_acid: 'L',
                grade: Grade::Dominant
            }]
        );

        // P9: V 3/6 (50%) high, L 2/6 (33.3%) high, I 1/6 dropped
        assert_eq!(
            motif.positions[&9],
            vec![
                SimplifiedEntry {
                    amino_acid: 'V',
                    grade: Grade::High
                },
                SimplifiedEntry {
                    amino_acid: 'L',
                    grade: Grade::High
                },
            ]
        );

        // P1: six different residues, nothing above 30%
        assert!(motif.positions[&1].is_empty());
    }

    #[rstest]
    fn test_allele_without_motif_length_is_skipped() {
        let graded = graded_from(&[
            RawRecord::new("A0201", "SIINFEKL"),
            RawRecord::new("B0702", "APRTVALTA"),
        ]);
        let simplified = simplify(&graded, 9);
        assert_eq!(simplified.len(), 1);
        assert!(simplified.contains_key(&AlleleSlug::from("hla_b_07_02")));
    }

    #[rstest]
    fn test_missing_positions_are_empty() {
        let motif = GradedMotif::default();
        let simplified = simplify_motif(&motif, 9);
        assert_eq!(simplified.positions.len(), 9);
        assert!(simplified.positions.values().all(Vec::is_empty));
    }
}
