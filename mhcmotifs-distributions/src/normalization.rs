//! Turns raw counts into percentages.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;

use mhcmotifs_core::AlleleSlug;

use crate::aggregation::Aggregation;
use crate::errors::{MotifError, Result};
use crate::models::{
    AlleleObservationSet, AlleleTallies, LengthDistribution, LengthDistributionEntry, MotifTallies,
};

///
/// Normalised tables for every allele, ready for grading.
///
#[derive(Debug, Clone, Default)]
pub struct NormalizedDistributions {
    pub length_distributions: IndexMap<AlleleSlug, LengthDistribution>,
    pub tallies: IndexMap<AlleleSlug, AlleleTallies>,
}

///
/// Compute the share of an allele's distinct peptides at each length.
///
/// # Errors
/// [MotifError::EmptyAlleleData] when the allele has no peptides at all.
pub fn length_distribution(
    allele: &AlleleSlug,
    observations: &AlleleObservationSet,
) -> Result<LengthDistribution> {
    let total = observations.total();
    if total == 0 {
        return Err(MotifError::EmptyAlleleData(allele.clone()));
    }

    let lengths = observations
        .lengths()
        .map(|length| {
            let count = observations.count(length);
            (
                length,
                LengthDistributionEntry {
                    count,
                    percentage: count as f64 / total as f64 * 100.0,
                },
            )
        })
        .collect();

    Ok(LengthDistribution { total, lengths })
}

///
/// Fill in the percentage of every amino-acid tally for one allele.
///
/// The denominator is the number of distinct peptides of the motif's length.
/// A length with no recorded peptides has no data and is left out of the
/// result instead of being divided by zero.
///
pub fn normalize_tallies(
    allele: &AlleleSlug,
    observations: &AlleleObservationSet,
    tallies: &AlleleTallies,
) -> AlleleTallies {
    let mut normalized: AlleleTallies = BTreeMap::new();

    for (length, motif) in tallies {
        let peptide_count = observations.count(*length);
        if peptide_count == 0 {
            debug!("No peptides of length {} for {}, skipping", length, allele);
            continue;
        }

        let motif: MotifTallies = motif
            .iter()
            .map(|(position, amino_acids)| {
                let amino_acids = amino_acids
                    .iter()
                    .map(|(amino_acid, tally)| {
                        let mut tally = *tally;
                        tally.percentage =
                            Some(tally.count as f64 / peptide_count as f64 * 100.0);
                        (*amino_acid, tally)
                    })
                    .collect();
                (*position, amino_acids)
            })
            .collect();

        normalized.insert(*length, motif);
    }

    normalized
}

///
/// Normalise every allele of an aggregation. Alleles are independent, so they
/// are processed in parallel; output order follows the aggregation.
///
pub fn normalize(aggregation: &Aggregation) -> Result<NormalizedDistributions> {
    let alleles: Vec<(&AlleleSlug, &AlleleObservationSet)> =
        aggregation.observations.iter().collect();

    let normalized = alleles
        .par_iter()
        .map(|(allele, observations)| -> Result<(AlleleSlug, LengthDistribution, AlleleTallies)> {
            let lengths = length_distribution(allele, observations)?;
            let tallies = aggregation
                .tallies
                .get(*allele)
                .map(|tallies| normalize_tallies(allele, observations, tallies))
                .unwrap_or_default();
            Ok(((*allele).clone(), lengths, tallies))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut result = NormalizedDistributions::default();
    for (allele, lengths, tallies) in normalized {
        result.length_distributions.insert(allele.clone(), lengths);
        result.tallies.insert(allele, tallies);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use mhcmotifs_core::RawRecord;

    use crate::aggregation::aggregate;

    #[fixture]
    fn aggregation() -> Aggregation {
        let records = vec![
            RawRecord::new("A0201", "SIINFEKL"),
            RawRecord::new("A0201", "SIINFEKL"),
            RawRecord::new("A0201", "SLYNTVAT"),
            RawRecord::new("B0702", "APRTVALTA"),
            RawRecord::new("B0702", "RPRGEVRFL"),
            RawRecord::new("B0702", "LPFEKSTVM"),
            RawRecord::new("B0702", "SPRWYFYYL"),
            RawRecord::new("B0702", "KPRSPVVEL"),
            RawRecord::new("B0702", "IPSINVHHY"),
            RawRecord::new("B0702", "APRGVRMAV"),
            RawRecord::new("B0702", "TPRVTGGGAM"),
        ];
        aggregate(&records, "H2")
    }

    #[rstest]
    fn test_single_length_is_one_hundred_percent(aggregation: Aggregation) {
        let normalized = normalize(&aggregation).unwrap();
        let allele = AlleleSlug::from("hla_a_02_01");

        let lengths = &normalized.length_distributions[&allele];
        assert_eq!(lengths.total, 2);
        assert_eq!(lengths.lengths[&8].count, 2);
        assert_eq!(lengths.lengths[&8].percentage, 100.0);

        let s = normalized.tallies[&allele][&8][&1][&'S'];
        assert_eq!(s.count, 2);
        assert_eq!(s.percentage, Some(100.0));
    }

    #[rstest]
    fn test_length_percentages_sum_to_one_hundred(aggregation: Aggregation) {
        let normalized = normalize(&aggregation).unwrap();

        for distribution in normalized.length_distributions.values() {
            let sum: f64 = distribution.lengths.values().map(|e| e.percentage).sum();
            assert!((sum - 100.0).abs() < 1e-9);
        }

        let b0702 = &normalized.length_distributions[&AlleleSlug::from("hla_b_07_02")];
        assert_eq!(b0702.total, 8);
        assert_eq!(b0702.lengths[&9].percentage, 87.5);
        assert_eq!(b0702.lengths[&10].percentage, 12.5);
    }

    #[rstest]
    fn test_position_percentages(aggregation: Aggregation) {
        let normalized = normalize(&aggregation).unwrap();
        let p2 = &normalized.tallies[&AlleleSlug::from("hla_b_07_02")][&9][&2];

        assert_eq!(p2[&'P'].count, 7);
        assert_eq!(p2[&'P'].percentage, Some(100.0));

        let p3 = &normalized.tallies[&AlleleSlug::from("hla_b_07_02")][&9][&3];
        let sum: f64 = p3.values().filter_map(|t| t.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_empty_allele_is_an_error() {
        let allele = AlleleSlug::from("hla_a_01_01");
        let result = length_distribution(&allele, &AlleleObservationSet::default());
        assert!(matches!(result, Err(MotifError::EmptyAlleleData(_))));
    }

    #[rstest]
    fn test_length_without_peptides_is_skipped(aggregation: Aggregation) {
        let allele = AlleleSlug::from("hla_a_02_01");
        let observations = &aggregation.observations[&allele];
        let mut tallies = aggregation.tallies[&allele].clone();
        tallies.insert(11, MotifTallies::new());

        let normalized = normalize_tallies(&allele, observations, &tallies);
        assert!(normalized.contains_key(&8));
        assert!(!normalized.contains_key(&11));
    }
}
