//! Grading and sorting of normalised amino-acid distributions.

use std::collections::BTreeMap;

use rayon::prelude::*;

use mhcmotifs_core::{AlleleSlug, Grade};

use crate::errors::{MotifError, Result};
use crate::models::{
    AlleleTallies, AminoAcidStat, GradedDistributions, GradedMotif, GradedPosition, MotifTallies,
    PositionTallies,
};
use crate::normalization::NormalizedDistributions;

///
/// Round a percentage to one decimal place, ties to even.
///
/// Rounds the stored binary value itself, so 0.05 (stored just above 0.05)
/// goes up and 0.15 (stored just below) goes down. Scaling by ten first would
/// add its own rounding error.
///
/// Only used for display; grades are always derived from the unrounded value.
///
pub fn round_percentage(percentage: f64) -> f64 {
    format!("{:.1}", percentage)
        .parse()
        .unwrap_or(percentage)
}

///
/// Grade and sort the amino acids at one position.
///
/// Tallies without a percentage are graded as 0%. Entries are ordered by
/// descending percentage; the sort is stable, so amino acids with equal
/// percentages stay in first-observed order.
///
/// # Errors
/// [MotifError::PercentageOutOfRange] for a percentage that is not a finite value in [0, 100].
pub fn grade_position(position: usize, tallies: &PositionTallies) -> Result<GradedPosition> {
    let mut entries = tallies
        .iter()
        .map(|(amino_acid, tally)| {
            let percentage = tally.percentage.unwrap_or(0.0);
            if !(0.0..=100.0).contains(&percentage) {
                return Err(MotifError::PercentageOutOfRange {
                    amino_acid: *amino_acid,
                    position,
                    percentage,
                });
            }

            Ok(AminoAcidStat {
                amino_acid: *amino_acid,
                count: tally.count,
                percentage,
                rounded_percentage: round_percentage(percentage),
                grade: Grade::from_percentage(percentage),
            })
        })
        .collect::<Result<Vec<AminoAcidStat>>>()?;

    entries.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    Ok(GradedPosition { entries })
}

pub fn grade_motif(tallies: &MotifTallies) -> Result<GradedMotif> {
    let positions = tallies
        .iter()
        .map(|(position, amino_acids)| -> Result<(usize, GradedPosition)> {
            Ok((*position, grade_position(*position, amino_acids)?))
        })
        .collect::<Result<BTreeMap<usize, GradedPosition>>>()?;

    Ok(GradedMotif { positions })
}

pub fn grade_allele(tallies: &AlleleTallies) -> Result<BTreeMap<usize, GradedMotif>> {
    tallies
        .iter()
        .map(|(length, motif)| -> Result<(usize, GradedMotif)> {
            Ok((*length, grade_motif(motif)?))
        })
        .collect()
}

///
/// Grade every motif of every allele.
///
pub fn grade(normalized: &NormalizedDistributions) -> Result<GradedDistributions> {
    let alleles: Vec<(&AlleleSlug, &AlleleTallies)> = normalized.tallies.iter().collect();

    let graded = alleles
        .par_iter()
        .map(|(allele, tallies)| -> Result<(AlleleSlug, BTreeMap<usize, GradedMotif>)> {
            Ok(((*allele).clone(), grade_allele(tallies)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GradedDistributions {
        alleles: graded.into_iter().collect(),
    })
}
