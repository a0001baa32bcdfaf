//! Aggregation of raw (allele, peptide) records into per-allele peptide sets
//! and per-position amino-acid counts.

use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::Serialize;

use mhcmotifs_core::{AlleleSlug, MotifsConfig, RawRecord};

use crate::models::{AlleleObservationSet, AlleleTallies, InsertOutcome};

/// What happened to a single record handed to the [Aggregator].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationOutcome {
    /// The raw allele carried the exclusion marker; nothing was recorded.
    Excluded,
    /// First time this peptide was seen for the allele; counts were incremented.
    Inserted,
    /// The peptide was already recorded for the allele; counts are unchanged.
    AlreadyPresent,
}

impl From<InsertOutcome> for ObservationOutcome {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Inserted => ObservationOutcome::Inserted,
            InsertOutcome::AlreadyPresent => ObservationOutcome::AlreadyPresent,
        }
    }
}

/// Counts reported after aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationSummary {
    pub records_seen: usize,
    pub records_excluded: usize,
    pub duplicate_records: usize,
    pub alleles: usize,
    pub unique_peptides: usize,
    /// Peptides linked to more than one allele.
    pub shared_peptides: usize,
}

///
/// Everything the aggregator built for one run.
///
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// allele -> distinct peptides by length
    pub observations: IndexMap<AlleleSlug, AlleleObservationSet>,
    /// allele -> length -> position -> amino acid -> count
    pub tallies: IndexMap<AlleleSlug, AlleleTallies>,
    /// peptide -> every allele it was recorded against
    pub peptide_alleles: IndexMap<String, IndexSet<AlleleSlug>>,
    records_seen: usize,
    records_excluded: usize,
    duplicate_records: usize,
}

impl Aggregation {
    pub fn summary(&self) -> AggregationSummary {
        AggregationSummary {
            records_seen: self.records_seen,
            records_excluded: self.records_excluded,
            duplicate_records: self.duplicate_records,
            alleles: self.observations.len(),
            unique_peptides: self.peptide_alleles.len(),
            shared_peptides: self
                .peptide_alleles
                .values()
                .filter(|alleles| alleles.len() > 1)
                .count(),
        }
    }

    pub fn allele_count(&self) -> usize {
        self.observations.len()
    }
}

///
/// Builds an [Aggregation] from a stream of raw records.
///
/// The aggregator is created per run and consumed by [Aggregator::finish];
/// nothing it accumulates outlives the run.
///
/// # Example
///
/// ```
/// use mhcmotifs_distributions::aggregation::{Aggregator, ObservationOutcome};
///
/// let mut aggregator = Aggregator::new("H2");
/// assert_eq!(aggregator.observe("A0201", "SIINFEKL"), ObservationOutcome::Inserted);
/// assert_eq!(aggregator.observe("A0201", "SIINFEKL"), ObservationOutcome::AlreadyPresent);
/// assert_eq!(aggregator.observe("H2-Kb", "SIINFEKL"), ObservationOutcome::Excluded);
///
/// let aggregation = aggregator.finish();
/// assert_eq!(aggregation.allele_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    excluded_marker: String,
    aggregation: Aggregation,
}

impl Aggregator {
    ///
    /// # Arguments
    /// - excluded_marker: raw alleles containing this text are dropped; empty keeps everything
    pub fn new(excluded_marker: &str) -> Self {
        Aggregator {
            excluded_marker: excluded_marker.to_string(),
            aggregation: Aggregation::default(),
        }
    }

    pub fn from_config(config: &MotifsConfig) -> Self {
        Aggregator::new(&config.excluded_allele_marker)
    }

    pub fn is_excluded(&self, raw_allele: &str) -> bool {
        !self.excluded_marker.is_empty() && raw_allele.contains(self.excluded_marker.as_str())
    }

    ///
    /// Record one observation.
    ///
    /// Amino-acid counts only move when the peptide is new for the allele and
    /// length, so every count reflects distinct peptides. The peptide index is
    /// updated for every non-excluded record.
    ///
    pub fn observe(&mut self, raw_allele: &str, peptide: &str) -> ObservationOutcome {
        self.aggregation.records_seen += 1;

        if self.is_excluded(raw_allele) {
            self.aggregation.records_excluded += 1;
            return ObservationOutcome::Excluded;
        }

        let allele = AlleleSlug::from_motif_atlas(raw_allele);

        let outcome = self
            .aggregation
            .observations
            .entry(allele.clone())
            .or_default()
            .insert(peptide);

        match outcome {
            InsertOutcome::Inserted => self.count_amino_acids(&allele, peptide),
            InsertOutcome::AlreadyPresent => {
                self.aggregation.duplicate_records += 1;
                debug!("{} already recorded for {}", peptide, allele);
            }
        }

        self.aggregation
            .peptide_alleles
            .entry(peptide.to_string())
            .or_default()
            .insert(allele);

        outcome.into()
    }

    pub fn observe_record(&mut self, record: &RawRecord) -> ObservationOutcome {
        self.observe(&record.allele, &record.peptide)
    }

    fn count_amino_acids(&mut self, allele: &AlleleSlug, peptide: &str) {
        let length = peptide.chars().count();
        let motif = self
            .aggregation
            .tallies
            .entry(allele.clone())
            .or_default()
            .entry(length)
            .or_default();

        for (i, amino_acid) in peptide.chars().enumerate() {
            motif
                .entry(i + 1)
                .or_default()
                .entry(amino_acid)
                .or_default()
                .count += 1;
        }
    }

    pub fn finish(self) -> Aggregation {
        self.aggregation
    }
}

impl<'a> Extend<&'a RawRecord> for Aggregator {
    fn extend<I: IntoIterator<Item = &'a RawRecord>>(&mut self, records: I) {
        for record in records {
            self.observe_record(record);
        }
    }
}

///
/// Aggregate a batch of records in one call.
///
pub fn aggregate<'a, I>(records: I, excluded_marker: &str) -> Aggregation
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut aggregator = Aggregator::new(excluded_marker);
    aggregator.extend(records);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("A0201", "SIINFEKL"),
            RawRecord::new("A0201", "SIINFEKL"),
            RawRecord::new("A0201", "SLYNTVAT"),
            RawRecord::new("A0201", "GILGFVFTL"),
            RawRecord::new("B0702", "SIINFEKL"),
            RawRecord::new("H2-Kb", "SIINFEKL"),
        ]
    }

    #[rstest]
    fn test_duplicates_do_not_count(records: Vec<RawRecord>) {
        let aggregation = aggregate(&records, "H2");
        let allele = AlleleSlug::from("hla_a_02_01");

        let set = &aggregation.observations[&allele];
        assert_eq!(set.count(8), 2);
        assert_eq!(set.count(9), 1);

        let p1 = &aggregation.tallies[&allele][&8][&1];
        assert_eq!(p1[&'S'].count, 2);
        assert_eq!(p1[&'S'].percentage, None);
    }

    #[rstest]
    fn test_position_counts_sum_to_distinct_peptides(records: Vec<RawRecord>) {
        let aggregation = aggregate(&records, "H2");

        for (allele, tallies) in &aggregation.tallies {
            let set = &aggregation.observations[allele];
            for (length, motif) in tallies {
                assert_eq!(motif.len(), *length);
                for position in motif.values() {
                    let sum: u32 = position.values().map(|t| t.count).sum();
                    assert_eq!(sum as usize, set.count(*length));
                }
            }
        }
    }

    #[rstest]
    fn test_summary(records: Vec<RawRecord>) {
        let summary = aggregate(&records, "H2").summary();
        assert_eq!(
            summary,
            AggregationSummary {
                records_seen: 6,
                records_excluded: 1,
                duplicate_records: 1,
                alleles: 2,
                unique_peptides: 3,
                shared_peptides: 1,
            }
        );
    }

    #[rstest]
    fn test_peptide_index_links_alleles(records: Vec<RawRecord>) {
        let aggregation = aggregate(&records, "H2");
        let alleles: Vec<&str> = aggregation.peptide_alleles["SIINFEKL"]
            .iter()
            .map(AlleleSlug::as_str)
            .collect();
        assert_eq!(alleles, vec!["hla_a_02_01", "hla_b_07_02"]);
    }

    #[rstest]
    fn test_empty_marker_keeps_everything(records: Vec<RawRecord>) {
        let aggregation = aggregate(&records, "");
        assert_eq!(aggregation.allele_count(), 3);
        assert_eq!(aggregation.summary().records_excluded, 0);
    }

    #[rstest]
    fn test_amino_acids_keep_first_observed_order() {
        let records = vec![
            RawRecord::new("A0101", "YTDYLKE"),
            RawRecord::new("A0101", "ATDYLKE"),
            RawRecord::new("A0101", "LTDYLKE"),
        ];
        let aggregation = aggregate(&records, "H2");
        let p1 = &aggregation.tallies[&AlleleSlug::from("hla_a_01_01")][&7][&1];
        assert_eq!(p1.keys().copied().collect::<Vec<char>>(), vec!['Y', 'A', 'L']);
    }
}
