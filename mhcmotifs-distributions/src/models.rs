use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use mhcmotifs_core::{AlleleSlug, Grade};

/// Result of adding a peptide to an [AlleleObservationSet].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

///
/// The distinct peptides observed for one allele, grouped by peptide length.
///
/// Peptides keep their first-insertion order within a length.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AlleleObservationSet {
    lengths: BTreeMap<usize, IndexSet<String>>,
}

impl AlleleObservationSet {
    ///
    /// Add a peptide under its length. A peptide already present for that
    /// length is left alone and reported as [InsertOutcome::AlreadyPresent].
    ///
    pub fn insert(&mut self, peptide: &str) -> InsertOutcome {
        let length = peptide.chars().count();
        let peptides = self.lengths.entry(length).or_default();

        if peptides.contains(peptide) {
            InsertOutcome::AlreadyPresent
        } else {
            peptides.insert(peptide.to_string());
            InsertOutcome::Inserted
        }
    }

    pub fn peptides(&self, length: usize) -> Option<&IndexSet<String>> {
        self.lengths.get(&length)
    }

    /// Number of distinct peptides of `length`; zero when the length was never observed.
    pub fn count(&self, length: usize) -> usize {
        self.lengths.get(&length).map_or(0, IndexSet::len)
    }

    /// Number of distinct peptides across all lengths.
    pub fn total(&self) -> usize {
        self.lengths.values().map(IndexSet::len).sum()
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.lengths.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

///
/// Count of one amino acid at one position, plus its percentage once the
/// distribution has been normalised.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AminoAcidTally {
    pub count: u32,
    pub percentage: Option<f64>,
}

/// Amino acid -> tally at one position, in first-observed order.
pub type PositionTallies = IndexMap<char, AminoAcidTally>;

/// 1-based position -> tallies, for one allele and peptide length.
pub type MotifTallies = BTreeMap<usize, PositionTallies>;

/// Peptide length -> motif tallies, for one allele.
pub type AlleleTallies = BTreeMap<usize, MotifTallies>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthDistributionEntry {
    pub count: usize,
    pub percentage: f64,
}

///
/// Share of an allele's distinct peptides falling at each length.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthDistribution {
    pub total: usize,
    pub lengths: BTreeMap<usize, LengthDistributionEntry>,
}

/// A graded amino acid at a motif position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AminoAcidStat {
    pub amino_acid: char,
    pub count: u32,
    pub percentage: f64,
    /// Percentage rounded to one decimal place, for display only.
    pub rounded_percentage: f64,
    pub grade: Grade,
}

///
/// All amino acids seen at one position, sorted by descending percentage.
/// Ties keep first-observed order.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GradedPosition {
    pub(crate) entries: Vec<AminoAcidStat>,
}

impl GradedPosition {
    pub fn iter(&self) -> std::slice::Iter<'_, AminoAcidStat> {
        self.entries.iter()
    }

    pub fn get(&self, amino_acid: char) -> Option<&AminoAcidStat> {
        self.entries.iter().find(|stat| stat.amino_acid == amino_acid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a GradedPosition {
    type Item = &'a AminoAcidStat;
    type IntoIter = std::slice::Iter<'a, AminoAcidStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Graded positions of one allele's motif for a single peptide length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GradedMotif {
    pub(crate) positions: BTreeMap<usize, GradedPosition>,
}

impl GradedMotif {
    pub fn position(&self, position: usize) -> Option<&GradedPosition> {
        self.positions.get(&position)
    }

    pub fn positions(&self) -> impl Iterator<Item = (usize, &GradedPosition)> {
        self.positions.iter().map(|(p, graded)| (*p, graded))
    }

    /// Highest position carrying data, if any.
    pub fn last_position(&self) -> Option<usize> {
        self.positions.keys().next_back().copied()
    }
}

///
/// Graded motifs for every allele: allele -> peptide length -> motif.
///
/// Alleles keep first-observed order, which is also the row order of any
/// motif matrix built from this table.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GradedDistributions {
    pub(crate) alleles: IndexMap<AlleleSlug, BTreeMap<usize, GradedMotif>>,
}

impl GradedDistributions {
    pub fn motif(&self, allele: &AlleleSlug, length: usize) -> Option<&GradedMotif> {
        self.alleles.get(allele).and_then(|motifs| motifs.get(&length))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AlleleSlug, &BTreeMap<usize, GradedMotif>)> {
        self.alleles.iter()
    }

    /// Number of (allele, length) motifs in the table.
    pub fn motif_count(&self) -> usize {
        self.alleles.values().map(BTreeMap::len).sum()
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimplifiedEntry {
    pub amino_acid: char,
    pub grade: Grade,
}

impl From<&AminoAcidStat> for SimplifiedEntry {
    fn from(stat: &AminoAcidStat) -> Self {
        SimplifiedEntry {
            amino_acid: stat.amino_acid,
            grade: stat.grade,
        }
    }
}

///
/// Compact motif for display: per position, only the dominant and high
/// amino acids, in graded order.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SimplifiedMotif {
    pub positions: BTreeMap<usize, Vec<SimplifiedEntry>>,
}

pub type MotifVector = Vec<f64>;

///
/// Motif vectors for a set of alleles in one shared feature space.
///
/// Row `i` belongs to `alleles[i]`; column `j` is described by `feature_labels[j]`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotifMatrix {
    pub alleles: Vec<AlleleSlug>,
    pub feature_labels: Vec<String>,
    pub rows: Vec<MotifVector>,
}

impl MotifMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.feature_labels.len()
    }

    pub fn row(&self, allele: &AlleleSlug) -> Option<&MotifVector> {
        self.alleles
            .iter()
            .position(|a| a == allele)
            .map(|i| &self.rows[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AlleleSlug, &MotifVector)> {
        self.alleles.iter().zip(self.rows.iter())
    }
}
