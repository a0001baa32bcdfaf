//! Allele-level cluster assignments built on top of a [DensityClusterer].

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use log::{info, warn};
use serde::{Serialize, Serializer};

use mhcmotifs_core::AlleleSlug;
use mhcmotifs_distributions::MotifMatrix;

use crate::errors::{ClusterError, Result};
use crate::traits::{DensityClusterer, validate_input};

///
/// Presentation label of a cluster. Ids are 1-based; every allele the
/// clusterer could not place is an outlier.
///
/// Orders numerically with outliers last, and serializes as `cluster_<id>`
/// or `outliers`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterLabel {
    Cluster(usize),
    Outlier,
}

impl ClusterLabel {
    pub fn is_outlier(&self) -> bool {
        matches!(self, ClusterLabel::Outlier)
    }
}

impl Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterLabel::Cluster(id) => write!(f, "cluster_{}", id),
            ClusterLabel::Outlier => write!(f, "outliers"),
        }
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

///
/// Cluster label of every allele, in motif-matrix row order.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterAssignments {
    labels: IndexMap<AlleleSlug, ClusterLabel>,
}

impl ClusterAssignments {
    pub fn get(&self, allele: &AlleleSlug) -> Option<ClusterLabel> {
        self.labels.get(allele).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AlleleSlug, &ClusterLabel)> {
        self.labels.iter()
    }

    /// Alleles grouped by label; clusters in id order, outliers last.
    pub fn groups(&self) -> BTreeMap<ClusterLabel, Vec<AlleleSlug>> {
        let mut groups: BTreeMap<ClusterLabel, Vec<AlleleSlug>> = BTreeMap::new();
        for (allele, label) in &self.labels {
            groups.entry(*label).or_default().push(allele.clone());
        }
        groups
    }

    pub fn cluster_count(&self) -> usize {
        self.groups().keys().filter(|label| !label.is_outlier()).count()
    }

    pub fn outlier_count(&self) -> usize {
        self.labels.values().filter(|label| label.is_outlier()).count()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

///
/// Cluster the rows of a motif matrix and label each allele.
///
/// Raw cluster indices from the clusterer are relabeled to 1-based ids in
/// increasing order of the raw index. Any raw cluster smaller than
/// `min_cluster_size` is demoted to outliers, so no real cluster ever has
/// fewer than two members.
///
/// # Errors
/// - [ClusterError::InsufficientClusteringInput] for fewer than two motif vectors
/// - [ClusterError::DimensionMismatch] when the rows differ in length
/// - [ClusterError::LabelCountMismatch] if the clusterer returns the wrong number of labels
pub fn assign_clusters<C>(
    clusterer: &C,
    matrix: &MotifMatrix,
    min_cluster_size: usize,
) -> Result<ClusterAssignments>
where
    C: DensityClusterer + ?Sized,
{
    validate_input(&matrix.rows, min_cluster_size)?;

    let raw = clusterer.cluster(&matrix.rows, min_cluster_size)?;
    if raw.len() != matrix.len() {
        return Err(ClusterError::LabelCountMismatch {
            expected: matrix.len(),
            found: raw.len(),
        });
    }

    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for index in raw.iter().flatten() {
        *sizes.entry(*index).or_default() += 1;
    }

    let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
    for (index, size) in &sizes {
        if *size < min_cluster_size {
            warn!(
                "Raw cluster {} has {} member(s), below the minimum of {}; treating as outliers",
                index, size, min_cluster_size
            );
            continue;
        }
        let id = ids.len() + 1;
        ids.insert(*index, id);
    }

    let labels: IndexMap<AlleleSlug, ClusterLabel> = matrix
        .alleles
        .iter()
        .zip(raw)
        .map(|(allele, index)| {
            let label = index
                .and_then(|i| ids.get(&i).copied())
                .map_or(ClusterLabel::Outlier, ClusterLabel::Cluster);
            (allele.clone(), label)
        })
        .collect();

    let assignments = ClusterAssignments { labels };
    info!(
        "Clustered {} alleles into {} cluster(s), {} outlier(s)",
        assignments.len(),
        assignments.cluster_count(),
        assignments.outlier_count()
    );

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::hdbscan::Hdbscan;

    /// Returns fixed labels, to test relabeling independently of HDBSCAN.
    struct FixedLabels(Vec<Option<usize>>);

    impl DensityClusterer for FixedLabels {
        fn cluster(&self, _: &[Vec<f64>], _: usize) -> Result<Vec<Option<usize>>> {
            Ok(self.0.clone())
        }
    }

    fn matrix(rows: Vec<Vec<f64>>) -> MotifMatrix {
        let alleles = (0..rows.len())
            .map(|i| AlleleSlug::from(format!("hla_a_{:02}_01", i + 1).as_str()))
            .collect();
        let feature_labels = (0..rows[0].len()).map(|i| format!("1_{}", i)).collect();
        MotifMatrix {
            alleles,
            feature_labels,
            rows,
        }
    }

    #[rstest]
    fn test_identical_alleles_share_a_cluster() {
        let m = matrix(vec![
            vec![62.5, 0.0, 37.5],
            vec![62.5, 0.0, 37.5],
            vec![0.0, 100.0, 0.0],
        ]);
        let assignments = assign_clusters(&Hdbscan::default(), &m, 2).unwrap();

        let a = assignments.get(&m.alleles[0]).unwrap();
        let b = assignments.get(&m.alleles[1]).unwrap();
        let c = assignments.get(&m.alleles[2]).unwrap();
        assert_eq!(a, ClusterLabel::Cluster(1));
        assert_eq!(a, b);
        assert_eq!(c, ClusterLabel::Outlier);
    }

    #[rstest]
    fn test_isolated_allele_is_an_outlier() {
        let m = matrix(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 0.0],
            vec![5.0, 1.0],
            vec![100.0, 100.0],
        ]);
        let assignments = assign_clusters(&Hdbscan::default(), &m, 2).unwrap();

        assert_eq!(assignments.get(&m.alleles[4]), Some(ClusterLabel::Outlier));
        assert_eq!(assignments.outlier_count(), 1);
        assert_eq!(assignments.cluster_count(), 2);
    }

    #[rstest]
    fn test_relabels_from_one_in_raw_order() {
        let m = matrix(vec![vec![0.0]; 5]);
        let clusterer = FixedLabels(vec![Some(1), Some(0), None, Some(1), Some(0)]);
        let assignments = assign_clusters(&clusterer, &m, 2).unwrap();

        let labels: Vec<String> = assignments.iter().map(|(_, l)| l.to_string()).collect();
        assert_eq!(
            labels,
            vec!["cluster_2", "cluster_1", "outliers", "cluster_2", "cluster_1"]
        );
    }

    #[rstest]
    fn test_undersized_raw_cluster_becomes_outliers() {
        let m = matrix(vec![vec![0.0]; 4]);
        let clusterer = FixedLabels(vec![Some(0), Some(1), Some(1), Some(2)]);
        let assignments = assign_clusters(&clusterer, &m, 2).unwrap();

        let groups = assignments.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&ClusterLabel::Cluster(1)].len(), 2);
        assert_eq!(groups[&ClusterLabel::Outlier].len(), 2);
    }

    #[rstest]
    fn test_wrong_label_count_fails() {
        let m = matrix(vec![vec![0.0]; 3]);
        let clusterer = FixedLabels(vec![Some(0), Some(0)]);

        assert!(matches!(
            assign_clusters(&clusterer, &m, 2),
            Err(ClusterError::LabelCountMismatch { expected: 3, found: 2 })
        ));
    }

    #[rstest]
    fn test_single_allele_is_rejected() {
        let m = matrix(vec![vec![1.0, 0.0]]);
        assert!(matches!(
            assign_clusters(&Hdbscan::default(), &m, 2),
            Err(ClusterError::InsufficientClusteringInput { found: 1 })
        ));
    }

    #[rstest]
    fn test_groups_serialize_with_outliers_last() {
        let m = matrix(vec![vec![0.0]; 3]);
        let clusterer = FixedLabels(vec![None, Some(0), Some(0)]);
        let assignments = assign_clusters(&clusterer, &m, 2).unwrap();

        let json = serde_json::to_string(&assignments.groups()).unwrap();
        assert_eq!(
            json,
            r#"{"cluster_1":["hla_a_02_01","hla_a_03_01"],"outliers":["hla_a_01_01"]}"#
        );
    }
}
