//! The full motif pipeline: aggregate, normalise, grade, simplify, vectorise
//! and cluster, with one action-log entry per step.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;

use mhcmotifs_cluster::{ClusterAssignments, ClusterLabel, DensityClusterer, Hdbscan, assign_clusters};
use mhcmotifs_core::{AlleleSlug, MotifsConfig, RawRecord};
use mhcmotifs_distributions::{
    AggregationSummary, Aggregator, GradedDistributions, LengthDistribution, MotifMatrix,
    MotifVectorizer, SimplifiedMotif, grade, normalize, simplify,
};

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Counts recorded for one pipeline step. Counts that do not apply are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alleles_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motifs_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_written: Option<usize>,
}

impl StepRecord {
    pub fn new(step: &str) -> Self {
        StepRecord {
            step: step.to_string(),
            ..Default::default()
        }
    }

    pub fn with_alleles(mut self, count: usize) -> Self {
        self.alleles_processed = Some(count);
        self
    }

    pub fn with_motifs(mut self, count: usize) -> Self {
        self.motifs_processed = Some(count);
        self
    }

    pub fn with_clusters(mut self, clusters: usize, outliers: usize) -> Self {
        self.clusters_found = Some(clusters);
        self.outlier_count = Some(outliers);
        self
    }

    pub fn with_rows_written(mut self, rows: usize) -> Self {
        self.rows_written = Some(rows);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AggregationSummary>,
    pub steps: Vec<StepRecord>,
}

/// `clusters.json`: the per-allele labels and the same labels grouped.
#[derive(Debug, Serialize)]
pub struct ClusterReport<'a> {
    pub assignments: &'a ClusterAssignments,
    pub groups: BTreeMap<ClusterLabel, Vec<AlleleSlug>>,
}

impl<'a> From<&'a ClusterAssignments> for ClusterReport<'a> {
    fn from(assignments: &'a ClusterAssignments) -> Self {
        ClusterReport {
            assignments,
            groups: assignments.groups(),
        }
    }
}

pub struct PipelineResults {
    pub length_distributions: IndexMap<AlleleSlug, LengthDistribution>,
    pub graded: GradedDistributions,
    pub simplified: IndexMap<AlleleSlug, SimplifiedMotif>,
    pub matrix: MotifMatrix,
    pub assignments: ClusterAssignments,
}

pub struct MotifPipeline {
    config: MotifsConfig,
    clusterer: Box<dyn DensityClusterer>,
    log: ActionLog,
}

impl MotifPipeline {
    pub fn new(config: MotifsConfig) -> Self {
        MotifPipeline {
            config,
            clusterer: Box::new(Hdbscan::default()),
            log: ActionLog::default(),
        }
    }

    pub fn with_clusterer(mut self, clusterer: Box<dyn DensityClusterer>) -> Self {
        self.clusterer = clusterer;
        self
    }

    pub fn config(&self) -> &MotifsConfig {
        &self.config
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.log
    }

    pub fn record_step(&mut self, record: StepRecord) {
        self.log.steps.push(record);
    }

    pub fn run(&mut self, records: &[RawRecord]) -> Result<PipelineResults> {
        let alphabet = self
            .config
            .alphabet()
            .context("Invalid amino-acid alphabet")?;
        let motif_length = self.config.motif_length;

        // aggregate
        let pb = spinner("Aggregating peptides");
        let mut aggregator = Aggregator::from_config(&self.config);
        aggregator.extend(records);
        let aggregation = aggregator.finish();
        let summary = aggregation.summary();
        pb.finish_with_message(format!(
            "Aggregated {} records into {} alleles ({} excluded, {} duplicates)",
            summary.records_seen, summary.alleles, summary.records_excluded, summary.duplicate_records
        ));
        self.log.summary = Some(summary);
        self.record_step(StepRecord::new("aggregate").with_alleles(summary.alleles));

        // normalize
        let pb = spinner("Normalising distributions");
        let normalized = normalize(&aggregation).context("Failed to normalise distributions")?;
        pb.finish_with_message(format!(
            "Normalised {} alleles",
            normalized.length_distributions.len()
        ));
        self.record_step(
            StepRecord::new("normalize").with_alleles(normalized.length_distributions.len()),
        );

        // grade
        let pb = spinner("Grading amino acids");
        let graded = grade(&normalized).context("Failed to grade distributions")?;
        pb.finish_with_message(format!("Graded {} motifs", graded.motif_count()));
        self.record_step(
            StepRecord::new("grade")
                .with_alleles(graded.len())
                .with_motifs(graded.motif_count()),
        );

        // simplify
        let pb = spinner("Simplifying motifs");
        let simplified = simplify(&graded, motif_length);
        pb.finish_with_message(format!("Simplified {} motifs", simplified.len()));
        self.record_step(
            StepRecord::new("simplify")
                .with_alleles(simplified.len())
                .with_motifs(simplified.len()),
        );

        // vectorize
        let pb = spinner("Vectorising motifs");
        let vectorizer = MotifVectorizer::new(alphabet, motif_length)?;
        let matrix = vectorizer
            .vectorize_all(&graded)
            .context("Failed to vectorise motifs")?;
        pb.finish_with_message(format!(
            "Vectorised {} motifs into {} features",
            matrix.len(),
            matrix.dimension()
        ));
        self.record_step(StepRecord::new("vectorize").with_alleles(matrix.len()));

        // cluster
        let pb = spinner("Clustering motifs");
        let assignments = assign_clusters(
            self.clusterer.as_ref(),
            &matrix,
            self.config.min_cluster_size,
        )
        .context("Failed to cluster motif vectors")?;
        pb.finish_with_message(format!(
            "Found {} clusters and {} outliers",
            assignments.cluster_count(),
            assignments.outlier_count()
        ));
        self.record_step(
            StepRecord::new("cluster")
                .with_alleles(assignments.len())
                .with_clusters(assignments.cluster_count(), assignments.outlier_count()),
        );

        info!(
            "Pipeline finished: {} alleles, {} clusters, {} outliers",
            aggregation.allele_count(),
            assignments.cluster_count(),
            assignments.outlier_count()
        );

        Ok(PipelineResults {
            length_distributions: normalized.length_distributions,
            graded,
            simplified,
            matrix,
            assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use mhcmotifs_cluster::ClusterError;

    struct EverythingIsNoise;

    impl DensityClusterer for EverythingIsNoise {
        fn cluster(
            &self,
            vectors: &[Vec<f64>],
            _: usize,
        ) -> std::result::Result<Vec<Option<usize>>, ClusterError> {
            Ok(vec![None; vectors.len()])
        }
    }

    #[fixture]
    fn records() -> Vec<RawRecord> {
        let mut records = Vec::new();
        for allele in ["A0201", "A0206"] {
            for peptide in ["GILGFVFTL", "LLFGYPVYV", "YLLPAIVHI", "SLYNTVATL"] {
                records.push(RawRecord::new(allele, peptide));
            }
        }
        for peptide in ["APRTVALTA", "RPRGEVRFL", "SPRWYFYYL", "KPRSPVVEL"] {
            records.push(RawRecord::new("B0702", peptide));
        }
        records.push(RawRecord::new("H2-Db", "ASNENMETM"));
        records
    }

    #[rstest]
    fn test_pipeline_results(records: Vec<RawRecord>) {
        let mut pipeline = MotifPipeline::new(MotifsConfig::default());
        let results = pipeline.run(&records).unwrap();

        assert_eq!(results.matrix.len(), 3);
        assert_eq!(results.matrix.dimension(), 9 * 20);

        let a0201 = results.assignments.get(&AlleleSlug::from("hla_a_02_01"));
        let a0206 = results.assignments.get(&AlleleSlug::from("hla_a_02_06"));
        let b0702 = results.assignments.get(&AlleleSlug::from("hla_b_07_02"));
        assert_eq!(a0201, Some(ClusterLabel::Cluster(1)));
        assert_eq!(a0201, a0206);
        assert_eq!(b0702, Some(ClusterLabel::Outlier));
    }

    #[rstest]
    fn test_action_log_has_one_entry_per_step(records: Vec<RawRecord>) {
        let mut pipeline = MotifPipeline::new(MotifsConfig::default());
        pipeline.run(&records).unwrap();

        let log = pipeline.action_log();
        let steps: Vec<&str> = log.steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(
            steps,
            vec!["aggregate", "normalize", "grade", "simplify", "vectorize", "cluster"]
        );

        let summary = log.summary.unwrap();
        assert_eq!(summary.records_seen, 13);
        assert_eq!(summary.records_excluded, 1);
        assert_eq!(summary.shared_peptides, 4);

        let cluster = &log.steps[5];
        assert_eq!(cluster.clusters_found, Some(1));
        assert_eq!(cluster.outlier_count, Some(1));
    }

    #[rstest]
    fn test_custom_clusterer(records: Vec<RawRecord>) {
        let mut pipeline =
            MotifPipeline::new(MotifsConfig::default()).with_clusterer(Box::new(EverythingIsNoise));
        let results = pipeline.run(&records).unwrap();

        assert_eq!(results.assignments.cluster_count(), 0);
        assert_eq!(results.assignments.outlier_count(), 3);
    }

    #[rstest]
    fn test_single_allele_fails_at_clustering() {
        let records = vec![RawRecord::new("A0201", "GILGFVFTL")];
        let mut pipeline = MotifPipeline::new(MotifsConfig::default());

        let err = pipeline.run(&records).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ClusterError>(),
            Some(ClusterError::InsufficientClusteringInput { found: 1 })
        ));
    }

    #[rstest]
    fn test_step_record_skips_missing_counts() {
        let json = serde_json::to_string(&StepRecord::new("write").with_rows_written(12)).unwrap();
        assert_eq!(json, r#"{"step":"write","rows_written":12}"#);
    }
}
