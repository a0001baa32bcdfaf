//! # Motif clustering
//!
//! Groups alleles whose motif vectors sit close together, using a pluggable
//! [DensityClusterer] strategy. [Hdbscan] is the default strategy.
//!
//! ```
//! use mhcmotifs_cluster::{ClusterLabel, Hdbscan, assign_clusters};
//! use mhcmotifs_core::AlleleSlug;
//! use mhcmotifs_distributions::MotifMatrix;
//!
//! let matrix = MotifMatrix {
//!     alleles: vec![
//!         AlleleSlug::from("hla_a_02_01"),
//!         AlleleSlug::from("hla_a_02_06"),
//!         AlleleSlug::from("hla_b_07_02"),
//!     ],
//!     feature_labels: vec!["2_L".to_string(), "2_P".to_string()],
//!     rows: vec![vec![100.0, 0.0], vec![100.0, 0.0], vec![0.0, 100.0]],
//! };
//!
//! let assignments = assign_clusters(&Hdbscan::default(), &matrix, 2).unwrap();
//! assert_eq!(assignments.get(&AlleleSlug::from("hla_a_02_06")), Some(ClusterLabel::Cluster(1)));
//! assert_eq!(assignments.get(&AlleleSlug::from("hla_b_07_02")), Some(ClusterLabel::Outlier));
//! ```
pub mod assignment;
pub mod errors;
pub mod hdbscan;
pub mod traits;

pub use assignment::{ClusterAssignments, ClusterLabel, assign_clusters};
pub use errors::ClusterError;
pub use hdbscan::{Hdbscan, HdbscanParams};
pub use traits::DensityClusterer;
