use crate::errors::{ClusterError, Result};

///
/// A density-based clustering strategy.
///
/// Implementations return one raw label per input vector: `Some(index)` for
/// a member of cluster `index` (0-based, contiguous) or `None` for noise.
/// Relabeling into presentation ids happens elsewhere, so a strategy can be
/// swapped without touching vectorisation or assignment code.
///
pub trait DensityClusterer {
    fn cluster(&self, vectors: &[Vec<f64>], min_cluster_size: usize) -> Result<Vec<Option<usize>>>;
}

///
/// Check that a batch of vectors can be clustered: at least two of them, one
/// shared non-zero dimensionality, finite values, and a minimum cluster size
/// of at least 2.
///
/// Returns the shared dimensionality.
///
pub fn validate_input(vectors: &[Vec<f64>], min_cluster_size: usize) -> Result<usize> {
    if min_cluster_size < 2 {
        return Err(ClusterError::InvalidParameter(format!(
            "min_cluster_size must be at least 2, got {}",
            min_cluster_size
        )));
    }

    if vectors.len() < 2 {
        return Err(ClusterError::InsufficientClusteringInput {
            found: vectors.len(),
        });
    }

    let expected = vectors[0].len();
    if expected == 0 {
        return Err(ClusterError::InvalidParameter(
            "motif vectors have no features".to_string(),
        ));
    }

    for (index, vector) in vectors.iter().enumerate() {
        if vector.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected,
                found: vector.len(),
            });
        }
        if let Some(column) = vector.iter().position(|v| !v.is_finite()) {
            return Err(ClusterError::NonFiniteValue { row: index, column });
        }
    }

    Ok(expected)
}
