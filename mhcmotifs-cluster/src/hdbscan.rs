//! Hierarchical density-based clustering (HDBSCAN).
//!
//! The implementation follows the usual construction:
//!
//! 1. core distance of every point (distance to its `min_samples`-th neighbour, counting itself)
//! 2. mutual reachability distances and their minimum spanning tree (Prim)
//! 3. single-linkage hierarchy from the sorted tree edges (union-find)
//! 4. condensed tree, pruned at `min_cluster_size`
//! 5. excess-of-mass cluster selection by stability
//!
//! Motif sets are small (one vector per allele), so distances are kept in a
//! dense matrix and the tree is built in O(n²).

use std::collections::VecDeque;

use log::debug;

use crate::errors::{ClusterError, Result};
use crate::traits::{DensityClusterer, validate_input};

/// Distances below this are treated as equal to it when converting to density,
/// so coincident points get a large but finite lambda.
const MIN_DISTANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct HdbscanParams {
    /// Neighbourhood size for core distances. Defaults to the minimum cluster size.
    pub min_samples: Option<usize>,
    /// Let the root of the condensed tree be selected as a cluster.
    pub allow_single_cluster: bool,
}

impl Default for HdbscanParams {
    fn default() -> Self {
        Self {
            min_samples: None,
            allow_single_cluster: true,
        }
    }
}

impl HdbscanParams {
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = Some(min_samples);
        self
    }

    pub fn with_allow_single_cluster(mut self, allow: bool) -> Self {
        self.allow_single_cluster = allow;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_samples == Some(0) {
            return Err(ClusterError::InvalidParameter(
                "min_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn effective_min_samples(&self, min_cluster_size: usize) -> usize {
        self.min_samples.unwrap_or(min_cluster_size)
    }
}

#[derive(Debug, Clone, Copy)]
struct MstEdge {
    a: usize,
    b: usize,
    weight: f64,
}

/// A single-linkage merge. The merged node is `n + index` of the merge.
#[derive(Debug, Clone, Copy)]
struct Merge {
    left: usize,
    right: usize,
    distance: f64,
    size: usize,
}

/// Edge of the condensed tree. Cluster labels start at `n` (the root);
/// children below `n` are points falling out of their parent cluster.
#[derive(Debug, Clone, Copy)]
struct CondensedEdge {
    parent: usize,
    child: usize,
    lambda: f64,
    size: usize,
}

///
/// HDBSCAN clusterer over Euclidean distance.
///
/// # Example
///
/// ```
/// use mhcmotifs_cluster::{DensityClusterer, Hdbscan};
///
/// let vectors = vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![10.0, 10.0]];
/// let labels = Hdbscan::default().cluster(&vectors, 2).unwrap();
/// assert_eq!(labels, vec![Some(0), Some(0), None]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Hdbscan {
    params: HdbscanParams,
}

impl Hdbscan {
    pub fn new(params: HdbscanParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl DensityClusterer for Hdbscan {
    fn cluster(&self, vectors: &[Vec<f64>], min_cluster_size: usize) -> Result<Vec<Option<usize>>> {
        validate_input(vectors, min_cluster_size)?;

        let n = vectors.len();
        if n < min_cluster_size {
            debug!(
                "HDBSCAN: {} points, fewer than min_cluster_size={}, all noise",
                n, min_cluster_size
            );
            return Ok(vec![None; n]);
        }

        let min_samples = self.params.effective_min_samples(min_cluster_size);

        let distances = pairwise_distances(vectors);
        let core = core_distances(&distances, min_samples);
        let mst = minimum_spanning_tree(&distances, &core);
        let merges = single_linkage(&mst, n);
        let (condensed, cluster_count) = condense_tree(&merges, n, min_cluster_size);
        let stability = cluster_stability(&condensed, n, cluster_count);
        let selected = select_clusters(
            &condensed,
            &stability,
            n,
            cluster_count,
            self.params.allow_single_cluster,
        );
        let labels = label_points(&condensed, &selected, n, cluster_count);

        debug!(
            "HDBSCAN: {} points, min_cluster_size={}, min_samples={}, {} candidate clusters, {} selected, {} noise",
            n,
            min_cluster_size,
            min_samples,
            cluster_count,
            selected.iter().filter(|s| **s).count(),
            labels.iter().filter(|l| l.is_none()).count()
        );

        Ok(labels)
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn pairwise_distances(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&vectors[i], &vectors[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    distances
}

/// Distance to the `min_samples`-th nearest point, the point itself included.
fn core_distances(distances: &[Vec<f64>], min_samples: usize) -> Vec<f64> {
    let k = min_samples.clamp(1, distances.len());
    distances
        .iter()
        .map(|row| {
            let mut sorted = row.clone();
            sorted.sort_by(f64::total_cmp);
            sorted[k - 1]
        })
        .collect()
}

/// Prim's algorithm over mutual reachability distances. Edges come back
/// sorted by weight; the sort is stable so equal weights keep discovery order.
fn minimum_spanning_tree(distances: &[Vec<f64>], core: &[f64]) -> Vec<MstEdge> {
    let n = distances.len();
    let mutual_reachability = |i: usize, j: usize| distances[i][j].max(core[i]).max(core[j]);

    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut nearest = vec![0usize; n];
    let mut edges = Vec::with_capacity(n.saturating_sub(1));

    let mut current = 0;
    in_tree[current] = true;

    for _ in 1..n {
        for j in 0..n {
            if in_tree[j] {
                continue;
            }
            let d = mutual_reachability(current, j);
            if d < best[j] {
                best[j] = d;
                nearest[j] = current;
            }
        }

        let Some(next) = (0..n)
            .filter(|j| !in_tree[*j])
            .min_by(|a, b| best[*a].total_cmp(&best[*b]))
        else {
            break;
        };

        in_tree[next] = true;
        edges.push(MstEdge {
            a: nearest[next],
            b: next,
            weight: best[next],
        });
        current = next;
    }

    edges.sort_by(|x, y| x.weight.total_cmp(&y.weight));
    edges
}

fn find_root(parent: &mut [usize], node: usize) -> usize {
    let mut root = node;
    while parent[root] != root {
        root = parent[root];
    }
    let mut node = node;
    while parent[node] != root {
        let next = parent[node];
        parent[node] = root;
        node = next;
    }
    root
}

fn single_linkage(mst: &[MstEdge], n: usize) -> Vec<Merge> {
    let node_count = 2 * n - 1;
    let mut parent: Vec<usize> = (0..node_count).collect();
    let mut size = vec![1usize; node_count];
    let mut merges = Vec::with_capacity(mst.len());

    for edge in mst {
        let left = find_root(&mut parent, edge.a);
        let right = find_root(&mut parent, edge.b);
        let merged = n + merges.len();
        let merged_size = size[left] + size[right];

        merges.push(Merge {
            left,
            right,
            distance: edge.weight,
            size: merged_size,
        });

        parent[left] = merged;
        parent[right] = merged;
        size[merged] = merged_size;
    }

    merges
}

fn density(distance: f64) -> f64 {
    1.0 / distance.max(MIN_DISTANCE)
}

fn leaves(merges: &[Merge], n: usize, node: usize) -> Vec<usize> {
    let mut points = Vec::new();
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if node < n {
            points.push(node);
        } else {
            let merge = &merges[node - n];
            stack.push(merge.right);
            stack.push(merge.left);
        }
    }
    points
}

///
/// Walk the hierarchy from the root breadth-first and keep only splits where
/// both sides reach `min_cluster_size`. Smaller sides drop out as points.
///
/// Returns the condensed edges and the number of cluster labels used
/// (labels run from `n` to `n + count - 1`).
///
fn condense_tree(merges: &[Merge], n: usize, min_cluster_size: usize) -> (Vec<CondensedEdge>, usize) {
    let node_size = |node: usize| if node < n { 1 } else { merges[node - n].size };
    let root = n + merges.len() - 1;

    let mut edges = Vec::with_capacity(2 * n);
    let mut next_label = n + 1;
    let mut queue = VecDeque::from([(root, n)]);

    let fall_out = |edges: &mut Vec<CondensedEdge>, node: usize, label: usize, lambda: f64| {
        for point in leaves(merges, n, node) {
            edges.push(CondensedEdge {
                parent: label,
                child: point,
                lambda,
                size: 1,
            });
        }
    };

    while let Some((node, label)) = queue.pop_front() {
        if node < n {
            continue;
        }

        let merge = &merges[node - n];
        let lambda = density(merge.distance);
        let left_is_cluster = node_size(merge.left) >= min_cluster_size;
        let right_is_cluster = node_size(merge.right) >= min_cluster_size;

        match (left_is_cluster, right_is_cluster) {
            (true, true) => {
                for child in [merge.left, merge.right] {
                    let child_label = next_label;
                    next_label += 1;
                    edges.push(CondensedEdge {
                        parent: label,
                        child: child_label,
                        lambda,
                        size: node_size(child),
                    });
                    queue.push_back((child, child_label));
                }
            }
            (false, false) => {
                fall_out(&mut edges, merge.left, label, lambda);
                fall_out(&mut edges, merge.right, label, lambda);
            }
            (true, false) => {
                fall_out(&mut edges, merge.right, label, lambda);
                queue.push_back((merge.left, label));
            }
            (false, true) => {
                fall_out(&mut edges, merge.left, label, lambda);
                queue.push_back((merge.right, label));
            }
        }
    }

    (edges, next_label - n)
}

/// Stability of cluster `c` is the sum of `(lambda - birth(c)) * size` over its child edges.
fn cluster_stability(condensed: &[CondensedEdge], n: usize, cluster_count: usize) -> Vec<f64> {
    let mut birth = vec![0.0; cluster_count];
    for edge in condensed.iter().filter(|e| e.child >= n) {
        birth[edge.child - n] = edge.lambda;
    }

    let mut stability = vec![0.0; cluster_count];
    for edge in condensed {
        let c = edge.parent - n;
        stability[c] += (edge.lambda - birth[c]) * edge.size as f64;
    }
    stability
}

/// Excess-of-mass selection. Child labels are always greater than their
/// parent's, so walking labels in descending order visits children first.
fn select_clusters(
    condensed: &[CondensedEdge],
    stability: &[f64],
    n: usize,
    cluster_count: usize,
    allow_single_cluster: bool,
) -> Vec<bool> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); cluster_count];
    for edge in condensed.iter().filter(|e| e.child >= n) {
        children[edge.parent - n].push(edge.child - n);
    }

    let mut stability = stability.to_vec();
    let mut selected = vec![true; cluster_count];
    selected[0] = allow_single_cluster;

    for c in (0..cluster_count).rev() {
        if c == 0 && !allow_single_cluster {
            continue;
        }

        let subtree: f64 = children[c].iter().map(|k| stability[*k]).sum();
        if subtree > stability[c] {
            selected[c] = false;
            stability[c] = subtree;
        } else {
            let mut stack = children[c].clone();
            while let Some(d) = stack.pop() {
                selected[d] = false;
                stack.extend(children[d].iter().copied());
            }
        }
    }

    selected
}

///
/// Map every point to a selected cluster, or to noise when none of its
/// ancestors was selected. A point attached to a selected root only counts as
/// a member if it survives to the root's densest split.
///
fn label_points(
    condensed: &[CondensedEdge],
    selected: &[bool],
    n: usize,
    cluster_count: usize,
) -> Vec<Option<usize>> {
    let mut cluster_parent: Vec<Option<usize>> = vec![None; cluster_count];
    let mut point_parent = vec![(0usize, 0.0f64); n];
    let mut root_max_lambda = 0.0f64;

    for edge in condensed {
        if edge.child >= n {
            cluster_parent[edge.child - n] = Some(edge.parent - n);
        } else {
            point_parent[edge.child] = (edge.parent - n, edge.lambda);
        }
        if edge.parent == n {
            root_max_lambda = root_max_lambda.max(edge.lambda);
        }
    }

    let mut raw_index = vec![None; cluster_count];
    let mut next = 0;
    for (c, is_selected) in selected.iter().enumerate() {
        if *is_selected {
            raw_index[c] = Some(next);
            next += 1;
        }
    }

    point_parent
        .iter()
        .map(|(parent, lambda)| {
            let mut current = Some(*parent);
            while let Some(c) = current {
                if selected[c] {
                    if c == 0 && *lambda < root_max_lambda {
                        return None;
                    }
                    return raw_index[c];
                }
                current = cluster_parent[c];
            }
            None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn two_groups_and_a_stray() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![11.0, 10.0],
            vec![50.0, 50.0],
        ]
    }

    #[rstest]
    fn test_identical_pair_with_distant_third() {
        let vectors = vec![vec![0.2, 0.8, 0.0], vec![0.2, 0.8, 0.0], vec![9.0, 0.0, 4.0]];
        let labels = Hdbscan::default().cluster(&vectors, 2).unwrap();

        assert_eq!(labels, vec![Some(0), Some(0), None]);
    }

    #[rstest]
    fn test_two_groups_and_a_stray() {
        let labels = Hdbscan::default()
            .cluster(&two_groups_and_a_stray(), 2)
            .unwrap();

        assert_eq!(
            labels,
            vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1), None]
        );
    }

    #[rstest]
    fn test_identical_points_form_one_cluster() {
        let vectors = vec![vec![1.0, 2.0]; 4];
        let labels = Hdbscan::default().cluster(&vectors, 2).unwrap();

        assert_eq!(labels, vec![Some(0); 4]);
    }

    #[rstest]
    fn test_root_cluster_can_be_disallowed() {
        let vectors = vec![vec![0.0], vec![0.0], vec![100.0]];
        let clusterer =
            Hdbscan::new(HdbscanParams::default().with_allow_single_cluster(false)).unwrap();

        assert_eq!(clusterer.cluster(&vectors, 2).unwrap(), vec![None; 3]);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    fn test_clusters_reach_min_size(#[case] min_cluster_size: usize) {
        let labels = Hdbscan::default()
            .cluster(&two_groups_and_a_stray(), min_cluster_size)
            .unwrap();

        let clusters = labels.iter().flatten().max().map_or(0, |m| m + 1);
        for c in 0..clusters {
            let members = labels.iter().filter(|l| **l == Some(c)).count();
            assert!(members >= min_cluster_size);
        }
    }

    #[rstest]
    #[case(vec![vec![4.0], vec![4.0]], 3)]
    #[case(vec![vec![0.0, 1.0], vec![0.0, 1.0], vec![0.1, 1.0]], 4)]
    fn test_fewer_points_than_min_cluster_size_are_noise(
        #[case] vectors: Vec<Vec<f64>>,
        #[case] min_cluster_size: usize,
    ) {
        let labels = Hdbscan::default()
            .cluster(&vectors, min_cluster_size)
            .unwrap();

        assert_eq!(labels, vec![None; vectors.len()]);
    }

    #[rstest]
    fn test_labels_are_contiguous_from_zero() {
        let labels = Hdbscan::default()
            .cluster(&two_groups_and_a_stray(), 2)
            .unwrap();

        let mut seen: Vec<usize> = labels.iter().flatten().copied().collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen, (0..seen.len()).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_core_distance_counts_the_point_itself() {
        let distances = pairwise_distances(&[vec![0.0], vec![1.0], vec![3.0]]);
        assert_eq!(core_distances(&distances, 1), vec![0.0, 0.0, 0.0]);
        assert_eq!(core_distances(&distances, 2), vec![1.0, 1.0, 2.0]);
    }

    #[rstest]
    fn test_spanning_tree_has_n_minus_one_sorted_edges() {
        let vectors = two_groups_and_a_stray();
        let distances = pairwise_distances(&vectors);
        let core = core_distances(&distances, 2);
        let mst = minimum_spanning_tree(&distances, &core);

        assert_eq!(mst.len(), vectors.len() - 1);
        assert!(mst.windows(2).all(|w| w[0].weight <= w[1].weight));
    }

    #[rstest]
    fn test_rejects_zero_min_samples() {
        let result = Hdbscan::new(HdbscanParams::default().with_min_samples(0));
        assert!(matches!(result, Err(ClusterError::InvalidParameter(_))));
    }

    #[rstest]
    fn test_rejects_single_vector() {
        let result = Hdbscan::default().cluster(&[vec![1.0]], 2);
        assert!(matches!(
            result,
            Err(ClusterError::InsufficientClusteringInput { found: 1 })
        ));
    }
}
