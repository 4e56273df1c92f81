//! One k-means iteration: assign every point to its nearest centroid, then
//! move every centroid to the mean of its points.

use super::geometry::{nearest, Point, RunningMean};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of a single assign + update pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    /// Centroids after the update phase, one per cluster.
    pub centroids: Vec<Point>,
    /// Cluster of each point, computed against the centroids *before* the
    /// update. These are the memberships the new means were taken over.
    pub assignment: Vec<usize>,
    /// Number of points in each cluster.
    pub cluster_sizes: Vec<usize>,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
}

/// Run one iteration over `data` starting from `centroids`.
///
/// Ties in the assignment phase go to the lowest centroid index. A cluster
/// that receives no points keeps its previous centroid, so the returned
/// centroid count always equals `centroids.len()`. With no centroids there
/// is nothing to assign to: the result is empty.
///
/// The result depends only on the two inputs.
pub fn iterate(data: &[Point], centroids: &[Point]) -> Iteration {
    if centroids.is_empty() {
        return Iteration {
            centroids: Vec::new(),
            assignment: Vec::new(),
            cluster_sizes: Vec::new(),
            inertia: 0.0,
        };
    }

    let (assignment, inertia) = assign(data, centroids);

    let mut means = vec![RunningMean::default(); centroids.len()];
    for (point, &c) in data.iter().zip(&assignment) {
        means[c].push(point);
    }

    let new_centroids = centroids
        .iter()
        .zip(&means)
        .map(|(old, m)| m.get().unwrap_or(*old))
        .collect();
    let cluster_sizes = means.iter().map(RunningMean::count).collect();

    Iteration {
        centroids: new_centroids,
        assignment,
        cluster_sizes,
        inertia,
    }
}

// Both variants expect a non-empty `centroids`, so `nearest` always finds one.
#[cfg(not(feature = "parallel"))]
fn assign(data: &[Point], centroids: &[Point]) -> (Vec<usize>, f64) {
    let mut inertia = 0.0;
    let assignment = data
        .iter()
        .map(|p| {
            let (idx, dist) = nearest(p, centroids).unwrap_or((0, f64::INFINITY));
            inertia += dist;
            idx
        })
        .collect();
    (assignment, inertia)
}

#[cfg(feature = "parallel")]
fn assign(data: &[Point], centroids: &[Point]) -> (Vec<usize>, f64) {
    let nearest_per_point: Vec<(usize, f64)> = data
        .par_iter()
        .map(|p| nearest(p, centroids).unwrap_or((0, f64::INFINITY)))
        .collect();
    // summed serially so the result matches the single-threaded build bit for bit
    let inertia = nearest_per_point.iter().map(|&(_, d)| d).sum();
    let assignment = nearest_per_point.into_iter().map(|(idx, _)| idx).collect();
    (assignment, inertia)
}
