//! Deterministic k-means over RGB samples.
//!
//! Clustering runs on the histogram of distinct colors rather than on raw
//! samples: each distinct color is a weighted point. Initialisation is
//! farthest-first starting from the most frequent color, so the same samples
//! always produce the same clusters.
//!
//! When there are no more distinct colors than requested clusters, every
//! distinct color becomes its own cluster. Clusters that end up empty are
//! dropped, so the result may hold fewer than `k` clusters but never an
//! empty one.

use std::collections::BTreeMap;

/// Default number of clusters.
pub const DEFAULT_K: usize = 5;

/// Default cap on Lloyd iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// A non-empty color cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Weighted mean color in RGB space.
    pub centroid: [f64; 3],
    /// Number of samples assigned to this cluster.
    pub count: usize,
}

impl Cluster {
    /// Centroid rounded to 8-bit channels.
    pub fn rgb(&self) -> [u8; 3] {
        self.centroid.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

/// k-means parameters.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    pub k: usize,
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Cluster the samples. Returns an empty vector for empty input.
    pub fn cluster(&self, samples: &[[u8; 3]]) -> Vec<Cluster> {
        let k = self.k.max(1);
        let histogram = color_histogram(samples);
        if histogram.is_empty() {
            return Vec::new();
        }

        let points: Vec<([f64; 3], usize)> = histogram
            .iter()
            .map(|(rgb, count)| (rgb.map(f64::from), *count))
            .collect();

        if points.len() <= k {
            return points
                .into_iter()
                .map(|(centroid, count)| Cluster { centroid, count })
                .collect();
        }

        let mut centroids = farthest_first(&points, k);
        let mut assignment = vec![usize::MAX; points.len()];

        for iteration in 0..self.max_iterations.max(1) {
            let mut changed = false;
            for (i, (point, _)) in points.iter().enumerate() {
                let nearest = nearest_centroid(point, &centroids);
                if assignment[i] != nearest {
                    assignment[i] = nearest;
                    changed = true;
                }
            }
            if !changed {
                tracing::trace!(iteration, "k-means converged");
                break;
            }
            centroids = recompute_centroids(&points, &assignment, &centroids);
        }

        let mut counts = vec![0usize; centroids.len()];
        for ((_, count), &cluster) in points.iter().zip(&assignment) {
            counts[cluster] += count;
        }

        centroids
            .into_iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(centroid, count)| Cluster { centroid, count })
            .collect()
    }
}

/// Count occurrences of each distinct color, ordered by RGB value.
fn color_histogram(samples: &[[u8; 3]]) -> BTreeMap<[u8; 3], usize> {
    let mut histogram = BTreeMap::new();
    for px in samples {
        *histogram.entry(*px).or_insert(0) += 1;
    }
    histogram
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (0..3).map(|i| (a[i] - b[i]).powi(2)).sum()
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Pick `k` seeds: the most frequent color, then repeatedly the color farthest
/// from every seed chosen so far. Ties go to the lowest RGB value.
///
/// Callers guarantee `points.len() > k`, so every seed is a distinct color.
fn farthest_first(points: &[([f64; 3], usize)], k: usize) -> Vec<[f64; 3]> {
    let mut first = 0;
    for (i, (_, count)) in points.iter().enumerate() {
        if *count > points[first].1 {
            first = i;
        }
    }

    let mut seeds = vec![points[first].0];
    let mut min_dist: Vec<f64> = points
        .iter()
        .map(|(p, _)| squared_distance(p, &seeds[0]))
        .collect();

    while seeds.len() < k {
        let mut next = 0;
        for i in 1..points.len() {
            if min_dist[i] > min_dist[next] {
                next = i;
            }
        }
        let seed = points[next].0;
        seeds.push(seed);
        for (i, (p, _)) in points.iter().enumerate() {
            min_dist[i] = min_dist[i].min(squared_distance(p, &seed));
        }
    }
    seeds
}

/// Weighted mean of each cluster's points. Empty clusters keep their centroid.
fn recompute_centroids(
    points: &[([f64; 3], usize)],
    assignment: &[usize],
    previous: &[[f64; 3]],
) -> Vec<[f64; 3]> {
    let mut sums = vec![[0.0f64; 3]; previous.len()];
    let mut weights = vec![0usize; previous.len()];

    for ((point, count), &cluster) in points.iter().zip(assignment) {
        let w = *count as f64;
        for c in 0..3 {
            sums[cluster][c] += point[c] * w;
        }
        weights[cluster] += count;
    }

    sums.into_iter()
        .zip(weights)
        .zip(previous)
        .map(|((sum, weight), prev)| {
            if weight == 0 {
                *prev
            } else {
                sum.map(|s| s / weight as f64)
            }
        })
        .collect()
}
