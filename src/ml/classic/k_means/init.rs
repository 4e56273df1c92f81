//! Centroid initialization strategies.
//!
//! - `random`: `k` distinct data points drawn uniformly without replacement.
//! - `farthest_first`: a random first centroid, then repeatedly the point
//!   farthest from every centroid chosen so far.
//! - `kmeans++`: a random first centroid, then points drawn with probability
//!   proportional to their squared distance to the nearest chosen centroid.
//! - `manual`: caller-supplied centroids.
//!
//! The randomized strategies only draw from the RNG they are given, so a
//! seeded `ChaCha20Rng` makes them reproducible.

use super::geometry::{distance_sq, Point};
use crate::error::{Error, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index::sample;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// How the first set of centroids is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum InitMethod {
    Random,
    FarthestFirst,
    KMeansPlusPlus,
    /// Centroids given by the caller, one per cluster.
    Manual(Vec<Point>),
}

impl InitMethod {
    /// Name used on the wire and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            InitMethod::Random => "random",
            InitMethod::FarthestFirst => "farthest_first",
            InitMethod::KMeansPlusPlus => "kmeans++",
            InitMethod::Manual(_) => "manual",
        }
    }
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "random" => Ok(InitMethod::Random),
            "farthest_first" | "farthest-first" => Ok(InitMethod::FarthestFirst),
            "kmeans++" | "kmeanspp" => Ok(InitMethod::KMeansPlusPlus),
            "manual" => Err(Error::invalid_config(
                "manual initialization needs explicit centroids",
            )),
            other => Err(Error::invalid_config(format!(
                "unknown initialization method '{other}'"
            ))),
        }
    }
}

/// Produce `k` initial centroids from `data` using `method`.
///
/// # Errors
///
/// - `InvalidInput` if `data` is empty.
/// - `InvalidConfig` if `k` is 0 or larger than `data.len()`, or if manual
///   centroids do not number exactly `k` or are not finite.
pub fn initialize_centroids<R: Rng + ?Sized>(
    data: &[Point],
    k: usize,
    method: &InitMethod,
    rng: &mut R,
) -> Result<Vec<Point>> {
    if data.is_empty() {
        return Err(Error::invalid_input("cannot initialize from an empty dataset"));
    }
    if k == 0 {
        return Err(Error::invalid_config("k must be at least 1"));
    }
    if k > data.len() {
        return Err(Error::invalid_config(format!(
            "k = {k} exceeds the dataset size of {}",
            data.len()
        )));
    }

    match method {
        InitMethod::Random => Ok(random(data, k, rng)),
        InitMethod::FarthestFirst => Ok(farthest_first(data, k, rng)),
        InitMethod::KMeansPlusPlus => Ok(kmeans_plus_plus(data, k, rng)),
        InitMethod::Manual(centroids) => manual(centroids, k),
    }
}

fn random<R: Rng + ?Sized>(data: &[Point], k: usize, rng: &mut R) -> Vec<Point> {
    sample(rng, data.len(), k)
        .into_iter()
        .map(|idx| data[idx])
        .collect()
}

fn farthest_first<R: Rng + ?Sized>(data: &[Point], k: usize, rng: &mut R) -> Vec<Point> {
    farthest_from(data, rng.gen_range(0..data.len()), k)
}

/// Farthest-first traversal from `data[first]`. Ties go to the lowest index.
fn farthest_from(data: &[Point], first: usize, k: usize) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[first]);
    // min_dist[i] = squared distance from data[i] to its nearest chosen centroid
    let mut min_dist: Vec<f64> = data
        .iter()
        .map(|p| distance_sq(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let mut best_idx = 0;
        let mut best_dist = f64::NEG_INFINITY;
        for (i, &d) in min_dist.iter().enumerate() {
            if d > best_dist {
                best_dist = d;
                best_idx = i;
            }
        }
        let chosen = data[best_idx];
        centroids.push(chosen);
        update_min_dist(data, &chosen, &mut min_dist);
    }
    centroids
}

fn kmeans_plus_plus<R: Rng + ?Sized>(data: &[Point], k: usize, rng: &mut R) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.gen_range(0..data.len())]);
    let mut min_dist: Vec<f64> = data
        .iter()
        .map(|p| distance_sq(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let chosen = data[weighted_draw(&min_dist, rng)];
        centroids.push(chosen);
        update_min_dist(data, &chosen, &mut min_dist);
    }
    centroids
}

/// Draw an index with probability proportional to `weights[i]`.
///
/// Weights are scaled by their maximum first so the running total stays
/// finite even when squared distances are near `f64::MAX`. Weights that
/// overflowed to infinity dominate every finite one, so the draw is uniform
/// among them. All-zero weights, which happen when every point already sits
/// on a centroid, also fall back to a uniform draw.
fn weighted_draw<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let max = weights.iter().copied().fold(0.0_f64, f64::max);
    if max == 0.0 {
        return rng.gen_range(0..weights.len());
    }
    if max.is_infinite() {
        let far: Vec<usize> = (0..weights.len())
            .filter(|&i| weights[i].is_infinite())
            .collect();
        return far[rng.gen_range(0..far.len())];
    }
    match WeightedIndex::new(weights.iter().map(|w| w / max)) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..weights.len()),
    }
}

fn update_min_dist(data: &[Point], chosen: &Point, min_dist: &mut [f64]) {
    for (p, d) in data.iter().zip(min_dist.iter_mut()) {
        let dist = distance_sq(p, chosen);
        if dist < *d {
            *d = dist;
        }
    }
}

fn manual(centroids: &[Point], k: usize) -> Result<Vec<Point>> {
    if centroids.len() != k {
        return Err(Error::invalid_config(format!(
            "manual initialization supplied {} centroids, expected {k}",
            centroids.len()
        )));
    }
    if centroids.iter().any(|c| !c.is_finite()) {
        return Err(Error::invalid_config(
            "manual centroids must have finite coordinates",
        ));
    }
    Ok(centroids.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn grid() -> Vec<Point> {
        let mut pts = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                pts.push(Point::new(i as f64 / 10.0, j as f64 / 10.0));
            }
        }
        pts
    }

    #[test]
    fn test_parse_methods() {
        assert_eq!("random".parse::<InitMethod>(), Ok(InitMethod::Random));
        assert_eq!(
            "farthest_first".parse::<InitMethod>(),
            Ok(InitMethod::FarthestFirst)
        );
        assert_eq!(
            "kmeans++".parse::<InitMethod>(),
            Ok(InitMethod::KMeansPlusPlus)
        );
        assert!(matches!(
            "bogus".parse::<InitMethod>(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            "manual".parse::<InitMethod>(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for m in [
            InitMethod::Random,
            InitMethod::FarthestFirst,
            InitMethod::KMeansPlusPlus,
        ] {
            assert_eq!(m.name().parse::<InitMethod>(), Ok(m));
        }
    }

    #[test]
    fn test_random_picks_distinct_points() {
        let data = grid();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let centroids = initialize_centroids(&data, 10, &InitMethod::Random, &mut rng).unwrap();
        assert_eq!(centroids.len(), 10);
        for (i, a) in centroids.iter().enumerate() {
            assert!(data.contains(a));
            for b in &centroids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_random_k_equals_n_uses_every_point() {
        let data = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut centroids =
            initialize_centroids(&data, 3, &InitMethod::Random, &mut rng).unwrap();
        centroids.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        assert_eq!(centroids, data);
    }

    #[test]
    fn test_seeded_methods_are_reproducible() {
        let data = grid();
        for method in [
            InitMethod::Random,
            InitMethod::FarthestFirst,
            InitMethod::KMeansPlusPlus,
        ] {
            let mut a = ChaCha20Rng::seed_from_u64(99);
            let mut b = ChaCha20Rng::seed_from_u64(99);
            let first = initialize_centroids(&data, 4, &method, &mut a).unwrap();
            let second = initialize_centroids(&data, 4, &method, &mut b).unwrap();
            assert_eq!(first, second, "{method} not reproducible");
        }
    }

    #[test]
    fn test_farthest_first_spreads_out() {
        // two tight groups far apart: the second centroid must land in the
        // group the first one did not
        let data = vec![
            Point::new(0.0, 0.0),
            Point::new(0.01, 0.0),
            Point::new(0.0, 0.01),
            Point::new(10.0, 10.0),
            Point::new(10.01, 10.0),
        ];
        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let c = initialize_centroids(&data, 2, &InitMethod::FarthestFirst, &mut rng).unwrap();
            assert!((c[0].x < 5.0) != (c[1].x < 5.0), "seed {seed}: {c:?}");
        }
    }

    #[test]
    fn test_farthest_first_picks_maximum() {
        let data = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let c = initialize_centroids(&data, 3, &InitMethod::FarthestFirst, &mut rng).unwrap();
        // every point ends up chosen exactly once
        for p in &data {
            assert_eq!(c.iter().filter(|q| *q == p).count(), 1);
        }
        // whichever end or middle point comes first, the next pick is an extreme
        assert!(c[1] == data[0] || c[1] == data[2]);
    }

    #[test]
    fn test_kmeans_plus_plus_never_duplicates_when_possible() {
        // points already chosen have zero weight, so they cannot be drawn again
        let data = grid();
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let c = initialize_centroids(&data, 6, &InitMethod::KMeansPlusPlus, &mut rng).unwrap();
            for (i, a) in c.iter().enumerate() {
                for b in &c[i + 1..] {
                    assert_ne!(a, b, "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn test_farthest_first_ties_go_to_lowest_index() {
        // (1,0), (-1,0) and (0,1) are all at distance 1 from the origin
        let data = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let c = farthest_from(&data, 0, 3);
        // second pick: three-way tie, lowest index wins
        assert_eq!(c[1], data[1]);
        // third pick: (-1,0) and (0,1) both sit at squared distance 1 from
        // their nearest centroid
        assert_eq!(c[2], data[2]);
    }

    #[test]
    fn test_huge_coordinates_do_not_break_seeding() {
        let data = vec![
            Point::new(1e308, 0.0),
            Point::new(1e308, 0.0),
            Point::new(-1e308, 0.0),
            Point::new(0.0, 1e308),
        ];
        for method in [
            InitMethod::Random,
            InitMethod::FarthestFirst,
            InitMethod::KMeansPlusPlus,
        ] {
            for seed in 0..10 {
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                let c = initialize_centroids(&data, 3, &method, &mut rng).unwrap();
                assert_eq!(c.len(), 3);
                assert!(c.iter().all(|p| data.contains(p)), "{method} seed {seed}");
            }
        }
    }

    #[test]
    fn test_weighted_draw_prefers_infinite_weights() {
        let weights = [1.0, f64::INFINITY, 5.0, f64::INFINITY];
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        for _ in 0..50 {
            let idx = weighted_draw(&weights, &mut rng);
            assert!(idx == 1 || idx == 3);
        }
        let zero = [0.0; 3];
        assert!(weighted_draw(&zero, &mut rng) < 3);
    }

    #[test]
    fn test_kmeans_plus_plus_identical_points() {
        let data = vec![Point::new(0.5, 0.5); 4];
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let c = initialize_centroids(&data, 3, &InitMethod::KMeansPlusPlus, &mut rng).unwrap();
        assert_eq!(c, vec![Point::new(0.5, 0.5); 3]);
    }

    #[test]
    fn test_manual() {
        let data = grid();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let wanted = vec![Point::new(0.2, 0.2), Point::new(0.8, 0.8)];
        let c = initialize_centroids(&data, 2, &InitMethod::Manual(wanted.clone()), &mut rng)
            .unwrap();
        assert_eq!(c, wanted);

        let wrong_count = InitMethod::Manual(vec![Point::new(0.0, 0.0)]);
        assert!(matches!(
            initialize_centroids(&data, 2, &wrong_count, &mut rng),
            Err(Error::InvalidConfig(_))
        ));

        let nan = InitMethod::Manual(vec![Point::new(f64::NAN, 0.0), Point::new(0.0, 0.0)]);
        assert!(matches!(
            initialize_centroids(&data, 2, &nan, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_k() {
        let data = vec![Point::new(1.0, 2.0), Point::new(2.0, 3.0)];
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(matches!(
            initialize_centroids(&data, 5, &InitMethod::Random, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            initialize_centroids(&data, 0, &InitMethod::Random, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_data() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(matches!(
            initialize_centroids(&[], 1, &InitMethod::Random, &mut rng),
            Err(Error::InvalidInput(_))
        ));
    }
}
