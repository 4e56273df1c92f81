//! Step-at-a-time k-means clustering.
//!
//! The [`KMeansEngine`] owns a 2-D dataset, its centroids and the current
//! cluster assignment across a sequence of discrete calls, so a caller can
//! observe the algorithm one iteration at a time:
//!
//! ```
//! use kmeans_stepper::{KMeansConfig, KMeansEngine, Point};
//!
//! let mut engine = KMeansEngine::new(KMeansConfig::new(2).with_seed(7));
//! engine
//!     .set_data(vec![
//!         Point::new(0.0, 0.0),
//!         Point::new(0.1, 0.0),
//!         Point::new(5.0, 5.0),
//!         Point::new(5.1, 5.0),
//!     ])
//!     .unwrap();
//!
//! let mut result = engine.step("kmeans++").unwrap();
//! while !result.converged {
//!     result = engine.step("kmeans++").unwrap();
//! }
//! assert_eq!(result.centroids.len(), 2);
//! ```
//!
//! The building blocks are usable on their own: [`geometry`] holds the point
//! type and distance helpers, [`init`] the centroid seeding strategies,
//! [`iteration`] a single assign + update pass and [`convergence`] the
//! stopping test.

pub mod convergence;
pub mod engine;
pub mod geometry;
pub mod init;
pub mod iteration;

pub use convergence::has_converged;
pub use engine::{EngineState, KMeansEngine, StepResult};
pub use geometry::{distance_sq, mean, Point};
pub use init::{initialize_centroids, InitMethod};
pub use iteration::{iterate, Iteration};

/// Configuration options for k-means clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Maximum number of iterations `run_to_convergence` performs.
    pub max_iterations: usize,
    /// Convergence tolerance. If the movement of all centroids is at or below
    /// this, the run is considered converged.
    pub tolerance: f64,
    /// Seed for the randomized initialization strategies. `None` seeds from
    /// the operating system.
    pub seed: Option<u64>,
}

impl KMeansConfig {
    /// Create a new config with default values for max_iterations (100) and
    /// tolerance (1e-9), seeded from entropy.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 100,
            tolerance: 1e-9,
            seed: None,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Customize the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fix the seed so initialization is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self::new(3)
    }
}
