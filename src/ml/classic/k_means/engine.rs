//! The stateful k-means engine driven one step at a time.
//!
//! A session owns one [`KMeansEngine`]. The caller sets a dataset, then calls
//! [`KMeansEngine::step`] repeatedly (or [`KMeansEngine::run_to_convergence`]
//! once) and renders whatever [`StepResult`] comes back.
//!
//! # States
//!
//! ```text
//!                set_data                 step                 converged
//! Uninitialized ─────────▶ Initialized ─────────▶ Stepping ─────────────▶ Converged
//!       ▲                                          │    ▲                    │
//!       │                                          └────┘ step               │ step (no-op)
//!       └───────────────────────── reset (from any state) ◀──────────────────┘
//! ```
//!
//! The first `step` of a run seeds the centroids with the requested
//! initialization method and performs one iteration. Later steps of the same
//! run ignore the method; it is only re-applied after `set_data` or `reset`.

use super::convergence::has_converged;
use super::geometry::Point;
use super::init::{initialize_centroids, InitMethod};
use super::iteration::iterate;
use super::KMeansConfig;
use crate::error::{Error, Result};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No data.
    Uninitialized,
    /// Data set, no centroids yet.
    Initialized,
    /// At least one step taken, not yet converged.
    Stepping,
    /// The last step changed nothing; further steps are no-ops.
    Converged,
}

/// What a `step` or `run_to_convergence` call reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Current centroids; always exactly `k` of them.
    pub centroids: Vec<Point>,
    /// Cluster label of each data point, aligned by position with the data.
    pub clusters: Vec<usize>,
    /// True once a step changed nothing; later steps return this same result.
    pub converged: bool,
    /// Number of iterations performed since the data was set.
    pub iteration: usize,
}

/// A k-means session.
///
/// Holds no shared state; run one instance per session.
#[derive(Debug, Clone)]
pub struct KMeansEngine {
    config: KMeansConfig,
    rng: ChaCha20Rng,
    state: EngineState,
    data: Vec<Point>,
    centroids: Vec<Point>,
    assignment: Vec<usize>,
    init_method: Option<InitMethod>,
    iterations: usize,
}

impl KMeansEngine {
    pub fn new(config: KMeansConfig) -> Self {
        let rng = seeded_rng(&config);
        Self {
            config,
            rng,
            state: EngineState::Uninitialized,
            data: Vec::new(),
            centroids: Vec::new(),
            assignment: Vec::new(),
            init_method: None,
            iterations: 0,
        }
    }

    /// Engine with `k` clusters and default settings otherwise.
    pub fn with_k(k: usize) -> Self {
        Self::new(KMeansConfig::new(k))
    }

    /// Replace the dataset, discarding any centroids and progress.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `points` is empty or holds a non-finite coordinate.
    /// The engine is left untouched in that case.
    pub fn set_data(&mut self, points: Vec<Point>) -> Result<()> {
        if points.is_empty() {
            return Err(Error::invalid_input("dataset must contain at least one point"));
        }
        if let Some(idx) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::invalid_input(format!(
                "point {idx} has a non-finite coordinate"
            )));
        }

        info!("dataset set with {} points", points.len());
        self.clear_run();
        self.data = points;
        self.state = EngineState::Initialized;
        Ok(())
    }

    /// Perform one step, seeding the centroids with `init_method` if this is
    /// the first step of the run.
    ///
    /// The method name is validated on every call, even when it will be
    /// ignored.
    pub fn step(&mut self, init_method: &str) -> Result<StepResult> {
        let method: InitMethod = init_method.parse()?;
        self.step_with(method)
    }

    /// Typed form of [`step`](Self::step).
    ///
    /// # Errors
    ///
    /// - `NotReady` if no data has been set.
    /// - `InvalidConfig` if the centroids need seeding and `k` does not fit
    ///   the dataset, or manual centroids are malformed.
    pub fn step_with(&mut self, init_method: InitMethod) -> Result<StepResult> {
        match self.state {
            EngineState::Uninitialized => return Err(Error::NotReady),
            EngineState::Converged => {
                debug!("step requested after convergence; reporting current state");
                return Ok(self.current_result());
            }
            EngineState::Initialized | EngineState::Stepping => {}
        }

        if self.centroids.is_empty() {
            self.seed_centroids(init_method)?;
        } else if self.init_method.as_ref() != Some(&init_method) {
            debug!(
                "ignoring initialization method '{}' mid-run; centroids were seeded with '{}'",
                init_method,
                self.init_method.as_ref().map_or("?", InitMethod::name)
            );
        }

        Ok(self.advance())
    }

    /// Step until converged or `max_iterations` steps have been taken in
    /// this call, returning only the final state.
    ///
    /// Hitting the cap is not an error: the result reports
    /// `converged == false` and a later call continues from there. At least
    /// one step is always taken unless the engine has already converged.
    pub fn run_to_convergence(&mut self, init_method: &str) -> Result<StepResult> {
        let method: InitMethod = init_method.parse()?;
        self.run_to_convergence_with(method)
    }

    /// Typed form of [`run_to_convergence`](Self::run_to_convergence).
    pub fn run_to_convergence_with(&mut self, init_method: InitMethod) -> Result<StepResult> {
        let mut result = self.step_with(init_method)?;
        let mut steps = 1;
        while !result.converged && steps < self.config.max_iterations {
            result = self.advance();
            steps += 1;
        }

        if !result.converged {
            warn!(
                "k-means did not converge within {} iterations",
                self.config.max_iterations
            );
        }
        Ok(result)
    }

    /// Drop the dataset and all progress.
    pub fn reset(&mut self) {
        debug!("engine reset");
        self.clear_run();
        self.data.clear();
        self.state = EngineState::Uninitialized;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn data(&self) -> &[Point] {
        &self.data
    }

    /// Current centroids, empty until the first step.
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// Labels from the most recent step, empty until the first step.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Method the current centroids were seeded with.
    pub fn init_method(&self) -> Option<&InitMethod> {
        self.init_method.as_ref()
    }

    /// The last reported result, if any step has been taken.
    pub fn snapshot(&self) -> Option<StepResult> {
        if self.centroids.is_empty() {
            None
        } else {
            Some(self.current_result())
        }
    }

    fn seed_centroids(&mut self, init_method: InitMethod) -> Result<()> {
        let centroids =
            initialize_centroids(&self.data, self.config.k, &init_method, &mut self.rng)?;
        info!(
            "initialized {} centroids with '{}'",
            centroids.len(),
            init_method
        );
        self.centroids = centroids;
        self.init_method = Some(init_method);
        Ok(())
    }

    /// One assign + update pass over the current centroids.
    fn advance(&mut self) -> StepResult {
        let it = iterate(&self.data, &self.centroids);
        let previous = if self.assignment.is_empty() {
            None
        } else {
            Some(self.assignment.as_slice())
        };
        let converged = has_converged(
            &self.centroids,
            &it.centroids,
            previous,
            &it.assignment,
            self.config.tolerance,
        );

        self.iterations += 1;
        debug!(
            "iteration {}: inertia = {:.6}, cluster sizes = {:?}",
            self.iterations, it.inertia, it.cluster_sizes
        );

        self.centroids = it.centroids;
        self.assignment = it.assignment;
        if converged {
            info!("converged after {} iterations", self.iterations);
            self.state = EngineState::Converged;
        } else {
            self.state = EngineState::Stepping;
        }
        self.current_result()
    }

    fn current_result(&self) -> StepResult {
        StepResult {
            centroids: self.centroids.clone(),
            clusters: self.assignment.clone(),
            converged: self.state == EngineState::Converged,
            iteration: self.iterations,
        }
    }

    fn clear_run(&mut self) {
        self.centroids.clear();
        self.assignment.clear();
        self.init_method = None;
        self.iterations = 0;
        self.rng = seeded_rng(&self.config);
    }
}

impl Default for KMeansEngine {
    fn default() -> Self {
        Self::new(KMeansConfig::default())
    }
}

/// Fixed seed when configured, so a session replays identically after
/// `set_data` or `reset`.
fn seeded_rng(config: &KMeansConfig) -> ChaCha20Rng {
    match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}
