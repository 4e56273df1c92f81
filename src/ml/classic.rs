pub mod k_means;

// Re-export public types and functions
pub use k_means::{
    EngineState, InitMethod, KMeansConfig, KMeansEngine, Point, StepResult,
};
