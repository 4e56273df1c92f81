pub mod error;
pub mod ml;

pub use error::{Error, Result};
pub use ml::classic::k_means::{
    EngineState, InitMethod, KMeansConfig, KMeansEngine, Point, StepResult,
};
