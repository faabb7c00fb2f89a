pub mod complex;
pub mod config;
pub mod iteration_matrix;
pub mod messages;
pub mod newton_code;
pub mod params;
pub mod region;
pub mod transforms;

pub use complex::Complex;
pub use config::{
    config_for, FractalConfig, CUBE_ROOTS_OF_UNITY, DEFAULT_JULIA_C,
    DEFAULT_NEWTON_TOLERANCE, FRACTAL_CONFIGS,
};
pub use iteration_matrix::IterationMatrix;
pub use messages::{MainToWorker, TaskId, WorkerToMain};
pub use newton_code::newton_iteration_cap;
pub use params::{FractalKind, FractalParameters, ParameterError, ViewParameters};
pub use region::{RenderRegion, Resolution};
pub use transforms::PlaneMapping;
