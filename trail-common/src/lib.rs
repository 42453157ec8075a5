pub mod config;
pub mod snapshot;
pub mod world_params;

// Re-export key types for easier use by dependent crates
pub use config::{OutputConfig, RunConfig, SimulationConfig};
pub use snapshot::{AgentSample, AgentStatus, Snapshot};
pub use world_params::{
    BoundaryPolicy, LatticeKind, ParameterError, TurningKernel, WorldParameters, MAX_SPAWN_PER_STEP,
    MAX_WORLD_SIZE,
};
