//! Lattice ant-trail engine: agents released from a nest walk an 8-neighbor grid, lay pheromone
//! and switch between following and lost behavior according to the scent they sense.

pub mod agent;
pub mod direction;
pub mod lattice;
pub mod output;
pub mod pheromone;
pub mod world;

pub use agent::{Agent, MoveOutcome};
pub use direction::Direction;
pub use lattice::{LatticeError, LatticeGraph, LatticeNode, NeighborMap, NodeId, Position};
pub use pheromone::{PheromoneField, SensitivityCurve};
pub use world::{AgentView, SimulationWorld, StatusCounts, StepReport, WorldError};

pub use trail_common::{
    AgentSample, AgentStatus, BoundaryPolicy, LatticeKind, OutputConfig, ParameterError, RunConfig,
    SimulationConfig, Snapshot, TurningKernel, WorldParameters,
};
