use crate::agent::{Agent, MoveOutcome};
use crate::direction::Direction;
use crate::lattice::{LatticeError, LatticeGraph, NodeId, Position};
use crate::pheromone::{PheromoneField, SensitivityCurve};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use trail_common::{AgentSample, AgentStatus, ParameterError, Snapshot, WorldParameters};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

/// What happened during one call to `SimulationWorld::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Timestep after the advance.
    pub timestep: u64,
    pub moved: usize,
    pub spawned: usize,
    /// Agents that walked off the lattice.
    pub left_lattice: usize,
    /// Agents standing on a node with no neighbors.
    pub stranded: usize,
}

impl StepReport {
    pub fn removed(&self) -> usize {
        self.left_lattice + self.stranded
    }
}

/// Population tally by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub following: usize,
    pub lost: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.following + self.lost
    }

    /// F/L ratio; zero when no agent is lost.
    pub fn following_ratio(&self) -> f64 {
        if self.lost == 0 {
            0.0
        } else {
            self.following as f64 / self.lost as f64
        }
    }
}

/// Agent as exposed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentView {
    pub id: u64,
    pub position: Position,
    pub status: AgentStatus,
    pub heading: Option<Direction>,
}

/// Owns the lattice, the pheromone field, the agents and the clock for one run.
///
/// All mutation goes through `advance`, `set_parameters`/`update_parameters` and `reset`, each
/// of which takes `&mut self`, so observers never see a half-finished step. Identical
/// parameters, seed and step count reproduce the same trajectory.
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    params: WorldParameters,
    lattice: LatticeGraph,
    field: PheromoneField,
    nest: NodeId,
    agents: Vec<Agent>,
    timestep: u64,
    rng: StdRng,
    seed: u64,
    next_agent_id: u64,
}

impl SimulationWorld {
    /// Validates the parameters and builds an empty world with the nest at the grid center.
    pub fn new(params: WorldParameters, seed: u64) -> Result<Self, WorldError> {
        params.validate()?;
        let lattice = LatticeGraph::from_params(&params);
        let field = PheromoneField::new(&lattice);
        let nest = lattice.center()?;
        debug!(
            "World created: {}x{} lattice, nest at {:?}, seed {}.",
            lattice.size(),
            lattice.size(),
            lattice.position_of(nest),
            seed
        );
        Ok(Self {
            params,
            lattice,
            field,
            nest,
            agents: Vec::new(),
            timestep: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
            next_agent_id: 0,
        })
    }

    /// Advances the world by one unit of time: evaporation, one move per existing agent,
    /// spawning at the nest, then the clock tick.
    pub fn advance(&mut self) -> StepReport {
        let mut report = StepReport::default();

        // --- 1. Evaporate before anyone moves ---
        self.field.evaporate_all(self.params.evaporation_amount());

        // --- 2. Move the agents alive at the start of the step ---
        let curve = SensitivityCurve::from_params(&self.params);
        let existing = std::mem::take(&mut self.agents);
        let spawn = self.params.spawn_per_step as usize;
        let mut survivors = Vec::with_capacity(existing.len() + spawn);
        for mut agent in existing {
            match agent.step(&self.lattice, &mut self.field, &self.params, &curve, &mut self.rng) {
                MoveOutcome::Moved { .. } => {
                    report.moved += 1;
                    survivors.push(agent);
                }
                MoveOutcome::OffLattice { direction } => {
                    trace!("Agent {} left the lattice heading {:?}.", agent.id(), direction);
                    report.left_lattice += 1;
                }
                MoveOutcome::Stranded => {
                    trace!(
                        "Agent {} stranded at {:?}.",
                        agent.id(),
                        self.lattice.position_of(agent.node())
                    );
                    report.stranded += 1;
                }
            }
        }

        // --- 3. Release new agents; they first move next step ---
        for _ in 0..self.params.spawn_per_step {
            survivors.push(Agent::spawn(self.next_agent_id, self.nest));
            self.next_agent_id += 1;
            report.spawned += 1;
        }
        self.agents = survivors;

        // --- 4. Tick ---
        self.timestep += 1;
        report.timestep = self.timestep;
        trace!(
            "Step {}: moved {}, spawned {}, left {}, stranded {}, population {}.",
            report.timestep,
            report.moved,
            report.spawned,
            report.left_lattice,
            report.stranded,
            self.agents.len()
        );
        report
    }

    /// Replaces the parameters between steps. On error the current parameters stay in force.
    ///
    /// A different `world_size` or lattice kind is stored but the lattice keeps its shape until
    /// the next `reset`.
    pub fn set_parameters(&mut self, params: WorldParameters) -> Result<(), ParameterError> {
        params.validate()?;
        if params.side_length() != self.lattice.size() || params.lattice != self.lattice.kind() {
            debug!(
                "Lattice change to {}x{} deferred until reset.",
                params.world_size, params.world_size
            );
        }
        debug!("Parameters updated at timestep {}: {:?}", self.timestep, params);
        self.params = params;
        Ok(())
    }

    /// Applies an in-place edit to a copy of the parameters and swaps it in if it validates.
    pub fn update_parameters<F>(&mut self, edit: F) -> Result<(), ParameterError>
    where
        F: FnOnce(&mut WorldParameters),
    {
        let mut next = self.params.clone();
        edit(&mut next);
        self.set_parameters(next)
    }

    /// Rebuilds lattice and field from the current parameters, removes all agents, rewinds the
    /// clock and reseeds the random source with the construction seed.
    pub fn reset(&mut self) -> Result<(), WorldError> {
        let lattice = LatticeGraph::from_params(&self.params);
        let nest = lattice.center()?;
        self.field = PheromoneField::new(&lattice);
        self.lattice = lattice;
        self.nest = nest;
        self.agents.clear();
        self.timestep = 0;
        self.next_agent_id = 0;
        self.rng = StdRng::seed_from_u64(self.seed);
        debug!("World reset to a {}x{} lattice.", self.lattice.size(), self.lattice.size());
        Ok(())
    }

    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.agents.iter().fold(StatusCounts::default(), |mut counts, agent| {
            match agent.status() {
                AgentStatus::Following => counts.following += 1,
                AgentStatus::Lost => counts.lost += 1,
            }
            counts
        })
    }

    pub fn pheromone_at(&self, position: Position) -> Result<u64, LatticeError> {
        Ok(self.field.quantity(self.lattice.node_at(position)?))
    }

    /// Dense pheromone array, `grid[row][col]`.
    pub fn pheromone_grid(&self) -> Vec<Vec<u64>> {
        self.field.as_grid(self.lattice.size())
    }

    pub fn total_pheromone(&self) -> u64 {
        self.field.total()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent_positions(&self) -> Vec<AgentView> {
        self.agents
            .iter()
            .map(|agent| AgentView {
                id: agent.id(),
                position: self.lattice.position_of(agent.node()),
                status: agent.status(),
                heading: agent.heading(),
            })
            .collect()
    }

    pub fn nest(&self) -> NodeId {
        self.nest
    }

    pub fn nest_position(&self) -> Position {
        self.lattice.position_of(self.nest)
    }

    pub fn params(&self) -> &WorldParameters {
        &self.params
    }

    pub fn lattice(&self) -> &LatticeGraph {
        &self.lattice
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Copies the observable state into a `Snapshot`.
    pub fn snapshot(&self) -> Snapshot {
        let counts = self.status_counts();
        Snapshot {
            timestep: self.timestep,
            world_size: self.lattice.size(),
            agent_count: self.agents.len(),
            following_count: counts.following,
            lost_count: counts.lost,
            pheromone: self.field.levels().to_vec(),
            agents: self
                .agent_positions()
                .into_iter()
                .map(|view| AgentSample {
                    row: view.position.row,
                    col: view.position.col,
                    status: view.status,
                })
                .collect(),
        }
    }
}
