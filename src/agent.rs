use crate::direction::Direction;
use crate::lattice::{reachable_from, LatticeGraph, NeighborMap, NodeId};
use crate::pheromone::{PheromoneField, SensitivityCurve};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use trail_common::{AgentStatus, BoundaryPolicy, TurningKernel, WorldParameters};

/// A trail-laying agent. Holds the id of the node it stands on, never the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub(crate) id: u64,
    pub(crate) node: NodeId,
    pub(crate) status: AgentStatus,
    pub(crate) heading: Option<Direction>,
}

/// Result of one movement decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: NodeId, to: NodeId, direction: Direction },
    /// The chosen heading had no neighbor; the agent left the lattice.
    OffLattice { direction: Direction },
    /// No heading leads anywhere.
    Stranded,
}

impl MoveOutcome {
    /// True when the agent must be removed from the world.
    pub fn is_removal(&self) -> bool {
        !matches!(self, MoveOutcome::Moved { .. })
    }
}

impl Agent {
    /// A fresh agent at the nest: lost, with no previous heading.
    pub fn spawn(id: u64, nest: NodeId) -> Self {
        Self {
            id,
            node: nest,
            status: AgentStatus::Lost,
            heading: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Runs one movement decision: pick a heading, move, deposit at the destination and draw
    /// the status for the next step. Nothing is deposited when the agent leaves the lattice.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        lattice: &LatticeGraph,
        field: &mut PheromoneField,
        params: &WorldParameters,
        curve: &SensitivityCurve,
        rng: &mut R,
    ) -> MoveOutcome {
        let origin = self.node;
        let neighbors = *lattice.neighbors_of(origin);
        if neighbors.iter().all(Option::is_none) {
            return MoveOutcome::Stranded;
        }

        let choice = match self.status {
            AgentStatus::Following => {
                choose_following(self.heading, &neighbors, &params.turning_kernel, rng)
                    .map(|(direction, node)| (direction, Some(node)))
            }
            AgentStatus::Lost => choose_lost(&neighbors, field, params.boundary, rng),
        };
        let Some((direction, destination)) = choice else {
            return MoveOutcome::Stranded;
        };
        let Some(destination) = destination else {
            return MoveOutcome::OffLattice { direction };
        };

        // Trail strength as found, before this agent's own contribution.
        let ambient = field.quantity(destination);
        self.node = destination;
        self.heading = Some(direction);
        field.deposit(destination, params.deposit_amount());
        self.status = next_status(curve, ambient, rng);

        MoveOutcome::Moved {
            from: origin,
            to: destination,
            direction,
        }
    }
}

/// Turning-kernel weights for a following agent over the reachable headings, normalized to
/// sum to one. Without a previous heading, or when the kernel gives every reachable heading
/// zero weight, all reachable headings are equally likely.
pub fn following_weights(
    heading: Option<Direction>,
    neighbors: &NeighborMap,
    kernel: &TurningKernel,
) -> Vec<(Direction, NodeId, f64)> {
    let reachable: Vec<(Direction, NodeId)> = reachable_from(neighbors).collect();
    let raw: Vec<f64> = match heading {
        Some(previous) => reachable
            .iter()
            .map(|(direction, _)| kernel.weight(previous.angular_difference(*direction)))
            .collect(),
        None => vec![1.0; reachable.len()],
    };
    normalize(reachable, raw)
}

/// Fork Algorithm weights for a lost agent: each reachable neighbor weighted by its own
/// pheromone quantity, normalized to sum to one. `None` when every reachable neighbor is bare.
pub fn fork_weights(
    neighbors: &NeighborMap,
    field: &PheromoneField,
) -> Option<Vec<(Direction, NodeId, f64)>> {
    let reachable: Vec<(Direction, NodeId)> = reachable_from(neighbors).collect();
    let raw: Vec<f64> = reachable
        .iter()
        .map(|(_, node)| field.quantity(*node) as f64)
        .collect();
    if raw.iter().all(|w| *w == 0.0) {
        return None;
    }
    Some(normalize(reachable, raw))
}

/// Heading for a following agent. `None` only when no heading is reachable.
pub fn choose_following<R: Rng + ?Sized>(
    heading: Option<Direction>,
    neighbors: &NeighborMap,
    kernel: &TurningKernel,
    rng: &mut R,
) -> Option<(Direction, NodeId)> {
    let weights = following_weights(heading, neighbors, kernel);
    let picked = weighted_draw(weights.iter().map(|(_, _, w)| *w), rng)?;
    weights.get(picked).map(|(direction, node, _)| (*direction, *node))
}

/// Heading for a lost agent. Draws by neighbor pheromone; with no pheromone around, falls back
/// to a uniform draw whose candidates depend on the boundary policy. A `None` node in the
/// result is an exit off the lattice.
pub fn choose_lost<R: Rng + ?Sized>(
    neighbors: &NeighborMap,
    field: &PheromoneField,
    boundary: BoundaryPolicy,
    rng: &mut R,
) -> Option<(Direction, Option<NodeId>)> {
    if let Some(weights) = fork_weights(neighbors, field) {
        let picked = weighted_draw(weights.iter().map(|(_, _, w)| *w), rng)?;
        return weights.get(picked).map(|(direction, node, _)| (*direction, Some(*node)));
    }

    let candidates: Vec<(Direction, Option<NodeId>)> = match boundary {
        BoundaryPolicy::Absorbing => Direction::ALL
            .into_iter()
            .map(|direction| (direction, neighbors[direction.index()]))
            .collect(),
        BoundaryPolicy::Confined => reachable_from(neighbors)
            .map(|(direction, node)| (direction, Some(node)))
            .collect(),
    };
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.random_range(0..candidates.len())).copied()
}

/// Status for the next step: following with probability φ(ambient).
pub fn next_status<R: Rng + ?Sized>(
    curve: &SensitivityCurve,
    ambient: u64,
    rng: &mut R,
) -> AgentStatus {
    let p: f64 = rng.random();
    if p < curve.sensitivity(ambient) {
        AgentStatus::Following
    } else {
        AgentStatus::Lost
    }
}

fn normalize(reachable: Vec<(Direction, NodeId)>, raw: Vec<f64>) -> Vec<(Direction, NodeId, f64)> {
    let total: f64 = raw.iter().sum();
    let count = reachable.len();
    reachable
        .into_iter()
        .zip(raw)
        .map(|((direction, node), w)| {
            let p = if total > 0.0 { w / total } else { 1.0 / count as f64 };
            (direction, node, p)
        })
        .collect()
}

fn weighted_draw<R: Rng + ?Sized>(
    weights: impl Iterator<Item = f64>,
    rng: &mut R,
) -> Option<usize> {
    WeightedIndex::new(weights).ok().map(|dist| dist.sample(rng))
}
