use crate::direction::Direction;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trail_common::{LatticeKind, WorldParameters};

/// Grid coordinate of a node. Row 0 is the northern edge, column 0 the western edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Index of a node in its lattice's arena. Only meaningful for the lattice that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outgoing neighbor per heading, indexed by `Direction::index`. `None` marks an edge an agent
/// can leave through but never arrive from.
pub type NeighborMap = [Option<NodeId>; 8];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    #[error("position ({row}, {col}) is outside the {size}x{size} lattice")]
    OutOfBounds { row: usize, col: usize, size: usize },
}

#[derive(Debug, Clone)]
pub struct LatticeNode {
    position: Position,
    neighbors: NeighborMap,
}

impl LatticeNode {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn neighbor(&self, direction: Direction) -> Option<NodeId> {
        self.neighbors[direction.index()]
    }

    pub fn neighbors(&self) -> &NeighborMap {
        &self.neighbors
    }
}

/// Arena of lattice nodes with per-direction adjacency.
#[derive(Debug, Clone)]
pub struct LatticeGraph {
    kind: LatticeKind,
    size: usize,
    nodes: Vec<LatticeNode>,
}

// Row-major index for a position already known to be inside the grid
#[inline(always)]
fn get_node_idx(row: usize, col: usize, size: usize) -> usize {
    row * size + col
}

// Position one step away in `direction`, or None when it falls outside [0, size)
#[inline(always)]
fn step_from(position: Position, direction: Direction, size: usize) -> Option<Position> {
    let (dr, dc) = direction.offset();
    let row = position.row.checked_add_signed(dr)?;
    let col = position.col.checked_add_signed(dc)?;
    if row < size && col < size {
        Some(Position { row, col })
    } else {
        None
    }
}

/// Present entries of a neighbor map, in clockwise order from North.
pub fn reachable_from(neighbors: &NeighborMap) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| neighbors[direction.index()].map(|node| (direction, node)))
}

impl LatticeGraph {
    /// Builds the lattice described by the parameters. Parameters are assumed validated.
    pub fn from_params(params: &WorldParameters) -> Self {
        Self::build(params.lattice, params.side_length())
    }

    pub fn build(kind: LatticeKind, size: usize) -> Self {
        match kind {
            LatticeKind::Square => Self::square(size),
        }
    }

    /// N×N grid with king-move adjacency. Lookups that fall off the grid resolve to absent.
    pub fn square(size: usize) -> Self {
        let mut nodes = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let position = Position { row, col };
                let mut neighbors: NeighborMap = [None; 8];
                for direction in Direction::ALL {
                    neighbors[direction.index()] = step_from(position, direction, size)
                        .map(|p| NodeId(get_node_idx(p.row, p.col, size)));
                }
                nodes.push(LatticeNode { position, neighbors });
            }
        }
        debug!("Built {}x{} square lattice ({} nodes).", size, size, nodes.len());
        Self {
            kind: LatticeKind::Square,
            size,
            nodes,
        }
    }

    pub fn kind(&self) -> LatticeKind {
        self.kind
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_at(&self, position: Position) -> Result<NodeId, LatticeError> {
        if position.row >= self.size || position.col >= self.size {
            return Err(LatticeError::OutOfBounds {
                row: position.row,
                col: position.col,
                size: self.size,
            });
        }
        Ok(NodeId(get_node_idx(position.row, position.col, self.size)))
    }

    /// Node data for an id issued by this lattice.
    pub fn node(&self, id: NodeId) -> &LatticeNode {
        &self.nodes[id.0]
    }

    pub fn position_of(&self, id: NodeId) -> Position {
        self.node(id).position
    }

    pub fn neighbors_of(&self, id: NodeId) -> &NeighborMap {
        &self.node(id).neighbors
    }

    pub fn neighbor(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.node(id).neighbor(direction)
    }

    /// Headings from `id` that lead to a node, in clockwise order from North.
    pub fn reachable(&self, id: NodeId) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
        reachable_from(self.neighbors_of(id))
    }

    /// Every node id in row-major order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Node at the grid center `(N/2, N/2)`, used as the nest.
    pub fn center(&self) -> Result<NodeId, LatticeError> {
        self.node_at(Position::new(self.size / 2, self.size / 2))
    }
}
