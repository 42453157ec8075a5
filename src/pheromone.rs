use crate::lattice::{LatticeGraph, NodeId};
use trail_common::WorldParameters;

/// Pheromone quantity per lattice node, in pu. Indexed by `NodeId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PheromoneField {
    levels: Vec<u64>,
}

impl PheromoneField {
    /// An all-zero field sized for `lattice`.
    pub fn new(lattice: &LatticeGraph) -> Self {
        Self {
            levels: vec![0; lattice.node_count()],
        }
    }

    #[inline(always)]
    pub fn quantity(&self, node: NodeId) -> u64 {
        self.levels[node.index()]
    }

    /// Adds `amount` pu at `node`. The stored quantity is not capped.
    pub fn deposit(&mut self, node: NodeId, amount: u64) {
        let level = &mut self.levels[node.index()];
        *level = level.saturating_add(amount);
    }

    /// Removes `rate` pu from every node, floored at zero.
    pub fn evaporate_all(&mut self, rate: u64) {
        if rate == 0 {
            return;
        }
        self.levels.iter_mut().for_each(|level| *level = level.saturating_sub(rate));
    }

    /// Sum over all nodes, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.levels.iter().fold(0u64, |acc, &level| acc.saturating_add(level))
    }

    /// Raw quantities in node order (row-major for square lattices).
    pub fn levels(&self) -> &[u64] {
        &self.levels
    }

    /// Dense `size × size` copy of the field, `grid[row][col]`.
    pub fn as_grid(&self, size: usize) -> Vec<Vec<u64>> {
        if size == 0 {
            return Vec::new();
        }
        self.levels.chunks(size).map(|row| row.to_vec()).collect()
    }
}

/// Saturating response φ(C) = φ_low + Δφ · C / (C + C_s): probability that an agent sensing
/// `C` pu keeps following a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityCurve {
    pub phi_low: f64,
    pub delta_phi: f64,
    pub saturation: f64,
}

impl SensitivityCurve {
    pub fn from_params(params: &WorldParameters) -> Self {
        Self {
            phi_low: params.phi_low,
            delta_phi: params.delta_phi,
            saturation: params.saturation,
        }
    }

    /// φ at `quantity` pu. Stays below `ceiling()` until the quantity is so large (around
    /// 2^53 × C_s) that `C / (C + C_s)` rounds to 1.0 in `f64`; from there it equals the ceiling.
    pub fn sensitivity(&self, quantity: u64) -> f64 {
        if quantity == 0 {
            return self.phi_low;
        }
        let c = quantity as f64;
        self.phi_low + self.delta_phi * c / (c + self.saturation)
    }

    /// Value approached as the quantity grows without bound.
    pub fn ceiling(&self) -> f64 {
        self.phi_low + self.delta_phi
    }
}
