use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest lattice side length accepted by validation.
pub const MAX_WORLD_SIZE: i64 = 4096;

/// Most agents the nest may release in a single step.
pub const MAX_SPAWN_PER_STEP: u32 = 1024;

/// Tolerance used when checking that the turning kernel sums to one over the compass.
const KERNEL_SUM_TOLERANCE: f64 = 1e-6;

/// Raised when a parameter bundle fails validation. The world keeps its previous configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

impl ParameterError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ParameterError::InvalidParameter { field, .. } => field,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ParameterError {
    ParameterError::InvalidParameter {
        field,
        reason: reason.into(),
    }
}

/// Turning kernel B: probability weight of a heading change, keyed by the magnitude of the
/// angular difference between the previous heading and the candidate heading.
///
/// Only the magnitude matters, so a 45° turn to the left and to the right share `turn_45`.
/// Over a full compass the eight candidates use `straight` once, `reverse` once and every other
/// entry twice.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TurningKernel {
    pub straight: f64,
    pub turn_45: f64,
    pub turn_90: f64,
    pub turn_135: f64,
    pub reverse: f64,
}

impl TurningKernel {
    /// Weight for an angular difference in degrees. Differences other than the five compass
    /// magnitudes carry no weight.
    pub fn weight(&self, difference_deg: u16) -> f64 {
        match difference_deg {
            0 => self.straight,
            45 => self.turn_45,
            90 => self.turn_90,
            135 => self.turn_135,
            180 => self.reverse,
            _ => 0.0,
        }
    }

    /// Sum of the weights of all eight outgoing headings on an unobstructed node.
    pub fn total_over_compass(&self) -> f64 {
        self.straight + 2.0 * (self.turn_45 + self.turn_90 + self.turn_135) + self.reverse
    }

    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("turning_kernel.straight", self.straight),
            ("turning_kernel.turn_45", self.turn_45),
            ("turning_kernel.turn_90", self.turn_90),
            ("turning_kernel.turn_135", self.turn_135),
            ("turning_kernel.reverse", self.reverse),
        ]
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        for (field, value) in self.entries() {
            if !value.is_finite() {
                return Err(invalid(field, format!("weight must be finite, got {}", value)));
            }
            if value < 0.0 {
                return Err(invalid(field, format!("weight must be non-negative, got {}", value)));
            }
        }
        if self.entries().iter().all(|(_, value)| *value == 0.0) {
            return Err(invalid(
                "turning_kernel",
                "all weights are zero, following agents could never move",
            ));
        }
        Ok(())
    }
}

/// What happens to a lost agent whose uniform fallback draw points off the lattice.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Off-lattice headings take part in the uniform draw; choosing one removes the agent.
    #[default]
    Absorbing,
    /// Only headings with a neighbor take part; agents never leave the lattice.
    Confined,
}

/// Lattice-generation policy.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LatticeKind {
    /// N×N grid with king-move adjacency.
    #[default]
    Square,
}

/// Biological and world parameters for one run. Values are read once per step and may be
/// replaced between steps.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WorldParameters {
    /// Deposition rate τ (pu per agent per step).
    pub tau: i64,
    pub turning_kernel: TurningKernel,
    /// Minimum probability φ_low of following a trail.
    pub phi_low: f64,
    /// Antenna saturation constant C_s (pu).
    pub saturation: f64,
    /// Rise Δφ of the following probability at saturation.
    pub delta_phi: f64,
    /// Pheromone removed from every node each step (pu).
    #[serde(default = "default_evaporation_rate")]
    pub evaporation_rate: i64,
    /// Lattice side length N.
    #[serde(default = "default_world_size")]
    pub world_size: i64,
    /// Agents released from the nest each step.
    #[serde(default = "default_spawn_per_step")]
    pub spawn_per_step: u32,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    #[serde(default)]
    pub lattice: LatticeKind,
}

fn default_evaporation_rate() -> i64 {
    1
}

fn default_world_size() -> i64 {
    256
}

fn default_spawn_per_step() -> u32 {
    1
}

impl Default for WorldParameters {
    fn default() -> Self {
        Self::default_large()
    }
}

impl WorldParameters {
    /// A 4×4 world with strong trail response. Mostly useful for tests.
    pub fn default_small() -> Self {
        Self {
            tau: 4,
            turning_kernel: TurningKernel {
                straight: 0.44,
                turn_45: 0.1,
                turn_90: 0.08,
                turn_135: 0.05,
                reverse: 0.1,
            },
            phi_low: 0.1,
            saturation: 16.0,
            delta_phi: 0.8,
            evaporation_rate: 1,
            world_size: 4,
            spawn_per_step: 1,
            boundary: BoundaryPolicy::Absorbing,
            lattice: LatticeKind::Square,
        }
    }

    /// The published parameter set on a 256×256 lattice.
    pub fn default_large() -> Self {
        Self {
            tau: 8,
            turning_kernel: TurningKernel {
                straight: 0.581,
                turn_45: 0.36 / 2.0,
                turn_90: 0.047 / 2.0,
                turn_135: 0.004,
                reverse: 0.004,
            },
            phi_low: 251.0 / 256.0,
            saturation: 16.0,
            delta_phi: 0.0,
            evaporation_rate: 1,
            world_size: 256,
            spawn_per_step: 1,
            boundary: BoundaryPolicy::Absorbing,
            lattice: LatticeKind::Square,
        }
    }

    /// Checks every field. The first offending field is reported.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.tau < 0 {
            return Err(invalid(
                "tau",
                format!("deposition rate must be non-negative, got {}", self.tau),
            ));
        }
        if self.evaporation_rate < 0 {
            return Err(invalid(
                "evaporation_rate",
                format!("evaporation rate must be non-negative, got {}", self.evaporation_rate),
            ));
        }
        if !self.saturation.is_finite() || self.saturation <= 0.0 {
            return Err(invalid(
                "saturation",
                format!("saturation constant must be positive, got {}", self.saturation),
            ));
        }
        if self.world_size <= 0 {
            return Err(invalid(
                "world_size",
                format!("lattice size must be positive, got {}", self.world_size),
            ));
        }
        if self.world_size > MAX_WORLD_SIZE {
            return Err(invalid(
                "world_size",
                format!(
                    "lattice size {} exceeds the maximum of {}",
                    self.world_size, MAX_WORLD_SIZE
                ),
            ));
        }
        if self.spawn_per_step > MAX_SPAWN_PER_STEP {
            return Err(invalid(
                "spawn_per_step",
                format!(
                    "spawn rate {} exceeds the maximum of {}",
                    self.spawn_per_step, MAX_SPAWN_PER_STEP
                ),
            ));
        }
        if !self.phi_low.is_finite() || !(0.0..=1.0).contains(&self.phi_low) {
            return Err(invalid("phi_low", format!("must lie in [0, 1], got {}", self.phi_low)));
        }
        if !self.delta_phi.is_finite() || self.delta_phi < 0.0 {
            return Err(invalid(
                "delta_phi",
                format!("must be non-negative, got {}", self.delta_phi),
            ));
        }
        let ceiling = self.phi_low + self.delta_phi;
        if ceiling > 1.0 {
            return Err(invalid(
                "delta_phi",
                format!("phi_low + delta_phi must not exceed 1, got {}", ceiling),
            ));
        }
        self.turning_kernel.validate()?;

        let total = self.turning_kernel.total_over_compass();
        if (total - 1.0).abs() > KERNEL_SUM_TOLERANCE {
            warn!(
                "Turning kernel sums to {:.6} over the compass; weights are renormalized per draw.",
                total
            );
        }
        Ok(())
    }

    /// Validated deposition amount in pu.
    pub fn deposit_amount(&self) -> u64 {
        u64::try_from(self.tau).unwrap_or(0)
    }

    /// Validated evaporation amount in pu.
    pub fn evaporation_amount(&self) -> u64 {
        u64::try_from(self.evaporation_rate).unwrap_or(0)
    }

    /// Validated lattice side length.
    pub fn side_length(&self) -> usize {
        usize::try_from(self.world_size).unwrap_or(0)
    }
}
