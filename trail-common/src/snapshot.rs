use serde::{Deserialize, Serialize};

/// Behavioral state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Exploring without trail commitment.
    Lost,
    /// Tracking a trail, biased to keep its heading.
    Following,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Lost => "lost",
            AgentStatus::Following => "following",
        }
    }
}

/// One agent as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSample {
    pub row: usize,
    pub col: usize,
    pub status: AgentStatus,
}

/// Read-only view of the world between two steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed steps.
    pub timestep: u64,
    /// Lattice side length; `pheromone` holds `world_size * world_size` entries.
    pub world_size: usize,
    pub agent_count: usize,
    pub following_count: usize,
    pub lost_count: usize,
    /// Pheromone per node in row-major order (pu).
    pub pheromone: Vec<u64>,
    pub agents: Vec<AgentSample>,
}

impl Snapshot {
    /// Pheromone at `(row, col)`, or `None` outside the lattice.
    pub fn pheromone_at(&self, row: usize, col: usize) -> Option<u64> {
        if row >= self.world_size || col >= self.world_size {
            return None;
        }
        self.pheromone.get(row * self.world_size + col).copied()
    }

    /// Following/Lost ratio shown by metric readouts; zero when nobody is lost.
    pub fn following_ratio(&self) -> f64 {
        if self.lost_count == 0 {
            0.0
        } else {
            self.following_count as f64 / self.lost_count as f64
        }
    }

    pub fn total_pheromone(&self) -> u64 {
        self.pheromone.iter().fold(0u64, |acc, &level| acc.saturating_add(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            timestep: 3,
            world_size: 2,
            agent_count: 3,
            following_count: 1,
            lost_count: 2,
            pheromone: vec![0, 5, 7, 0],
            agents: vec![
                AgentSample {
                    row: 0,
                    col: 1,
                    status: AgentStatus::Following,
                },
                AgentSample {
                    row: 1,
                    col: 0,
                    status: AgentStatus::Lost,
                },
                AgentSample {
                    row: 1,
                    col: 1,
                    status: AgentStatus::Lost,
                },
            ],
        }
    }

    #[test]
    fn indexes_row_major() {
        let snapshot = sample();
        assert_eq!(snapshot.pheromone_at(0, 1), Some(5));
        assert_eq!(snapshot.pheromone_at(1, 0), Some(7));
        assert_eq!(snapshot.pheromone_at(2, 0), None);
        assert_eq!(snapshot.total_pheromone(), 12);
    }

    #[test]
    fn total_saturates_on_huge_levels() {
        let mut snapshot = sample();
        snapshot.pheromone = vec![u64::MAX, u64::MAX, 1, 0];
        assert_eq!(snapshot.total_pheromone(), u64::MAX);
    }

    #[test]
    fn ratio_handles_no_lost_agents() {
        let mut snapshot = sample();
        assert_eq!(snapshot.following_ratio(), 0.5);
        snapshot.lost_count = 0;
        assert_eq!(snapshot.following_ratio(), 0.0);
    }

    #[test]
    fn status_serializes_lowercase() {
        let sample = AgentSample {
            row: 0,
            col: 0,
            status: AgentStatus::Following,
        };
        let value = toml::Value::try_from(sample).expect("sample should serialize");
        assert_eq!(value.get("status").and_then(|s| s.as_str()), Some("following"));
        assert_eq!(AgentStatus::Lost.as_str(), "lost");
    }
}
