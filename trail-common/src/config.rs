use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::world_params::WorldParameters;
use std::path::Path;

// Configuration for the headless run loop
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_steps")]
    pub steps: u64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_report_interval_steps")]
    pub report_interval_steps: u64, // Progress line every N steps (0 = only at the end)
}

fn default_steps() -> u64 {
    1000
}

fn default_report_interval_steps() -> u64 {
    100
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            steps: default_steps(),
            seed: 0,
            report_interval_steps: default_report_interval_steps(),
        }
    }
}

// Which pieces of the final world state get written to disk
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshot: bool,
    #[serde(default)]
    pub save_pheromone_csv: bool,
    #[serde(default)]
    pub save_agents_csv: bool,
}

fn default_base_filename() -> String {
    "ant_trails".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            save_snapshot: true,
            save_pheromone_csv: false,
            save_agents_csv: false,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub world: WorldParameters,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
        })?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;

        config.world.validate()?;
        if config.output.base_filename.trim().is_empty() {
            anyhow::bail!("output.base_filename must not be empty.");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_params::BoundaryPolicy;
    use std::io::Write;

    const MINIMAL: &str = r#"
[world]
tau = 10
phi_low = 0.1
saturation = 50.0
delta_phi = 0.5
evaporation_rate = 0
world_size = 3

[world.turning_kernel]
straight = 0.5
turn_45 = 0.1
turn_90 = 0.05
turn_135 = 0.05
reverse = 0.1
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = SimulationConfig::from_toml_str(MINIMAL).expect("config should parse");
        assert_eq!(config.world.tau, 10);
        assert_eq!(config.world.world_size, 3);
        assert_eq!(config.world.spawn_per_step, 1);
        assert_eq!(config.world.boundary, BoundaryPolicy::Absorbing);
        assert_eq!(config.run, RunConfig::default());
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn parses_policies_and_sections() {
        let world = MINIMAL.replace(
            "world_size = 3",
            "world_size = 3\nboundary = \"confined\"\nspawn_per_step = 2",
        );
        let text = format!(
            "{}\n[run]\nsteps = 25\nseed = 7\n\n[output]\n{}",
            world, "base_filename = \"demo\"\nsave_agents_csv = true\n"
        );
        let config = SimulationConfig::from_toml_str(&text).expect("config should parse");
        assert_eq!(config.world.boundary, BoundaryPolicy::Confined);
        assert_eq!(config.world.spawn_per_step, 2);
        assert_eq!(config.run.steps, 25);
        assert_eq!(config.run.seed, 7);
        assert_eq!(config.run.report_interval_steps, 100);
        assert_eq!(config.output.base_filename, "demo");
        assert!(config.output.save_agents_csv);
        assert!(config.output.save_snapshot);
    }

    #[test]
    fn rejects_invalid_world_values() {
        let text = MINIMAL.replace("saturation = 50.0", "saturation = 0.0");
        let err = SimulationConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("saturation"), "unexpected error: {}", err);
    }

    #[test]
    fn rejects_missing_world_section() {
        assert!(SimulationConfig::from_toml_str("[run]\nsteps = 3\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MINIMAL.as_bytes()).expect("write config");
        let config = SimulationConfig::load(file.path()).expect("config should load");
        assert_eq!(config.world.saturation, 50.0);
    }

    #[test]
    fn missing_file_names_path() {
        let err = SimulationConfig::load("definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("definitely/not/here.toml"));
    }
}
