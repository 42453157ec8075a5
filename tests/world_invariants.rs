use trail_engine::{BoundaryPolicy, Position, SimulationConfig, SimulationWorld, WorldParameters};

fn run(params: WorldParameters, seed: u64, steps: u64) -> SimulationWorld {
    let mut world = SimulationWorld::new(params, seed).unwrap();
    for _ in 0..steps {
        world.advance();
    }
    world
}

#[test]
fn same_seed_same_history() {
    let params = WorldParameters {
        world_size: 16,
        ..WorldParameters::default_small()
    };
    let a = run(params.clone(), 42, 300);
    let b = run(params, 42, 300);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn different_seeds_diverge() {
    let params = WorldParameters {
        world_size: 32,
        ..WorldParameters::default_small()
    };
    let a = run(params.clone(), 1, 200);
    let b = run(params, 2, 200);
    assert_ne!(a.snapshot(), b.snapshot());
}

#[test]
fn pheromone_never_exceeds_what_was_deposited() {
    // With no evaporation every unit on the field came from one completed move.
    let params = WorldParameters {
        world_size: 12,
        evaporation_rate: 0,
        boundary: BoundaryPolicy::Confined,
        ..WorldParameters::default_small()
    };
    let mut world = SimulationWorld::new(params, 9).unwrap();
    let mut moves = 0u64;
    for _ in 0..150 {
        moves += world.advance().moved as u64;
        assert_eq!(world.total_pheromone(), moves * world.params().deposit_amount());
    }
}

#[test]
fn each_step_evaporates_then_deposits() {
    let params = WorldParameters {
        world_size: 10,
        evaporation_rate: 3,
        ..WorldParameters::default_small()
    };
    let mut world = SimulationWorld::new(params, 5).unwrap();
    for _ in 0..120 {
        let rate = world.params().evaporation_amount();
        let evaporated: u64 = world
            .pheromone_grid()
            .into_iter()
            .flatten()
            .map(|level| level.saturating_sub(rate))
            .sum();
        let report = world.advance();
        let deposited = report.moved as u64 * world.params().deposit_amount();
        assert_eq!(world.total_pheromone(), evaporated + deposited);
    }
}

#[test]
fn large_preset_runs_and_stays_consistent() {
    let mut world = SimulationWorld::new(WorldParameters::default_large(), 0).unwrap();
    assert_eq!(world.nest_position(), Position::new(128, 128));
    for _ in 0..400 {
        world.advance();
    }
    let snapshot = world.snapshot();
    assert_eq!(snapshot.agent_count, world.agent_count());
    assert_eq!(snapshot.following_count + snapshot.lost_count, snapshot.agent_count);
    assert_eq!(snapshot.pheromone.len(), 256 * 256);
    // Δφ = 0 and φ_low close to 1: nearly everyone follows.
    assert!(snapshot.following_count > snapshot.lost_count);
}

#[test]
fn invalid_update_between_steps_changes_nothing() {
    let mut world = run(WorldParameters::default_small(), 3, 10);
    let before_params = world.params().clone();
    let before_state = world.snapshot();

    assert!(world.update_parameters(|p| p.tau = -1).is_err());
    assert!(world.update_parameters(|p| p.world_size = -4).is_err());
    let flat_antenna = WorldParameters {
        saturation: 0.0,
        ..before_params.clone()
    };
    assert!(world.set_parameters(flat_antenna).is_err());

    assert_eq!(world.params(), &before_params);
    assert_eq!(world.snapshot(), before_state);
}

#[test]
fn tau_change_applies_to_the_next_deposit() {
    let params = WorldParameters {
        world_size: 9,
        evaporation_rate: 0,
        boundary: BoundaryPolicy::Confined,
        ..WorldParameters::default_small()
    };
    let mut world = SimulationWorld::new(params, 11).unwrap();
    world.advance();
    world.update_parameters(|p| p.tau = 7).unwrap();
    let report = world.advance();
    assert_eq!(report.moved, 1);
    assert_eq!(world.total_pheromone(), 7);
}

#[test]
fn config_file_drives_a_world() {
    let text = r#"
[world]
tau = 10
phi_low = 0.1
saturation = 50.0
delta_phi = 0.5
evaporation_rate = 0
world_size = 3
boundary = "confined"

[world.turning_kernel]
straight = 0.5
turn_45 = 0.1
turn_90 = 0.05
turn_135 = 0.05
reverse = 0.1

[run]
steps = 4
seed = 99
"#;
    let config = SimulationConfig::from_toml_str(text).unwrap();
    let world = run(config.world, config.run.seed, config.run.steps);
    assert_eq!(world.timestep(), 4);
    assert_eq!(world.agent_count(), 4);
    assert_eq!(world.total_pheromone(), 60);
}
