//! Integration tests for SOCIOGENESIS

use sociogenesis::analysis::ExportSystem;
use sociogenesis::cell::DeathCause;
use sociogenesis::ecology::{Catastrophe, CatastropheKind, Environment, Food, FoodKind, Season};
use sociogenesis::history::EventPayload;
use sociogenesis::stats::StatsHistory;
use sociogenesis::{Config, Driver, DriverConfig, EventKind, World};
use std::time::Duration;
use tempfile::tempdir;

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.environment.catastrophe_chance = 0.0;
    config
}

/// World with no initial cells or food; tests place what they need
fn empty_world(seed: u64) -> World {
    let mut config = quiet_config();
    config.world.initial_cells = 0;
    config.world.initial_food = 0;
    config.world.food_spawn_rate = 0.0;
    World::new_with_seed(config, seed)
}

#[test]
fn test_full_simulation_cycle() {
    let mut world = World::new_with_seed(Config::default(), 12345);

    world.run(500);

    assert_eq!(world.time, 500);
    let (width, height) = (world.config.world.width, world.config.world.height);
    for cell in &world.cells {
        assert!(cell.is_alive());
        assert!(cell.genome.is_valid());
        assert!(cell.social.is_valid());
        assert!(cell.x >= 0.0 && cell.x <= width);
        assert!(cell.y >= 0.0 && cell.y <= height);
    }
}

#[test]
fn test_initial_world_scarcity() {
    let world = World::new_with_seed(quiet_config(), 1);

    assert_eq!(world.population(), 30);
    assert_eq!(world.foods.len(), 50);
    assert_eq!(world.environment.season, Season::Spring);

    let scarcity = Environment::scarcity_for(Season::Spring, 30, world.config.environment.crowding_factor);
    assert!((scarcity - 0.91).abs() < 1e-5);
}

#[test]
fn test_neighbors_reproduce_in_world() {
    let mut world = empty_world(21);
    let a = world.spawn_cell(400.0, 300.0);
    let b = world.spawn_cell(410.0, 300.0);
    for id in [a, b] {
        let cell = world.cell_mut(id).unwrap();
        cell.energy = 100.0;
        cell.genome.adaptability = 0.5;
        cell.dx = 0.0;
        cell.dy = 0.0;
        cell.health.immunity = 1.0;
    }

    world.tick();

    assert_eq!(world.population(), 3);
    assert_eq!(world.stats.births, 1);
    assert_eq!(world.cell(a).unwrap().reproduction_cooldown, 60);
    assert_eq!(world.cell(b).unwrap().reproduction_cooldown, 60);

    let birth = world.history.last_of(EventKind::Birth).unwrap();
    let EventPayload::Birth { cell, parents, generation } = &birth.payload else {
        panic!("expected a birth event");
    };
    assert_eq!(*parents, (a, b));
    assert_eq!(*generation, 1);
    assert_eq!(world.cell(*cell).unwrap().energy, 80.0);
}

#[test]
fn test_wildfire_hits_cell_in_world() {
    let mut world = empty_world(5);
    let id = world.spawn_cell(500.0, 350.0);
    {
        let cell = world.cell_mut(id).unwrap();
        cell.genome.resilience = 0.5;
        cell.health.immunity = 1.0;
    }
    world.insert_catastrophe(Catastrophe::new(0, CatastropheKind::Wildfire, 500.0, 350.0, 0.8));

    world.tick();

    let cell = world.cell(id).unwrap();
    assert!((cell.health.injuries - 0.4).abs() < 1e-5);
    // 4.0 from the fire, at most 2.0 back from passive gain
    assert!(cell.energy < 148.0);
    assert_eq!(world.catastrophes[0].age, 1);
}

#[test]
fn test_cell_starved_by_metabolism_cannot_eat() {
    let mut world = empty_world(13);
    let id = world.spawn_cell(300.0, 300.0);
    {
        let cell = world.cell_mut(id).unwrap();
        cell.energy = 0.001;
        cell.dx = 0.0;
        cell.dy = 0.0;
        cell.health.immunity = 1.0;
    }
    let food = Food::new(0, 300.0, 300.0, FoodKind::Normal, &world.config.world);
    world.foods.push(food);

    world.tick();

    assert!(world.cell(id).is_none());
    assert_eq!(world.foods.len(), 1);
    assert_eq!(world.survival.by_cause.get(&DeathCause::Starvation), Some(&1));
    let death = world.history.last_of(EventKind::Death).unwrap();
    assert!(matches!(
        death.payload,
        EventPayload::Death { cell, cause: DeathCause::Starvation, .. } if cell == id
    ));
}

#[test]
fn test_malformed_cell_is_removed() {
    let mut world = World::new_with_seed(quiet_config(), 8);
    let victim = world.cells[0].id;
    world.cell_mut(victim).unwrap().energy = f32::NAN;

    world.tick();

    assert!(world.cell(victim).is_none());
    assert_eq!(world.survival.by_cause.get(&DeathCause::Malformed), Some(&1));
    let recorded = world.history.iter().any(|e| {
        matches!(
            e.payload,
            EventPayload::Death { cell, cause: DeathCause::Malformed, .. } if cell == victim
        )
    });
    assert!(recorded);
    assert!(world.stats.energy_mean.is_finite());
}

#[test]
fn test_population_cap_respected() {
    let mut config = quiet_config();
    config.world.width = 150.0;
    config.world.height = 150.0;
    config.world.initial_cells = 40;
    config.safety.max_population = 45;
    config.reproduction.cooldown = 1;

    let mut world = World::new_with_seed(config, 77);
    for _ in 0..300 {
        world.tick();
        assert!(world.population() <= 45);
    }
}

#[test]
fn test_reset_restores_initial_state() {
    let mut world = World::new_with_seed(quiet_config(), 99);
    world.run(250);
    world.reset();

    assert_eq!(world.time, 0);
    assert_eq!(world.population(), 30);
    assert_eq!(world.foods.len(), 50);
    assert!(world.history.is_empty());
    assert!(world.stats_history.snapshots.is_empty());
    assert!(world.insights.is_empty());

    world.run(10);
    assert_eq!(world.time, 10);
}

#[test]
fn test_analysis_records_insights() {
    let mut world = World::new_with_seed(quiet_config(), 31);
    world.run(300);

    assert_eq!(world.stats_history.snapshots.len(), 3);
    let analysis = world.history.last_of(EventKind::PopulationAnalysis).unwrap();
    let EventPayload::PopulationAnalysis { analysis, insights } = &analysis.payload else {
        panic!("expected a population analysis");
    };
    assert_eq!(analysis.population, world.stats.population);
    assert!(insights.len() <= 3);
    assert_eq!(insights.len(), world.insights.len());
}

#[test]
fn test_driver_runs_world() {
    let world = World::new_with_seed(Config::default(), 4);
    let config = DriverConfig {
        restart_delay: Duration::from_millis(1),
        max_restarts: 1,
    };
    let mut driver = Driver::new(world, config);
    let mut last_tick = 0;

    let report = driver.run_with(150, |snapshot| last_tick = snapshot.tick).unwrap();

    assert_eq!(report.ticks_run, 150);
    assert_eq!(last_tick, 150);
    assert_eq!(driver.world().time, 150);
}

#[test]
fn test_export_and_reload_stats() {
    let mut world = World::new_with_seed(quiet_config(), 64);
    world.run(200);

    let dir = tempdir().unwrap();
    let manifest = ExportSystem::export_full_state(&world, dir.path()).unwrap();

    let loaded = StatsHistory::load(&manifest.stats_file).unwrap();
    assert_eq!(loaded.snapshots.len(), world.stats_history.snapshots.len());
}

#[test]
fn test_config_roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.world.initial_cells = 12;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    let world = World::new_with_seed(loaded, 3);
    assert_eq!(world.population(), 12);
}
