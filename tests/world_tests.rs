use accretion_engine::{
    World, Body, SimulationConfig, ConfigUpdate, Stepper, Vector3, MergeRadiusPolicy,
    bodies::BodyFlags,
    core::{Bounds, FixedClock, Clock, MetricValue, Statistics, SystemClock},
    core::statistics::{REMAINING_PARTICLES, SYSTEM_AVERAGE_SPEED},
    core::stepper::DEFAULT_MAX_TIME_STEP,
    error::PhysicsError,
};
use approx::assert_relative_eq;
use std::thread;

fn small_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        global_radius: 200.0,
        initial_distance_from_origin: 20.0,
        particle_count: 60,
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

fn assert_invalid_configuration(config: SimulationConfig) {
    match config.validate() {
        Err(PhysicsError::InvalidConfiguration(_)) => {}
        other => panic!("expected an invalid configuration error, got {:?}", other),
    }
}

#[test]
fn test_default_config_matches_reference_values() {
    let config = SimulationConfig::default();

    assert_eq!(config.gravitational_constant, -1.0);
    assert_eq!(config.global_radius, 1000.0);
    assert_eq!(config.initial_distance_from_origin, 100.0);
    assert_eq!(config.initial_speed_bound, 0.0);
    assert_eq!(config.particle_count, 1000);
    assert_eq!(config.mass_bounds, Bounds::new(10.0, 500.0));
    assert_eq!(config.density_bounds, Bounds::new(1.0, 22.5));
    assert!(config.enlarge_radius_after_bonding);
    assert_eq!(config.merge_radius_policy(), MergeRadiusPolicy::VolumeConserving);
    assert!(config.validate().is_ok());
}

#[test]
fn test_merge_radius_policy_follows_flag() {
    let config = SimulationConfig {
        enlarge_radius_after_bonding: false,
        ..SimulationConfig::default()
    };
    assert_eq!(config.merge_radius_policy(), MergeRadiusPolicy::Approximate);
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let base = SimulationConfig::default();

    assert_invalid_configuration(SimulationConfig { particle_count: 0, ..base.clone() });
    assert_invalid_configuration(SimulationConfig { global_radius: 0.0, ..base.clone() });
    assert_invalid_configuration(SimulationConfig { global_radius: -5.0, ..base.clone() });
    assert_invalid_configuration(SimulationConfig { mass_bounds: Bounds::new(0.0, 10.0), ..base.clone() });
    assert_invalid_configuration(SimulationConfig { mass_bounds: Bounds::new(20.0, 10.0), ..base.clone() });
    assert_invalid_configuration(SimulationConfig { density_bounds: Bounds::new(-1.0, 1.0), ..base.clone() });
    assert_invalid_configuration(SimulationConfig { initial_speed_bound: -1.0, ..base.clone() });
    assert_invalid_configuration(SimulationConfig { initial_distance_from_origin: -1.0, ..base.clone() });
    assert_invalid_configuration(SimulationConfig { gravitational_constant: f64::NAN, ..base.clone() });

    assert!(World::new(SimulationConfig { particle_count: 0, ..base }).is_err());
}

#[test]
fn test_initial_distance_is_clamped_inside_global_radius() {
    let config = SimulationConfig {
        global_radius: 50.0,
        initial_distance_from_origin: 80.0,
        ..SimulationConfig::default()
    };

    let normalized = config.validate().unwrap();
    assert_relative_eq!(normalized.initial_distance_from_origin, 49.5);

    // Equal to the radius is clamped too
    let config = SimulationConfig {
        global_radius: 50.0,
        initial_distance_from_origin: 50.0,
        ..SimulationConfig::default()
    };
    assert_relative_eq!(config.validate().unwrap().initial_distance_from_origin, 49.5);
}

#[test]
fn test_config_update_keeps_omitted_fields() {
    let base = small_config(1);
    let update = ConfigUpdate {
        gravitational_constant: Some(-3.0),
        particle_count: Some(5),
        ..ConfigUpdate::new()
    };

    let merged = update.apply_to(&base);
    assert_eq!(merged.gravitational_constant, -3.0);
    assert_eq!(merged.particle_count, 5);
    assert_eq!(merged.global_radius, base.global_radius);
    assert_eq!(merged.mass_bounds, base.mass_bounds);
    assert_eq!(merged.enlarge_radius_after_bonding, base.enlarge_radius_after_bonding);
    assert_eq!(merged.seed, base.seed);

    assert!(ConfigUpdate::new().is_empty());
    assert!(!update.is_empty());
    assert_eq!(ConfigUpdate::new().apply_to(&base), base);
}

#[test]
fn test_config_update_percent_helpers() {
    let update = ConfigUpdate::new()
        .initial_distance_percent(25.0, 1000.0)
        .mass_range_percent(400.0, 10.0);

    assert_eq!(update.initial_distance_from_origin, Some(250.0));
    assert_eq!(update.mass_bounds, Some(Bounds::new(40.0, 400.0)));
}

#[test]
fn test_new_world_seeds_population() {
    let config = small_config(3);
    let world = World::new(config.clone()).unwrap();

    assert_eq!(world.body_count(), 60);
    assert_eq!(world.statistics().remaining_particles, 60);
    // Seeded at rest
    assert_eq!(world.statistics().system_average_speed, Some(0.0));

    for (_, body) in world.bodies() {
        assert!(body.get_flags().contains(BodyFlags::SEEDED));
        assert!(config.mass_bounds.contains(body.get_mass()));

        let distance = body.get_position().length();
        assert!(distance >= config.initial_distance_from_origin);
        assert!(distance <= config.global_radius);

        // Radius must correspond to a density inside the configured bounds
        let density = body.get_mass() / body.volume();
        assert!(density >= config.density_bounds.min * (1.0 - 1e-9));
        assert!(density <= config.density_bounds.max * (1.0 + 1e-9));
    }
}

#[test]
fn test_tiny_global_radius_keeps_bodies_inside() {
    // The clamp leaves a shell only 0.0005 wide
    let config = SimulationConfig {
        global_radius: 0.05,
        particle_count: 200,
        seed: Some(1),
        ..SimulationConfig::default()
    };
    let world = World::new(config).unwrap();
    let inner = world.get_config().initial_distance_from_origin;
    assert_relative_eq!(inner, 0.0495);

    for (_, body) in world.bodies() {
        let distance = body.get_position().length();
        assert!(distance >= inner, "{} is inside the initial distance", distance);
        assert!(distance <= 0.05, "{} is outside the global radius", distance);
    }

    // Narrower than the seeding margin itself
    let config = SimulationConfig {
        global_radius: 0.0001,
        initial_distance_from_origin: 0.0,
        particle_count: 50,
        seed: Some(2),
        ..SimulationConfig::default()
    };
    let world = World::new(config).unwrap();
    for (_, body) in world.bodies() {
        let distance = body.get_position().length();
        assert!(distance > 0.0 && distance <= 0.0001);
    }
}

#[test]
fn test_initial_speed_bound_limits_each_axis() {
    let config = SimulationConfig {
        initial_speed_bound: 3.0,
        ..small_config(11)
    };
    let world = World::new(config).unwrap();

    let mut any_moving = false;
    for (_, body) in world.bodies() {
        let v = body.get_velocity();
        assert!(v.x.abs() <= 3.0 && v.y.abs() <= 3.0 && v.z.abs() <= 3.0);
        any_moving |= !v.is_zero();
    }
    assert!(any_moving);
    assert!(world.statistics().system_average_speed.unwrap() > 0.0);
}

#[test]
fn test_same_seed_gives_same_population() {
    let a = World::new(small_config(99)).unwrap();
    let b = World::new(small_config(99)).unwrap();

    let positions_a: Vec<Vector3> = a.bodies().map(|(_, body)| body.get_position()).collect();
    let positions_b: Vec<Vector3> = b.bodies().map(|(_, body)| body.get_position()).collect();
    assert_eq!(positions_a, positions_b);
}

#[test]
fn test_apply_configuration_resets_world() {
    let mut world = World::new(small_config(5)).unwrap();
    world.step(0.05).unwrap();
    assert_eq!(world.step_count(), 1);

    let update = ConfigUpdate {
        particle_count: Some(25),
        gravitational_constant: Some(-2.0),
        ..ConfigUpdate::new()
    };
    world.apply_configuration(&update).unwrap();

    assert!(world.is_running());
    assert_eq!(world.body_count(), 25);
    assert_eq!(world.statistics().remaining_particles, 25);
    assert_eq!(world.step_count(), 0);
    assert_eq!(world.elapsed_time(), 0.0);
    assert_eq!(world.get_config().gravitational_constant, -2.0);
    assert_eq!(world.get_config().global_radius, 200.0);
}

#[test]
fn test_rejected_configuration_leaves_world_untouched() {
    let mut world = World::new(small_config(8)).unwrap();
    let before: Vec<Vector3> = world.bodies().map(|(_, body)| body.get_position()).collect();

    let update = ConfigUpdate {
        mass_bounds: Some(Bounds::new(-1.0, 10.0)),
        ..ConfigUpdate::new()
    };
    let result = world.apply_configuration(&update);
    assert!(matches!(result, Err(PhysicsError::InvalidConfiguration(_))));

    let after: Vec<Vector3> = world.bodies().map(|(_, body)| body.get_position()).collect();
    assert_eq!(before, after);
    assert!(world.is_running());
    assert_eq!(world.get_config().mass_bounds, Bounds::new(10.0, 500.0));
}

#[test]
fn test_repeated_configuration_gives_equivalent_populations() {
    let config = SimulationConfig {
        particle_count: 300,
        seed: None,
        ..small_config(0)
    };
    let mut world = World::new(config).unwrap();

    let update = ConfigUpdate {
        particle_count: Some(300),
        ..ConfigUpdate::new()
    };

    world.apply_configuration(&update).unwrap();
    let first_count = world.body_count();
    let first_mean = world.total_mass() / first_count as f64;

    world.apply_configuration(&update).unwrap();
    let second_count = world.body_count();
    let second_mean = world.total_mass() / second_count as f64;

    assert_eq!(first_count, 300);
    assert_eq!(second_count, 300);

    // Mean of 300 uniform masses in [10, 500] sits near 255
    assert!((first_mean - 255.0).abs() < 50.0);
    assert!((second_mean - 255.0).abs() < 50.0);
}

#[test]
fn test_stopped_world_refuses_to_step() {
    let mut world = World::new(small_config(2)).unwrap();
    world.stop();
    assert!(!world.is_running());
    assert!(matches!(world.step(0.1), Err(PhysicsError::SimulationError(_))));

    world.start();
    assert!(world.step(0.1).is_ok());
}

#[test]
fn test_step_rejects_bad_elapsed_time() {
    let mut world = World::new(small_config(2)).unwrap();
    assert!(matches!(world.step(-0.1), Err(PhysicsError::InvalidParameter(_))));
    assert!(matches!(world.step(f64::INFINITY), Err(PhysicsError::InvalidParameter(_))));
    assert_eq!(world.step_count(), 0);
}

#[test]
fn test_clear_removes_everything() {
    let mut world = World::new(small_config(4)).unwrap();
    world.clear();

    assert_eq!(world.body_count(), 0);
    assert_eq!(world.statistics(), Statistics::default());
}

#[test]
fn test_statistics_metrics_by_name() {
    let stats = Statistics::from_speeds(vec![1.0, 2.0, f64::NAN, 3.0]);

    // Non-finite speeds count as bodies but not towards the mean
    assert_eq!(stats.remaining_particles, 4);
    assert_relative_eq!(stats.system_average_speed.unwrap(), 2.0);

    assert_eq!(stats.metric(REMAINING_PARTICLES), Some(MetricValue::Count(4)));
    assert_eq!(stats.metric(SYSTEM_AVERAGE_SPEED), Some(MetricValue::Real(Some(2.0))));
    assert_eq!(stats.metric("unknown"), None);
    assert_eq!(stats.metrics()[0].0, REMAINING_PARTICLES);

    let empty = Statistics::from_speeds(Vec::new());
    assert_eq!(empty.system_average_speed, None);
}

#[test]
fn test_statistics_feed_is_readable_from_another_thread() {
    let mut world = World::empty(SimulationConfig::default()).unwrap();
    world.add_body(Body::new(Vector3::zero(), Vector3::new(0.0, 2.0, 0.0), 1.0, 1.0).unwrap());
    world.add_body(Body::new(Vector3::new(100.0, 0.0, 0.0), Vector3::zero(), 1.0, 1.0).unwrap());

    let feed = world.statistics_feed();
    world.step(0.1).unwrap();
    let published = world.statistics();

    let seen = thread::spawn(move || feed.snapshot()).join().unwrap();
    assert_eq!(seen, published);
    assert_eq!(seen.remaining_particles, 2);
}

#[test]
fn test_fixed_clock_stepper_advances_world() {
    let mut world = World::new(small_config(6)).unwrap();
    let mut stepper = Stepper::with_clock(FixedClock(0.02));

    let reports = stepper.run(&mut world, 5).unwrap();

    assert_eq!(reports.len(), 5);
    assert_eq!(stepper.ticks(), 5);
    assert_eq!(world.step_count(), 5);
    assert_relative_eq!(world.elapsed_time(), 0.1, max_relative = 1e-12);
    assert!(reports.iter().all(|r| r.dt == 0.02));
}

#[test]
fn test_stepper_caps_long_pauses() {
    let mut world = World::new(small_config(6)).unwrap();

    let mut capped = Stepper::with_clock(FixedClock(5.0));
    assert_eq!(capped.max_time_step(), Some(DEFAULT_MAX_TIME_STEP));
    let report = capped.tick(&mut world).unwrap().unwrap();
    assert_eq!(report.dt, DEFAULT_MAX_TIME_STEP);

    let mut custom = Stepper::with_clock(FixedClock(5.0)).with_max_time_step(Some(0.5)).unwrap();
    assert_eq!(custom.tick(&mut world).unwrap().unwrap().dt, 0.5);

    let mut uncapped = Stepper::with_clock(FixedClock(5.0)).with_max_time_step(None).unwrap();
    assert_eq!(uncapped.tick(&mut world).unwrap().unwrap().dt, 5.0);
}

#[test]
fn test_stepper_rejects_bad_time_step_caps() {
    for cap in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
        let result = Stepper::with_clock(FixedClock(0.01)).with_max_time_step(Some(cap));
        assert!(matches!(result, Err(PhysicsError::InvalidParameter(_))));
    }

    let mut world = World::new(small_config(6)).unwrap();
    let mut stepper = Stepper::with_clock(FixedClock(0.01))
        .with_max_time_step(Some(0.005))
        .unwrap();
    assert_eq!(stepper.tick(&mut world).unwrap().unwrap().dt, 0.005);
}

#[test]
fn test_stepper_clamps_negative_elapsed_time() {
    let mut world = World::new(small_config(6)).unwrap();
    let mut stepper = Stepper::with_clock(FixedClock(-1.0));

    let report = stepper.tick(&mut world).unwrap().unwrap();
    assert_eq!(report.dt, 0.0);
}

#[test]
fn test_stepper_skips_stopped_world() {
    let mut world = World::new(small_config(6)).unwrap();
    let mut stepper = Stepper::with_clock(FixedClock(0.01));

    world.stop();
    assert_eq!(stepper.tick(&mut world).unwrap(), None);
    assert_eq!(stepper.ticks(), 0);
    assert_eq!(world.step_count(), 0);

    world.start();
    assert!(stepper.tick(&mut world).unwrap().is_some());
    assert_eq!(stepper.ticks(), 1);
}

#[test]
fn test_system_clock_starts_at_zero() {
    let mut clock = SystemClock::new();
    assert_eq!(clock.elapsed(), 0.0);
    assert!(clock.elapsed() >= 0.0);

    let mut world = World::new(small_config(12)).unwrap();
    let mut stepper = Stepper::new();
    let report = stepper.tick(&mut world).unwrap().unwrap();
    assert_eq!(report.dt, 0.0);
}
