use std::f64::consts::PI;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bodies::{Body, Material, RenderHint};
use crate::collision::MergeResolver;
use crate::core::events::{BodyEvent, BodyEventType, EventQueue, MergeEvent};
use crate::core::{BodyHandle, BodyStorage, ConfigUpdate, SimulationConfig, Statistics, StatisticsFeed};
use crate::error::PhysicsError;
use crate::forces::{Interaction, PairwiseGravity};
use crate::math::{self, Vector3};
use crate::Result;

/// Margin keeping seeded radii and angles off the ends of their ranges
const SEEDING_EPSILON: f64 = 0.001;

/// Summary of one call to [`World::step`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Elapsed time the bodies were advanced by
    pub dt: f64,

    /// Number of merges committed
    pub merges: usize,

    /// Number of bodies integrated (merge products are not)
    pub integrated: usize,
}

/// The simulation: owns every body and advances them together
pub struct World {
    /// All live bodies
    bodies: BodyStorage<Body>,

    /// Validated configuration the population was seeded from
    config: SimulationConfig,

    /// Force and collision evaluator
    gravity: PairwiseGravity,

    /// Events from the most recent step or reset
    events: EventQueue,

    /// Statistics as of the last completed step
    statistics: Statistics,

    /// Shared copy of `statistics` for external readers
    feed: StatisticsFeed,

    /// Source of randomness for seeding
    rng: ChaCha8Rng,

    /// Whether `step` is accepted
    running: bool,

    /// Total simulated time since the last reset
    time: f64,

    /// Steps completed since the last reset
    steps: u64,
}

impl World {
    /// Creates a world and seeds it with `config.particle_count` bodies
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut world = Self::empty(config)?;
        world.seed_population()?;
        world.publish_statistics();

        log::info!(
            "seeded world with {} bodies (G = {}, global radius = {})",
            world.bodies.len(),
            world.config.gravitational_constant,
            world.config.global_radius
        );

        Ok(world)
    }

    /// Creates a world with a validated configuration but no bodies
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        let config = config.validate()?;

        Ok(Self {
            bodies: BodyStorage::new(),
            gravity: PairwiseGravity::new(config.gravitational_constant),
            rng: rng_for(config.seed),
            config,
            events: EventQueue::new(),
            statistics: Statistics::default(),
            feed: StatisticsFeed::new(),
            running: true,
            time: 0.0,
            steps: 0,
        })
    }

    /// Returns the configuration in effect
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the total simulated time since the last reset
    pub fn elapsed_time(&self) -> f64 {
        self.time
    }

    /// Returns the number of steps since the last reset
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Allows `step` to advance the world
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Makes `step` refuse to advance the world
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns whether the world accepts steps
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Adds a body and returns its handle
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.insert_body(body);
        self.publish_statistics();
        handle
    }

    /// Removes a body from the world
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self.take_body(handle)?;
        self.publish_statistics();
        Ok(body)
    }

    /// Gets a reference to a body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_body_mut(handle)
    }

    /// Speed of a live body; fails for handles of bodies that no longer exist
    pub fn instant_speed(&self, handle: BodyHandle) -> Result<f64> {
        Ok(self.bodies.get_body(handle)?.instant_speed())
    }

    /// Returns the number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Handles of all live bodies in iteration order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.handles()
    }

    /// Iterates over all live bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    /// What the presentation layer needs to draw every live body
    pub fn render_hints(&self) -> Vec<(BodyHandle, RenderHint)> {
        self.bodies.iter().map(|(handle, body)| (handle, body.render_hint())).collect()
    }

    /// Sum of all live masses
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|(_, body)| body.get_mass()).sum()
    }

    /// Sum of all live momenta
    pub fn total_momentum(&self) -> Vector3 {
        self.bodies
            .iter()
            .fold(Vector3::zero(), |total, (_, body)| total + body.momentum())
    }

    /// Statistics as of the last completed step
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// A handle other threads can poll for the latest statistics
    pub fn statistics_feed(&self) -> StatisticsFeed {
        self.feed.clone()
    }

    /// Returns the events of the most recent step or reset
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Removes every body and zeroes the clock and statistics
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.events.clear();
        self.time = 0.0;
        self.steps = 0;
        self.publish_statistics();
    }

    /// Replaces the configuration and re-seeds the population
    ///
    /// The configuration is validated first; if it is rejected the world is
    /// left exactly as it was.
    pub fn reset(&mut self, config: SimulationConfig) -> Result<()> {
        let config = config.validate()?;

        self.stop();
        self.clear();

        if config.seed.is_some() {
            self.rng = rng_for(config.seed);
        }
        self.gravity = PairwiseGravity::new(config.gravitational_constant);
        self.config = config;

        self.seed_population()?;
        self.publish_statistics();
        self.start();

        log::info!("reset world with {} bodies", self.bodies.len());
        Ok(())
    }

    /// Applies a partial configuration change and resets
    pub fn apply_configuration(&mut self, update: &ConfigUpdate) -> Result<()> {
        let config = update.apply_to(&self.config);
        self.reset(config)
    }

    /// Advances the simulation by `dt`
    ///
    /// Every live body is evaluated against the population as it stood when
    /// the step began. Overlapping pairs are merged in iteration order, each
    /// body at most once; the products are inserted after the evaluation pass
    /// and are not integrated until the next step. Every other body integrates
    /// the force found for it, or no force if it overlapped something.
    pub fn step(&mut self, dt: f64) -> Result<StepReport> {
        if !self.running {
            return Err(PhysicsError::SimulationError("cannot step a stopped world".to_string()));
        }
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "elapsed time must be non-negative and finite, got {}",
                dt
            )));
        }

        self.events.clear();
        let snapshot = self.bodies.handles();

        log::trace!("evaluating {} bodies", snapshot.len());
        let interactions = snapshot
            .iter()
            .map(|&handle| Ok((handle, self.gravity.evaluate(handle, &self.bodies)?)))
            .collect::<Result<Vec<_>>>()?;

        log::trace!("resolving collisions");
        let mut resolver = MergeResolver::new(self.config.merge_radius_policy());
        let mut products = Vec::new();
        for &(handle, interaction) in &interactions {
            if let Interaction::Collision(partner) = interaction {
                let a = self.bodies.get_body(handle)?;
                let b = self.bodies.get_body(partner)?;
                if let Some(product) = resolver.try_merge(handle, a, partner, b) {
                    products.push((handle, partner, product));
                }
            }
        }

        for &(handle, interaction) in &interactions {
            if resolver.is_consumed(handle) {
                continue;
            }
            let body = self.bodies.get_body_mut(handle)?;
            match interaction {
                Interaction::Force(force) => body.set_force(force),
                Interaction::Collision(_) => body.clear_forces(),
            }
        }

        let merges = products.len();
        for (body_a, body_b, product) in products {
            self.take_body(body_a)?;
            self.take_body(body_b)?;
            let mass = product.get_mass();
            let product = self.insert_body(product);

            log::debug!("merged {:?} and {:?} into {:?} (mass {})", body_a, body_b, product, mass);
            self.events.add_merge_event(MergeEvent { body_a, body_b, product, mass });
        }

        log::trace!("integrating");
        let mut integrated = 0;
        for handle in snapshot {
            if resolver.is_consumed(handle) {
                continue;
            }
            let body = self.bodies.get_body_mut(handle)?;
            body.update_acceleration();
            body.integrate(dt);
            integrated += 1;
        }

        self.time += dt;
        self.steps += 1;
        self.publish_statistics();

        log::debug!(
            "step {}: dt = {}, {} merges, {} bodies remain",
            self.steps,
            dt,
            merges,
            self.bodies.len()
        );

        Ok(StepReport { dt, merges, integrated })
    }

    /// Seeds `particle_count` bodies inside the shell between the initial
    /// distance and the global radius
    fn seed_population(&mut self) -> Result<()> {
        for _ in 0..self.config.particle_count {
            let body = self.sample_body()?;
            self.insert_body(body);
        }
        Ok(())
    }

    fn sample_body(&mut self) -> Result<Body> {
        let config = &self.config;
        let rng = &mut self.rng;

        let mass = math::random_in_range(rng, config.mass_bounds.min, config.mass_bounds.max, 0.0);
        let density = math::random_in_range(rng, config.density_bounds.min, config.density_bounds.max, 0.0);

        let (low, high) = (config.initial_distance_from_origin, config.global_radius);
        let r = math::random_in_range(rng, low, high, seeding_margin(low, high));
        let theta = math::random_in_range(rng, 0.0, 2.0 * PI, seeding_margin(0.0, 2.0 * PI));
        let phi = math::random_in_range(rng, 0.0, PI, seeding_margin(0.0, PI));
        let position = math::spherical_to_cartesian(r, theta, phi);

        let bound = config.initial_speed_bound;
        let velocity = if bound > 0.0 {
            Vector3::new(
                math::random_in_range(rng, -bound, bound, 0.0),
                math::random_in_range(rng, -bound, bound, 0.0),
                math::random_in_range(rng, -bound, bound, 0.0),
            )
        } else {
            Vector3::zero()
        };

        let mut body = Body::with_material(position, velocity, mass, Material::new(density))?;
        body.mark_seeded();
        Ok(body)
    }

    fn insert_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.add(body);
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Added,
            body: handle,
        });
        handle
    }

    fn take_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))?;
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Removed,
            body: handle,
        });
        Ok(body)
    }

    fn publish_statistics(&mut self) {
        self.statistics = Statistics::from_speeds(self.bodies.iter().map(|(_, body)| body.instant_speed()));
        self.feed.publish(self.statistics);
    }
}

/// Margin for sampling inside `[low, high]`, narrowed so the range never inverts
fn seeding_margin(low: f64, high: f64) -> f64 {
    SEEDING_EPSILON.min((high - low) / 4.0)
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
