//! The marble simulation for one jar
//!
//! `Simulation` owns the jar geometry, the parameters and the bodies in
//! insertion order. `step()` is a pure state transition with no notion of
//! time; a [`Scheduler`] decides when steps happen.

use tracing::{debug, info, warn};

use super::boundary::resolve_jar_collision;
use super::collisions::resolve_collisions;
use super::color::Rgb;
use super::error::{EngineError, EngineResult};
use super::geometry::JarGeometry;
use super::integrator::euler_step;
use super::params::{validate_material, Parameters};
use super::rest::{observe_rest, seat};
use super::scheduler::Scheduler;
use super::spawner::Spawner;
use super::states::{Body, BodyId, BodySnapshot, BodySpec, NVec2};

#[derive(Debug, Clone)]
pub struct Simulation {
    jar: JarGeometry,
    params: Parameters,
    bodies: Vec<Body>, // insertion order, also the update order
    spawner: Spawner,
    next_id: u64,
    steps: u64,
    running: bool,
}

impl Simulation {
    pub fn new(jar: JarGeometry, params: Parameters) -> EngineResult<Self> {
        params.validate()?;
        Ok(Self {
            jar,
            spawner: Spawner::new(params.seed),
            params,
            bodies: Vec::new(),
            next_id: 1,
            steps: 0,
            running: false,
        })
    }

    pub fn jar(&self) -> &JarGeometry {
        &self.jar
    }

    /// Swap in a new layout, e.g. after the container was resized.
    /// Bodies keep their positions and are pulled back in by the next step.
    pub fn set_jar(&mut self, jar: JarGeometry) {
        debug!(?jar, "jar geometry replaced");
        self.jar = jar;
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of bodies still being simulated.
    pub fn active_count(&self) -> usize {
        self.bodies.iter().filter(|b| !b.settled).count()
    }

    pub fn all_settled(&self) -> bool {
        self.bodies.iter().all(|b| b.settled)
    }

    /// Steps taken since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    // =========================================================================================
    // insertion / removal
    // =========================================================================================

    /// Add a falling marble.
    pub fn spawn(&mut self, spec: BodySpec) -> EngineResult<BodyId> {
        let body = self.build_body(spec, false, &[])?;
        let id = body.id;
        debug!(%id, x = body.x.x, y = body.x.y, "marble spawned");
        self.bodies.push(body);
        Ok(id)
    }

    /// Drop a marble in from above at a seeded random spot.
    pub fn drop_marble(&mut self) -> EngineResult<BodyId> {
        let spec = self.spawner.drop_spec(&self.jar);
        self.spawn(spec)
    }

    /// Insert marbles at known resting positions, already settled.
    /// Either every spec is accepted or none is.
    pub fn bulk_load<I>(&mut self, specs: I) -> EngineResult<usize>
    where
        I: IntoIterator<Item = BodySpec>,
    {
        let mut batch: Vec<Body> = Vec::new();
        for spec in specs {
            match self.build_body(spec, true, &batch) {
                Ok(body) => batch.push(body),
                Err(e) => {
                    warn!(error = %e, "bulk load rejected");
                    return Err(e);
                }
            }
        }

        let n = batch.len();
        self.bodies.extend(batch);
        info!(loaded = n, total = self.bodies.len(), "bulk load");
        Ok(n)
    }

    /// Fill the jar with `count` settled marbles laid out from the floor up.
    pub fn fill_settled(&mut self, count: usize) -> EngineResult<usize> {
        let specs = self.spawner.stack_specs(&self.jar, self.params.radius, count);
        self.bulk_load(specs)
    }

    /// Remove the most recently inserted marble, settled or not.
    /// Returns the remaining count; a no-op on an empty jar.
    pub fn undo_last(&mut self) -> usize {
        if let Some(body) = self.bodies.pop() {
            debug!(id = %body.id, remaining = self.bodies.len(), "marble removed");
        }
        self.bodies.len()
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(Body::snapshot).collect()
    }

    fn build_body(&mut self, spec: BodySpec, settled: bool, pending: &[Body]) -> EngineResult<Body> {
        let radius = spec.radius.unwrap_or(self.params.radius);
        if !(radius.is_finite() && radius > 0.0) {
            return Err(EngineError::InvalidRadius(radius));
        }
        let material = spec.material.unwrap_or(self.params.material);
        validate_material(&material)?;

        let taken = |id: BodyId| self.bodies.iter().chain(pending).any(|b| b.id == id);
        let id = match spec.id {
            Some(id) if taken(id) => return Err(EngineError::DuplicateId(id)),
            Some(id) => id,
            None => {
                let mut candidate = BodyId(self.next_id);
                while taken(candidate) {
                    candidate = BodyId(candidate.0 + 1);
                }
                candidate
            }
        };
        self.next_id = self.next_id.max(id.0.saturating_add(1));

        let color = spec
            .color
            .unwrap_or_else(|| Rgb::palette(self.bodies.len() + pending.len()));

        let mut body = Body {
            id,
            x: spec.x,
            v: spec.v,
            radius,
            material,
            color,
            settled: false,
            supported: false,
            rest_frames: 0,
        };
        if settled {
            body.settle();
        }
        Ok(body)
    }

    // =========================================================================================
    // stepping
    // =========================================================================================

    /// Advance every active body by one step, in insertion order:
    /// integrate, jar boundary, other marbles, rest check.
    /// Settled bodies are skipped but still act as obstacles.
    pub fn step(&mut self) {
        let params = &self.params;
        let starts: Vec<NVec2> = self.bodies.iter().map(|b| b.x).collect();

        for i in 0..self.bodies.len() {
            if self.bodies[i].settled {
                continue;
            }

            euler_step(&mut self.bodies[i]);
            let touched = resolve_jar_collision(&mut self.bodies[i], &self.jar, params);
            self.bodies[i].supported = touched;
            resolve_collisions(&mut self.bodies, i, params);

            let body = &mut self.bodies[i];
            let moved = (body.x - starts[i]).norm();
            if observe_rest(body, moved, params.rest_speed, params.rest_frames) {
                seat(&mut self.bodies, i, &self.jar, params);
                let body = &self.bodies[i];
                debug!(id = %body.id, x = body.x.x, y = body.x.y, step = self.steps, "marble settled");
            }
        }

        self.steps += 1;
    }

    /// Resume accepting ticks.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop accepting ticks. Takes effect before the next step, never during one.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One tick from an external clock: steps only while running.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.step();
        }
        self.running
    }

    /// Start and keep stepping for as long as `scheduler` hands out ticks.
    /// Returns the number of steps taken; the simulation is stopped afterwards.
    pub fn run<S: Scheduler>(&mut self, scheduler: &mut S) -> u64 {
        self.start();
        let mut taken = 0;
        while self.running && scheduler.next_tick(self) {
            self.step();
            taken += 1;
        }
        self.stop();
        taken
    }
}
