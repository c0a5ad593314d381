//! The world: ownership tree and the AVBD step.
//!
//! Bodies, forces and energies live in slot arenas owned here; bodies
//! hold back-reference id lists so destruction is an explicit
//! two-phase detach-then-release. `step` is fully synchronous and
//! mutates nothing observable until it returns; readers query poses
//! and render queues between steps.

use std::time::Instant;

use glam::{Mat3, Vec2, Vec3};
use marrow_body::{Body, BodySet};
use marrow_contact::{circles_overlap, Manifold};
use marrow_energy::{Energy, ProjectionMode};
use marrow_force::{Force, Joint, RenderLine, RenderQueue};
use marrow_math::{geometric_stiffness, is_finite3, outer3, solve_ldlt};
use marrow_telemetry::{EventBus, EventKind, SimulationEvent};
use marrow_types::constants::{
    DRAG_STIFFNESS, DT_DRIFT_TOLERANCE, GRAVITY_EPSILON, PENALTY_MAX, PENALTY_MIN,
    ROTATION_VELOCITY_LIMIT,
};
use marrow_types::{BodyId, ForceId, MarrowError, MarrowResult, Scalar};

use crate::params::SolverParams;
use crate::timing::StepTiming;

/// The simulation world.
pub struct World {
    bodies: BodySet,
    forces: Vec<Option<Box<dyn Force>>>,
    energies: Vec<Option<Box<dyn Energy>>>,
    /// Freed slots available for reuse; transient manifolds would
    /// otherwise grow the arena every step.
    free_force_slots: Vec<usize>,
    free_energy_slots: Vec<usize>,
    params: SolverParams,
    paused: bool,
    urgent_stop: bool,
    /// Trust-region ratio ρ feeding the adaptive projection mode.
    trust_ratio: Scalar,
    /// Total elastic energy at the previous trust-region update.
    prev_elastic: Scalar,
    render: RenderQueue,
    bus: EventBus,
    step_count: u64,
    timing: StepTiming,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SolverParams::default())
    }
}

impl World {
    /// Creates an empty world.
    pub fn new(params: SolverParams) -> Self {
        Self {
            bodies: BodySet::new(),
            forces: Vec::new(),
            energies: Vec::new(),
            free_force_slots: Vec::new(),
            free_energy_slots: Vec::new(),
            params,
            paused: false,
            urgent_stop: false,
            trust_ratio: 1.0,
            prev_elastic: 0.0,
            render: RenderQueue::default(),
            bus: EventBus::new(),
            step_count: 0,
            timing: StepTiming::new(),
        }
    }

    // ─── Ownership tree ───────────────────────────────────────────

    /// Adds a body.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.insert(body)
    }

    /// Adds a force and attaches it to every body it touches.
    pub fn add_force(&mut self, force: Box<dyn Force>) -> ForceId {
        let slot = self.free_force_slots.pop().unwrap_or(self.forces.len());
        let id = ForceId(slot as u32);
        for &b in force.bodies() {
            if let Some(body) = self.bodies.get_mut(b) {
                body.attach_force(id);
            }
        }
        if slot == self.forces.len() {
            self.forces.push(Some(force));
        } else {
            self.forces[slot] = Some(force);
        }
        id
    }

    /// Adds an energy and attaches it to every particle it touches.
    pub fn add_energy(&mut self, energy: Box<dyn Energy>) -> marrow_types::EnergyId {
        let slot = self.free_energy_slots.pop().unwrap_or(self.energies.len());
        let id = marrow_types::EnergyId(slot as u32);
        for &b in energy.particles() {
            if let Some(body) = self.bodies.get_mut(b) {
                body.attach_energy(id);
            }
        }
        if slot == self.energies.len() {
            self.energies.push(Some(energy));
        } else {
            self.energies[slot] = Some(energy);
        }
        id
    }

    /// Removes a force, detaching it from every body it referenced.
    pub fn remove_force(&mut self, id: ForceId) {
        if let Some(force) = self.forces.get_mut(id.index()).and_then(|s| s.take()) {
            for &b in force.bodies() {
                if let Some(body) = self.bodies.get_mut(b) {
                    body.detach_force(id);
                }
            }
            self.free_force_slots.push(id.index());
        }
    }

    /// Removes an energy, detaching it from every particle.
    pub fn remove_energy(&mut self, id: marrow_types::EnergyId) {
        if let Some(energy) = self.energies.get_mut(id.index()).and_then(|s| s.take()) {
            for &b in energy.particles() {
                if let Some(body) = self.bodies.get_mut(b) {
                    body.detach_energy(id);
                }
            }
            self.free_energy_slots.push(id.index());
        }
    }

    /// Removes a body. Every force and energy touching it is destroyed
    /// first, then the body slot is released.
    pub fn remove_body(&mut self, id: BodyId) {
        let (force_ids, energy_ids) = match self.bodies.get(id) {
            Some(body) => (body.forces.clone(), body.energies.clone()),
            None => return,
        };
        for fid in force_ids {
            self.remove_force(fid);
        }
        for eid in energy_ids {
            self.remove_energy(eid);
        }
        self.bodies.remove(id);
    }

    /// True when some force already links the two bodies.
    pub fn is_constrained(&self, a: BodyId, b: BodyId) -> bool {
        let Some(body) = self.bodies.get(a) else {
            return false;
        };
        body.forces.iter().any(|&fid| {
            self.forces
                .get(fid.index())
                .and_then(|s| s.as_ref())
                .is_some_and(|f| f.bodies().contains(&b))
        })
    }

    /// Clears everything, including the latched urgent-stop flag.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.forces.clear();
        self.energies.clear();
        self.free_force_slots.clear();
        self.free_energy_slots.clear();
        self.paused = false;
        self.urgent_stop = false;
        self.trust_ratio = 1.0;
        self.prev_elastic = 0.0;
        self.render.clear();
        self.step_count = 0;
    }

    // ─── Read access ──────────────────────────────────────────────

    /// The body arena.
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// One body.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    /// One body, mutable. External mutation is only sound between
    /// steps.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    /// One force slot.
    pub fn force(&self, id: ForceId) -> Option<&dyn Force> {
        self.forces.get(id.index()).and_then(|s| s.as_deref())
    }

    /// One energy slot.
    pub fn energy(&self, id: marrow_types::EnergyId) -> Option<&dyn Energy> {
        self.energies.get(id.index()).and_then(|s| s.as_deref())
    }

    /// Live forces in slot order.
    pub fn forces(&self) -> impl Iterator<Item = (ForceId, &dyn Force)> {
        self.forces
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_deref().map(|f| (ForceId(i as u32), f)))
    }

    /// Live energies in slot order.
    pub fn energies(&self) -> impl Iterator<Item = &dyn Energy> {
        self.energies.iter().filter_map(|s| s.as_deref())
    }

    /// Contact points generated by the last step.
    pub fn contacts_to_render(&self) -> &[Vec2] {
        &self.render.points
    }

    /// Constraint lines generated by the last step.
    pub fn contact_lines_to_render(&self) -> &[RenderLine] {
        &self.render.lines
    }

    /// Current parameters.
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// The telemetry bus, for sink registration and flushing.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Steps completed since creation or reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Sliding one-second average step time, in seconds.
    pub fn average_step_time(&self) -> f64 {
        self.timing.average()
    }

    /// True while externally paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True once the solver latched its urgent stop.
    pub fn is_urgent_stopped(&self) -> bool {
        self.urgent_stop
    }

    /// Total kinetic energy ½·m·‖v‖² over dynamic bodies.
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .filter(|(_, b)| !b.is_static())
            .map(|(_, b)| {
                let v = Vec2::new(b.velocity.x, b.velocity.y);
                0.5 * f64::from(b.mass) * f64::from(v.length_squared())
                    + 0.5 * f64::from(b.moment) * f64::from(b.velocity.z * b.velocity.z)
            })
            .sum()
    }

    /// Total cached elastic energy over all elements.
    pub fn elastic_energy(&self) -> f64 {
        self.energies().map(|e| f64::from(e.energy())).sum()
    }

    // ─── Parameter surface ────────────────────────────────────────

    /// Sets the gravity vector.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.params.gravity = gravity;
    }

    /// Sets the stabilization factor α ∈ [0, 1].
    pub fn set_alpha(&mut self, alpha: Scalar) {
        self.params.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Sets the penalty growth rate β.
    pub fn set_beta(&mut self, beta: Scalar) {
        self.params.beta = beta.max(0.0);
    }

    /// Sets the energy stiffness ramp rate.
    pub fn set_beta_energy(&mut self, beta_energy: Scalar) {
        self.params.beta_energy = beta_energy.max(0.0);
    }

    /// Sets the warm-start decay γ ∈ [0, 1].
    pub fn set_gamma(&mut self, gamma: Scalar) {
        self.params.gamma = gamma.clamp(0.0, 1.0);
    }

    /// Sets the iteration count (at least 1).
    pub fn set_iterations(&mut self, iterations: u32) {
        self.params.iterations = iterations.max(1);
    }

    /// Enables the post-stabilization pass.
    pub fn set_post_stabilization(&mut self, enabled: bool) {
        self.params.post_stabilization = enabled;
    }

    /// Sets the SPD projection mode.
    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.params.projection_mode = mode;
    }

    /// Enables energy ramp scaling.
    pub fn set_use_energy_ramp(&mut self, enabled: bool) {
        self.params.use_energy_ramp = enabled;
    }

    /// Pauses or resumes stepping.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Sets or clears the urgent-stop step cap.
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.params.step_limit = limit;
    }

    // ─── Interaction ──────────────────────────────────────────────

    /// Starts dragging a body: a one-body joint with large linear
    /// stiffness pins the grabbed local point to the pointer anchor.
    pub fn begin_drag(&mut self, body: BodyId, anchor: Vec2) -> MarrowResult<ForceId> {
        let grab = {
            let b = self
                .bodies
                .get(body)
                .ok_or_else(|| MarrowError::InvalidBody("drag target does not exist".into()))?;
            b.rotation().transpose() * (anchor - b.position())
        };
        let joint = Joint::new(
            &self.bodies,
            None,
            body,
            anchor,
            grab,
            Vec3::new(DRAG_STIFFNESS, DRAG_STIFFNESS, 0.0),
            None,
        )?;
        let id = self.add_force(Box::new(joint));
        if let Some(b) = self.bodies.get_mut(body) {
            b.is_dragged = true;
        }
        Ok(id)
    }

    /// Moves the drag anchor and records the pointer velocity to fold
    /// into the body's velocity at extraction.
    pub fn update_drag(&mut self, id: ForceId, anchor: Vec2, velocity: Vec3) {
        let target = self
            .forces
            .get(id.index())
            .and_then(|s| s.as_ref())
            .and_then(|f| f.bodies().first().copied());
        if let Some(force) = self.forces.get_mut(id.index()).and_then(|s| s.as_mut()) {
            force.set_world_anchor(anchor);
        }
        if let Some(body) = target.and_then(|b| self.bodies.get_mut(b)) {
            body.drag_velocity = velocity;
        }
    }

    /// Ends a drag, removing the joint and clearing the drag state.
    pub fn end_drag(&mut self, id: ForceId) {
        let target = self
            .forces
            .get(id.index())
            .and_then(|s| s.as_ref())
            .and_then(|f| f.bodies().first().copied());
        self.remove_force(id);
        if let Some(body) = target.and_then(|b| self.bodies.get_mut(b)) {
            body.is_dragged = false;
            body.drag_velocity = Vec3::ZERO;
        }
    }

    // ─── The AVBD step ────────────────────────────────────────────

    /// Advances the world one fixed tick. No-op while paused or after
    /// an urgent stop.
    pub fn step(&mut self, dt: Scalar) {
        if self.paused || self.urgent_stop || dt <= 0.0 {
            return;
        }
        let start = Instant::now();
        self.bus
            .emit(SimulationEvent::new(self.step_count, EventKind::StepBegin));

        if (dt - self.params.dt).abs() > DT_DRIFT_TOLERANCE {
            self.bus.emit(SimulationEvent::new(
                self.step_count,
                EventKind::DtDrift {
                    supplied: dt,
                    configured: self.params.dt,
                },
            ));
        }

        if let Some(limit) = self.params.step_limit {
            if self.step_count >= limit {
                self.halt("step limit reached");
                return;
            }
        }

        self.render.clear();

        // 1. Broadphase pairing.
        self.broadphase();

        // 2. Initialize forces; decay warm-started duals and penalties.
        self.initialize_forces();

        // 3. Initialize energies; decay effective stiffness.
        self.initialize_energies();

        // 4. Inertial prediction with the adaptive warm start.
        self.predict(dt);

        // 5. Main primal-dual loop. With post-stabilization, one extra
        // pass runs at α = 0 after velocities are extracted.
        let total_iters = self.params.iterations + u32::from(self.params.post_stabilization);
        let mut predicted_decrease: Scalar = 0.0;
        for iter in 0..total_iters {
            let stabilizing = self.params.post_stabilization && iter + 1 == total_iters;
            let alpha = if stabilizing { 0.0 } else { self.params.alpha };

            if !self.primal_solve(dt, alpha, &mut predicted_decrease) {
                return;
            }

            if self.params.projection_mode == ProjectionMode::Adaptive {
                self.update_trust_region(&mut predicted_decrease);
            } else {
                predicted_decrease = 0.0;
            }

            if !stabilizing {
                self.dual_update(alpha);
            }

            if iter + 1 == self.params.iterations {
                self.extract_velocities(dt);
            }
        }

        // 6. Accounting.
        let wall = start.elapsed().as_secs_f64();
        self.timing.record(wall);
        self.bus.emit(SimulationEvent::new(
            self.step_count,
            EventKind::Energy {
                kinetic: self.kinetic_energy(),
                elastic: self.elastic_energy(),
            },
        ));
        self.bus.emit(SimulationEvent::new(
            self.step_count,
            EventKind::StepEnd { wall_time: wall },
        ));
        self.step_count += 1;
    }

    fn halt(&mut self, reason: &str) {
        self.urgent_stop = true;
        self.bus.emit(SimulationEvent::new(
            self.step_count,
            EventKind::UrgentStop {
                reason: reason.to_string(),
            },
        ));
    }

    /// Admits bounding-circle overlaps that are not already constrained
    /// and creates a fresh manifold for each.
    fn broadphase(&mut self) {
        let ids: Vec<BodyId> = self.bodies.ids().collect();
        let mut admitted = Vec::new();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (a, b) = (ids[i], ids[j]);
                let (Some(ba), Some(bb)) = (self.bodies.get(a), self.bodies.get(b)) else {
                    continue;
                };
                if ba.is_static() && bb.is_static() {
                    continue;
                }
                if !circles_overlap(ba, bb) {
                    continue;
                }
                if self.is_constrained(a, b) {
                    continue;
                }
                admitted.push((a, b));
            }
        }
        for (a, b) in admitted {
            self.add_force(Box::new(Manifold::new(a, b)));
        }
    }

    fn initialize_forces(&mut self) {
        let gamma = self.params.gamma;
        let lambda_decay = if self.params.post_stabilization {
            1.0
        } else {
            self.params.alpha * self.params.gamma
        };

        let mut manifolds = 0u32;
        let mut contacts = 0u32;

        for idx in 0..self.forces.len() {
            let id = ForceId(idx as u32);
            let keep = {
                let bodies = &self.bodies;
                match self.forces[idx].as_mut() {
                    Some(force) => force.initialize(bodies),
                    None => continue,
                }
            };
            if !keep {
                self.remove_force(id);
                continue;
            }

            let bodies = &self.bodies;
            let render = &mut self.render;
            let Some(force) = self.forces[idx].as_mut() else {
                continue;
            };
            if force.is_disabled() {
                continue;
            }

            if force.contact_count() > 0 {
                manifolds += 1;
                contacts += force.contact_count() as u32;
            }
            force.render_shapes(bodies, render);

            for row in force.rows_mut().rows_mut() {
                if !row.is_active() {
                    continue;
                }
                row.lambda *= lambda_decay;
                // κ ∈ [κ_min, min(κ_max, k)]; rows softer than κ_min
                // collapse the interval to their own stiffness.
                let ceiling = PENALTY_MAX.min(row.stiffness);
                row.penalty = (row.penalty * gamma).clamp(PENALTY_MIN.min(ceiling), ceiling);
            }
        }

        self.bus.emit(SimulationEvent::new(
            self.step_count,
            EventKind::ContactDetection {
                manifolds,
                contacts,
            },
        ));
    }

    fn initialize_energies(&mut self) {
        let gamma = self.params.gamma;
        for idx in 0..self.energies.len() {
            let id = marrow_types::EnergyId(idx as u32);
            let keep = {
                let bodies = &self.bodies;
                match self.energies[idx].as_mut() {
                    Some(energy) => energy.initialize(bodies),
                    None => continue,
                }
            };
            if !keep {
                self.remove_energy(id);
                continue;
            }

            let Some(energy) = self.energies[idx].as_mut() else {
                continue;
            };
            energy.decay_stiffness(gamma);

            // Triangle edges feed the line queue; thickness tracks the
            // ramp so a freshly seeded element reads as weak.
            let thickness = 0.25 + 0.25 * energy.ramp_fraction();
            let particles = [
                energy.particles()[0],
                energy.particles()[1],
                energy.particles()[2],
            ];
            let mut positions = [Vec2::ZERO; 3];
            let mut alive = true;
            for (slot, &p) in particles.iter().enumerate() {
                match self.bodies.get(p) {
                    Some(b) => positions[slot] = b.position(),
                    None => alive = false,
                }
            }
            if alive {
                for k in 0..3 {
                    self.render.lines.push(RenderLine {
                        a: positions[k],
                        b: positions[(k + 1) % 3],
                        thickness,
                    });
                }
            }
        }
    }

    /// Clamps rotational velocity, predicts free flight, and advances
    /// each pose by the acceleration-weighted warm start.
    fn predict(&mut self, dt: Scalar) {
        let mut gravity = self.params.gravity;
        if gravity.length_squared() < GRAVITY_EPSILON * GRAVITY_EPSILON {
            gravity = Vec2::new(0.0, GRAVITY_EPSILON);
        }
        let g = Vec3::new(gravity.x, gravity.y, 0.0);
        let dt2 = dt * dt;

        let ids: Vec<BodyId> = self.bodies.ids().collect();
        for id in ids {
            let Some(body) = self.bodies.get_mut(id) else {
                continue;
            };
            body.velocity.z = body
                .velocity
                .z
                .clamp(-ROTATION_VELOCITY_LIMIT, ROTATION_VELOCITY_LIMIT);
            body.last_pose = body.pose;

            if body.is_static() {
                body.inertial_pose = body.pose;
                continue;
            }

            // Fraction of the previous step's acceleration aligned with
            // gravity; a resting body warm-starts without the gravity
            // kick, a free-falling one with all of it.
            let accel = (body.velocity - body.prev_velocity) / dt;
            let weight = (accel.dot(g) / g.dot(g)).clamp(0.0, 1.0);

            body.inertial_pose = body.pose + body.velocity * dt + g * dt2;
            body.pose += body.velocity * dt + g * (weight * dt2);
        }
    }

    /// One block Gauss-Seidel sweep over dynamic bodies. Returns false
    /// after latching the urgent stop.
    fn primal_solve(&mut self, dt: Scalar, alpha: Scalar, predicted: &mut Scalar) -> bool {
        let mode = self.params.projection_mode;
        let use_ramp = self.params.use_energy_ramp;
        let trust = self.trust_ratio;
        let inv_dt2 = 1.0 / (dt * dt);

        let ids: Vec<BodyId> = self.bodies.ids().collect();
        for bid in ids {
            let (mass, moment, pose, inertial, force_ids, energy_ids) = {
                let Some(b) = self.bodies.get(bid) else {
                    continue;
                };
                if b.is_static() {
                    continue;
                }
                (
                    b.mass,
                    b.moment,
                    b.pose,
                    b.inertial_pose,
                    b.forces.clone(),
                    b.energies.clone(),
                )
            };

            let m = Mat3::from_diagonal(Vec3::new(mass, mass, moment)) * inv_dt2;
            let mut lhs = m;
            let mut rhs = m * (pose - inertial);
            let mut energy_grad = Vec3::ZERO;

            let bodies = &self.bodies;
            for fid in &force_ids {
                let Some(force) = self.forces.get_mut(fid.index()).and_then(|s| s.as_mut())
                else {
                    continue;
                };
                if force.is_disabled() {
                    continue;
                }
                force.compute_constraints(bodies, alpha);
                force.compute_derivatives(bodies, bid);
                for row in force.rows().rows() {
                    if !row.is_active() {
                        continue;
                    }
                    let f = row.clamped_force();
                    rhs += f * row.j;
                    lhs += row.penalty * outer3(row.j, row.j) + geometric_stiffness(f, row.h);
                }
            }

            for eid in &energy_ids {
                let Some(energy) = self.energies.get_mut(eid.index()).and_then(|s| s.as_mut())
                else {
                    continue;
                };
                let terms = energy.compute_energy_terms(bodies, bid, mode, trust);
                if !is_finite3(terms.gradient) {
                    self.halt("NaN energy gradient");
                    return false;
                }

                let (grad, hess) = if use_ramp {
                    let s = energy.ramp_fraction();
                    let reg = terms.gradient.length() * s * 0.01;
                    (
                        terms.gradient * s,
                        terms.hessian * s + Mat3::from_diagonal(Vec3::splat(reg)),
                    )
                } else {
                    (terms.gradient, terms.hessian)
                };
                rhs += grad;
                lhs += hess;
                energy_grad += grad;
            }

            let Some(dx) = solve_ldlt(lhs, rhs) else {
                self.halt("non-SPD primal system");
                return false;
            };
            if let Some(body) = self.bodies.get_mut(bid) {
                body.pose -= dx;
            }
            *predicted += 0.5 * dx.dot(energy_grad);
        }
        true
    }

    /// Trust-region bookkeeping for the adaptive projection mode.
    fn update_trust_region(&mut self, predicted: &mut Scalar) {
        let current: Scalar = self
            .energies
            .iter()
            .filter_map(|s| s.as_deref())
            .map(|e| e.energy())
            .sum();
        let actual = self.prev_elastic - current;
        self.trust_ratio = if predicted.abs() > 1.0e-10 {
            actual / *predicted
        } else {
            1.0
        };
        self.prev_elastic = current;
        *predicted = 0.0;
    }

    /// Dual and penalty update, fracture latching, and the energy
    /// stiffness ramp.
    fn dual_update(&mut self, alpha: Scalar) {
        let beta = self.params.beta;
        let beta_energy = self.params.beta_energy;

        for idx in 0..self.forces.len() {
            let bodies = &self.bodies;
            let Some(force) = self.forces[idx].as_mut() else {
                continue;
            };
            if force.is_disabled() {
                continue;
            }
            force.compute_constraints(bodies, alpha);

            let mut fractured = None;
            for row in force.rows_mut().rows_mut() {
                if !row.is_active() {
                    continue;
                }
                let lambda_local = if row.stiffness.is_infinite() {
                    row.lambda
                } else {
                    0.0
                };
                let lambda = (lambda_local + row.penalty * row.c).clamp(row.fmin, row.fmax);
                row.lambda = lambda;

                if lambda.abs() >= row.fracture {
                    fractured = Some(lambda);
                } else if lambda > row.fmin && lambda < row.fmax {
                    // Grow the penalty only while the dual is strictly
                    // interior; a saturated dual would turn growth into
                    // drift.
                    row.penalty =
                        (row.penalty + beta * row.c.abs()).min(row.stiffness.min(PENALTY_MAX));
                }
            }
            if let Some(lambda) = fractured {
                force.disable();
                self.bus.emit(SimulationEvent::new(
                    self.step_count,
                    EventKind::Fracture {
                        force: idx as u32,
                        lambda,
                    },
                ));
            }
        }

        let bodies = &self.bodies;
        for slot in self.energies.iter_mut() {
            if let Some(energy) = slot.as_mut() {
                energy.ramp_stiffness(bodies, beta_energy);
            }
        }
    }

    /// Converts accumulated pose change into velocities, folding in the
    /// drag velocity where a pointer holds a body.
    fn extract_velocities(&mut self, dt: Scalar) {
        let ids: Vec<BodyId> = self.bodies.ids().collect();
        for id in ids {
            let Some(body) = self.bodies.get_mut(id) else {
                continue;
            };
            if body.is_static() {
                continue;
            }
            body.prev_velocity = body.velocity;
            body.velocity = (body.pose - body.last_pose) / dt;
            if body.is_dragged {
                body.velocity += body.drag_velocity;
            }
            body.drag_velocity = Vec3::ZERO;
        }
    }
}
