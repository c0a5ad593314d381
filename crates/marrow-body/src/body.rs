//! Rigid body state.

use glam::{Mat2, Vec2, Vec3};
use marrow_math::rotation;
use marrow_types::{EnergyId, ForceId, Scalar};

/// A rigid rectangular body or point particle.
///
/// Pose and velocity are generalized 3-vectors (x, y, θ). A body with
/// zero mass is static: immovable, but still a valid collision and
/// constraint participant.
///
/// The `forces` and `energies` lists are back-references maintained by
/// the world; for every entry `f` here, this body appears in
/// `f.bodies()`. Destruction detaches both sides explicitly.
#[derive(Debug, Clone)]
pub struct Body {
    /// Generalized pose (x, y, θ).
    pub pose: Vec3,
    /// Generalized velocity (ẋ, ẏ, θ̇).
    pub velocity: Vec3,

    /// Velocity at the start of the previous step, kept for the
    /// adaptive warm-start weight.
    pub prev_velocity: Vec3,
    /// Pose at the start of the current step.
    pub last_pose: Vec3,
    /// Free-flight predicted pose for the current step.
    pub inertial_pose: Vec3,

    /// Rectangle extents (w, h); zero for particles.
    pub size: Vec2,
    /// Mass; zero means static.
    pub mass: Scalar,
    /// Moment of inertia about the center.
    pub moment: Scalar,
    /// Coulomb friction coefficient in [0, 1].
    pub friction: Scalar,
    /// Bounding circle radius for the broadphase prune.
    pub radius: Scalar,
    /// Packed RGB color from the scene wire format (renderer policy).
    pub color: u32,

    /// True while a pointer drag joint is attached.
    pub is_dragged: bool,
    /// Extra velocity folded in at velocity extraction while dragged,
    /// then cleared.
    pub drag_velocity: Vec3,

    /// Forces touching this body.
    pub forces: Vec<ForceId>,
    /// Energies touching this body.
    pub energies: Vec<EnergyId>,
}

impl Body {
    /// Creates a rectangular body. Density zero produces a static body.
    pub fn rectangle(
        position: Vec2,
        angle: Scalar,
        size: Vec2,
        density: Scalar,
        friction: Scalar,
    ) -> Self {
        let mass = density * size.x * size.y;
        let moment = mass * (size.x * size.x + size.y * size.y) / 12.0;
        let radius = 0.5 * size.length();

        Self {
            pose: Vec3::new(position.x, position.y, angle),
            velocity: Vec3::ZERO,
            prev_velocity: Vec3::ZERO,
            last_pose: Vec3::new(position.x, position.y, angle),
            inertial_pose: Vec3::new(position.x, position.y, angle),
            size,
            mass,
            moment,
            friction: friction.clamp(0.0, 1.0),
            radius,
            color: 0xffffff,
            is_dragged: false,
            drag_velocity: Vec3::ZERO,
            forces: Vec::new(),
            energies: Vec::new(),
        }
    }

    /// Creates a point particle with an explicit mass.
    ///
    /// Size and bounding radius are zero, so particles never enter the
    /// broadphase. The moment is set equal to the mass to keep the
    /// 3×3 mass matrix positive-definite; the rotation coordinate is
    /// inert because every particle Jacobian has a zero angular entry.
    pub fn particle(position: Vec2, mass: Scalar) -> Self {
        Self {
            pose: Vec3::new(position.x, position.y, 0.0),
            velocity: Vec3::ZERO,
            prev_velocity: Vec3::ZERO,
            last_pose: Vec3::new(position.x, position.y, 0.0),
            inertial_pose: Vec3::new(position.x, position.y, 0.0),
            size: Vec2::ZERO,
            mass,
            moment: mass,
            friction: 0.0,
            radius: 0.0,
            color: 0xffffff,
            is_dragged: false,
            drag_velocity: Vec3::ZERO,
            forces: Vec::new(),
            energies: Vec::new(),
        }
    }

    /// Builder-style initial velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        if !self.is_static() {
            self.velocity = velocity;
        }
        self
    }

    /// Builder-style color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// True when the body has no mass and never moves.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    /// World position (the linear part of the pose).
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pose.x, self.pose.y)
    }

    /// Orientation angle θ.
    #[inline]
    pub fn angle(&self) -> Scalar {
        self.pose.z
    }

    /// Rotation matrix for the current orientation.
    #[inline]
    pub fn rotation(&self) -> Mat2 {
        rotation(self.pose.z)
    }

    /// Maps a local offset into world space.
    #[inline]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position() + self.rotation() * local
    }

    /// Sets the generalized velocity. No-op on static bodies.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        if !self.is_static() {
            self.velocity = velocity;
        }
    }

    /// Registers a force touching this body.
    pub fn attach_force(&mut self, id: ForceId) {
        if !self.forces.contains(&id) {
            self.forces.push(id);
        }
    }

    /// Removes a force back-reference.
    pub fn detach_force(&mut self, id: ForceId) {
        self.forces.retain(|&f| f != id);
    }

    /// Registers an energy touching this body.
    pub fn attach_energy(&mut self, id: EnergyId) {
        if !self.energies.contains(&id) {
            self.energies.push(id);
        }
    }

    /// Removes an energy back-reference.
    pub fn detach_energy(&mut self, id: EnergyId) {
        self.energies.retain(|&e| e != id);
    }
}
