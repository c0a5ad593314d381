//! # marrow-solver
//!
//! The AVBD time-stepping solver and the world ownership tree.
//!
//! `World` owns bodies, forces and energies and advances them with
//! `step(dt)`: broadphase pairing, force/energy initialization with
//! warm-start decay, inertial prediction, then N iterations of primal
//! block solves and dual/penalty updates, with velocities extracted on
//! the last regular iteration and an optional post-stabilization pass
//! at α = 0.
//!
//! `FixedStepper` drives the world at a fixed tick with an accumulator
//! and culls bodies that leave the world bounds.

pub mod params;
pub mod stepper;
pub mod timing;
pub mod world;

pub use params::SolverParams;
pub use stepper::{FixedStepper, WorldBounds};
pub use world::World;
