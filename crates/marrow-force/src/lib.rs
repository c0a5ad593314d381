//! # marrow-force
//!
//! Constraint-row storage and the constraint forces of the marrow
//! engine: joints, springs, distance constraints, and triangle area
//! preservation.
//!
//! Every force exposes a small operation set the solver drives each
//! step: `initialize` (once, may request removal), `compute_constraints`
//! (fills C per row), and `compute_derivatives` (fills the Jacobian and
//! Hessian scratch for one queried body). Contact manifolds implement
//! the same trait in `marrow-contact`.

pub mod joint;
pub mod length;
pub mod render;
pub mod row;
pub mod spring;
pub mod traits;
pub mod tri_area;

pub use joint::Joint;
pub use length::Length;
pub use render::{RenderLine, RenderQueue};
pub use row::{Row, RowSet, MAX_ROWS};
pub use spring::Spring;
pub use traits::Force;
pub use tri_area::TriArea;
