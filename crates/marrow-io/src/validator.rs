//! Scene validation.
//!
//! Validates a description before the loader touches a world, catching
//! data-level errors early with targeted diagnostics.

use marrow_types::{MarrowError, MarrowResult};

use crate::contract::{parse_color, BodyDesc, SceneDescription};

/// Validates a complete scene description.
pub fn validate(scene: &SceneDescription) -> MarrowResult<()> {
    let body_count = scene.statics.len() + scene.dynamics.len();

    for (i, body) in scene.statics.iter().chain(scene.dynamics.iter()).enumerate() {
        validate_body(i, body)?;
    }

    for (i, joint) in scene.joints.iter().enumerate() {
        if let Some(a) = joint.body_a {
            if a >= body_count {
                return Err(MarrowError::InvalidScene(format!(
                    "joint {i}: body A index {a} out of range ({body_count} bodies)"
                )));
            }
            if a == joint.body_b {
                return Err(MarrowError::InvalidScene(format!(
                    "joint {i}: body A and body B are the same index {a}"
                )));
            }
        }
        if joint.body_b >= body_count {
            return Err(MarrowError::InvalidScene(format!(
                "joint {i}: body B index {} out of range ({body_count} bodies)",
                joint.body_b
            )));
        }
        if let Some(fracture) = joint.fracture {
            if fracture <= 0.0 {
                return Err(MarrowError::InvalidScene(format!(
                    "joint {i}: fracture threshold must be positive"
                )));
            }
        }
    }

    for (i, spring) in scene.springs.iter().enumerate() {
        if spring.body_a >= body_count || spring.body_b >= body_count {
            return Err(MarrowError::InvalidScene(format!(
                "spring {i}: body index out of range ({body_count} bodies)"
            )));
        }
        if spring.body_a == spring.body_b {
            return Err(MarrowError::InvalidScene(format!(
                "spring {i}: body A and body B are the same index"
            )));
        }
        if spring.stiffness < 0.0 {
            return Err(MarrowError::InvalidScene(format!(
                "spring {i}: stiffness must be non-negative"
            )));
        }
    }

    if let Some(fixture) = &scene.fixture {
        validate_fixture(fixture)?;
    }

    Ok(())
}

fn validate_body(index: usize, body: &BodyDesc) -> MarrowResult<()> {
    if body.scale[0] < 0.0 || body.scale[1] < 0.0 {
        return Err(MarrowError::InvalidScene(format!(
            "body {index}: scale must be non-negative"
        )));
    }
    if !(0.0..=1.0).contains(&body.friction) {
        return Err(MarrowError::InvalidScene(format!(
            "body {index}: friction {} outside [0, 1]",
            body.friction
        )));
    }
    if body.density < 0.0 {
        return Err(MarrowError::InvalidScene(format!(
            "body {index}: density must be non-negative"
        )));
    }
    if parse_color(&body.color).is_none() {
        return Err(MarrowError::InvalidScene(format!(
            "body {index}: color {:?} is not a #rrggbb hex string",
            body.color
        )));
    }
    Ok(())
}

fn validate_fixture(fixture: &crate::contract::Fixture) -> MarrowResult<()> {
    use crate::contract::Fixture;
    match *fixture {
        Fixture::ClothGrid {
            cols,
            rows,
            spacing,
            particle_mass,
            young,
            poisson,
            ..
        } => {
            if cols == 0 || rows == 0 {
                return Err(MarrowError::InvalidScene(
                    "cloth grid needs at least one quad per axis".into(),
                ));
            }
            if spacing <= 0.0 || particle_mass <= 0.0 {
                return Err(MarrowError::InvalidScene(
                    "cloth grid spacing and particle mass must be positive".into(),
                ));
            }
            validate_material(young, poisson)
        }
        Fixture::HexCell {
            radius,
            particle_mass,
            young,
            poisson,
            ..
        } => {
            if radius <= 0.0 || particle_mass <= 0.0 {
                return Err(MarrowError::InvalidScene(
                    "hex cell radius and particle mass must be positive".into(),
                ));
            }
            validate_material(young, poisson)
        }
        Fixture::CantileverBeam {
            cols,
            rows,
            spacing,
            particle_mass,
            mu,
            lambda,
            ..
        } => {
            if cols == 0 || rows == 0 {
                return Err(MarrowError::InvalidScene(
                    "cantilever needs at least one quad per axis".into(),
                ));
            }
            if spacing <= 0.0 || particle_mass <= 0.0 {
                return Err(MarrowError::InvalidScene(
                    "cantilever spacing and particle mass must be positive".into(),
                ));
            }
            if mu <= 0.0 || lambda < 0.0 {
                return Err(MarrowError::InvalidScene(
                    "cantilever Lamé coefficients out of range".into(),
                ));
            }
            Ok(())
        }
    }
}

fn validate_material(young: f32, poisson: f32) -> MarrowResult<()> {
    if young <= 0.0 {
        return Err(MarrowError::InvalidScene(
            "Young's modulus must be positive".into(),
        ));
    }
    if !(0.0..0.5).contains(&poisson) || poisson == 0.0 {
        return Err(MarrowError::InvalidScene(
            "Poisson's ratio must lie strictly between 0 and 0.5".into(),
        ));
    }
    Ok(())
}
